// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolved bindings and the per-method generation unit.

use serde::Serialize;

use super::{spec::CollectionHandling, table::TypeRef};
use crate::diagnostic::Location;

/// Options after merging a property spec with the configured defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectiveOptions {
    /// Omit the operation for `None` sources.
    pub ignore_null: bool,
    /// Omit the operation for empty collections and strings.
    pub ignore_empty: bool,
    /// Collection write semantics.
    pub collection_handling: CollectionHandling,
    /// `""` counts as empty.
    pub use_string_empty: bool,
    /// The source instance is iterated.
    pub is_source_array: bool
}

/// Where the written value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum BindingSource {
    /// A field of the source type.
    Property {
        /// Field name.
        name: String,
        /// Field type.
        ty: TypeRef
    },
    /// The whole source instance (type-level spec).
    Instance
}

impl BindingSource {
    /// Field name for property sources.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        match self {
            Self::Property {
                name, ..
            } => Some(name),
            Self::Instance => None
        }
    }

    /// Whether the value written is array-shaped.
    #[must_use]
    pub fn is_sequence(&self, options: &EffectiveOptions) -> bool {
        match self {
            Self::Property {
                ty, ..
            } => ty.is_sequence(),
            Self::Instance => options.is_source_array
        }
    }
}

/// Facts about the resolved target field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFacts {
    /// Sequence or map.
    pub is_collection: bool,
    /// Wrapped in `Option`.
    pub is_nullable_or_reference: bool,
    /// Text type.
    pub is_string: bool,
    /// Full target field type.
    pub ty: TypeRef
}

impl From<TypeRef> for TargetFacts {
    fn from(ty: TypeRef) -> Self {
        Self {
            is_collection: ty.is_collection(),
            is_nullable_or_reference: ty.nullable,
            is_string: ty.is_string(),
            ty
        }
    }
}

/// A property spec with its target path and kind facts resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyBinding {
    /// Source declaration order; the stable sort key of a descriptor.
    pub order: usize,
    /// Value origin.
    pub source: BindingSource,
    /// Fully qualified document path, e.g. `Templates.$.singleItem`.
    pub resolved_target_path: String,
    /// Effective options.
    pub options: EffectiveOptions,
    /// Target field facts.
    pub facts: TargetFacts,
    /// Raw value expression override.
    pub expression: Option<String>,
    /// Declaration site.
    pub location: Location
}

/// One generated callable: all bindings for a `(target, method)` pair of a
/// source type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateMethodDescriptor {
    /// Source type the callable reads from.
    pub source_type: String,
    /// Target document type.
    pub target_type_name: String,
    /// Callable name.
    pub method_name: String,
    /// Bindings in source declaration order.
    pub bindings: Vec<PropertyBinding>,
    /// Emit as an inherent function of the target type.
    pub requires_extensible_target: bool,
    /// Declaration site of the marker.
    pub location: Location
}

impl UpdateMethodDescriptor {
    /// Merge key used for ordering generated output.
    #[must_use]
    pub fn sort_key(&self) -> (&str, &str, &str) {
        (&self.target_type_name, &self.method_name, &self.source_type)
    }
}
