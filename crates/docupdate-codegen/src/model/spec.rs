// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Raw update metadata as declared on source types.
//!
//! Options are kept as `Option<_>`: `None` means "not set" and lets the
//! configured default apply without triggering applicability rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a collection-valued target field is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionHandling {
    /// Replace the whole field (`$set`).
    #[default]
    Set,
    /// Insert elements that are not present yet (`$addToSet`).
    AddToSet,
    /// Append elements, keeping duplicates (`$push`).
    Push,
    /// Remove all matching elements (`$pullAll`).
    PullAll
}

impl CollectionHandling {
    /// Attribute spelling of the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::AddToSet => "add_to_set",
            Self::Push => "push",
            Self::PullAll => "pull_all"
        }
    }
}

impl fmt::Display for CollectionHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `#[update(...)]`: the source type produces an update for `target_type`
/// under one method name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSpec {
    /// Target document type.
    pub target_type: String,

    /// Generated method name.
    #[serde(default)]
    pub method_name: Option<String>,

    /// Only explicitly marked properties take part.
    #[serde(default)]
    pub ignore_unmarked_properties: Option<bool>,

    /// Generate an inherent function on the target type.
    #[serde(default)]
    pub extensible_target_required: Option<bool>,

    /// Prefix addressing an element of a target collection.
    #[serde(default)]
    pub nested_path: Option<String>
}

impl MarkerSpec {
    /// Marker for `target_type` with every option unset.
    #[must_use]
    pub fn new(target_type: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
            ..Self::default()
        }
    }
}

/// `#[update_property(...)]`: how one source property maps to one target
/// field for one method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Target field name or path; defaults to the source field name.
    #[serde(default)]
    pub target_property_name: Option<String>,

    /// Method this spec belongs to.
    #[serde(default)]
    pub method_name: Option<String>,

    /// Omit the operation when the source value is `None`.
    #[serde(default)]
    pub ignore_null: Option<bool>,

    /// Omit the operation when the source collection or string is empty.
    #[serde(default)]
    pub ignore_empty: Option<bool>,

    /// Write semantics for collection targets.
    #[serde(default)]
    pub collection_handling: Option<CollectionHandling>,

    /// Bind once for every method declared on the type.
    #[serde(default)]
    pub apply_to_all_methods: Option<bool>,

    /// Treat `""` as empty.
    #[serde(default)]
    pub use_string_empty: Option<bool>,

    /// The source instance itself is iterated (type-level specs only).
    #[serde(default)]
    pub is_source_array: Option<bool>,

    /// Raw value expression replacing the property read. Not validated.
    #[serde(default)]
    pub append_source_expression: Option<String>
}
