// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Metadata table of the compilation unit.
//!
//! A [`TypeTable`] lists every declared type with its members, inherent
//! methods and attached update metadata. Declaration order is preserved
//! everywhere; generated output depends on it.

use serde::{Deserialize, Serialize};

use super::spec::{MarkerSpec, PropertySpec};

/// Last segment of a possibly qualified type name.
#[must_use]
pub fn simple_type_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name).trim()
}

/// Shape of a member type, reduced to what the compiler needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeKind {
    /// Primitive value type (`bool`, integers, floats, `char`).
    Scalar(String),
    /// Text (`String`, `str`, `Cow<str>`).
    String,
    /// Array-like collection with the element type.
    Sequence(Box<TypeRef>),
    /// Key-value collection with the value type. Stored as a sub-document.
    Map(Box<TypeRef>),
    /// User-declared type, looked up in the table by name.
    Named(String),
    /// Anything else, kept as its textual form.
    Opaque(String)
}

/// A member type: its shape plus nullability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Wrapped in `Option`.
    #[serde(default)]
    pub nullable: bool,

    /// Underlying shape.
    #[serde(flatten)]
    pub kind: TypeKind
}

impl TypeRef {
    /// Non-nullable type of the given kind.
    #[must_use]
    pub const fn new(kind: TypeKind) -> Self {
        Self {
            nullable: false,
            kind
        }
    }

    /// Primitive value type.
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Scalar(name.into()))
    }

    /// Text type.
    #[must_use]
    pub const fn string() -> Self {
        Self::new(TypeKind::String)
    }

    /// Array-like collection of `element`.
    #[must_use]
    pub fn sequence(element: TypeRef) -> Self {
        Self::new(TypeKind::Sequence(Box::new(element)))
    }

    /// Key-value collection with values of `value`.
    #[must_use]
    pub fn map(value: TypeRef) -> Self {
        Self::new(TypeKind::Map(Box::new(value)))
    }

    /// Reference to a user-declared type.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Named(name.into()))
    }

    /// Unclassified type.
    #[must_use]
    pub fn opaque(text: impl Into<String>) -> Self {
        Self::new(TypeKind::Opaque(text.into()))
    }

    /// The same type wrapped in `Option`.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sequence or map.
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self.kind, TypeKind::Sequence(_) | TypeKind::Map(_))
    }

    /// Array-like collection.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self.kind, TypeKind::Sequence(_))
    }

    /// Key-value collection.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self.kind, TypeKind::Map(_))
    }

    /// Text type.
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self.kind, TypeKind::String)
    }

    /// Element type of a sequence.
    #[must_use]
    pub fn element(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeKind::Sequence(element) => Some(element),
            _ => None
        }
    }

    /// Name of the referenced user type.
    #[must_use]
    pub fn named_type(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Named(name) => Some(name),
            _ => None
        }
    }
}

/// A field of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    /// Rust field name.
    pub name: String,

    /// Name under which the field is stored in the document.
    pub stored_name: String,

    /// Field type.
    pub ty: TypeRef,

    /// Visible outside its module (`pub`, `pub(crate)`, ...).
    #[serde(default)]
    pub public: bool,

    /// Not persisted (`#[serde(skip)]`); cannot be addressed by updates.
    #[serde(default)]
    pub skipped: bool,

    /// Carries `#[update_ignore]`.
    #[serde(default)]
    pub excluded: bool,

    /// Property specs declared on the field, in declaration order.
    #[serde(default)]
    pub specs: Vec<PropertySpec>
}

impl MemberInfo {
    /// Plain public member stored under its own name.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        let name = name.into();
        Self {
            stored_name: name.clone(),
            name,
            ty,
            public: true,
            skipped: false,
            excluded: false,
            specs: Vec::new()
        }
    }

    /// Whether a path segment addresses this member.
    #[must_use]
    pub fn answers_to(&self, segment: &str) -> bool {
        !self.skipped && (self.name == segment || self.stored_name == segment)
    }
}

/// A declared type with its attached update metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Type name as declared.
    pub name: String,

    /// Named fields in declaration order.
    #[serde(default)]
    pub members: Vec<MemberInfo>,

    /// Names of inherent associated items.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Carries `#[update_target(extensible)]`.
    #[serde(default)]
    pub extensible: bool,

    /// `#[update(...)]` markers in declaration order.
    #[serde(default)]
    pub markers: Vec<MarkerSpec>,

    /// Type-level `#[update_property(...)]` specs in declaration order.
    #[serde(default)]
    pub type_specs: Vec<PropertySpec>
}

impl TypeInfo {
    /// Empty type with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Member addressed by a path segment.
    #[must_use]
    pub fn member(&self, segment: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|member| member.answers_to(segment))
    }

    /// Whether `name` is already taken by a field or an inherent item.
    #[must_use]
    pub fn has_member_named(&self, name: &str) -> bool {
        self.members.iter().any(|member| member.name == name)
            || self.methods.iter().any(|method| method == name)
    }

    /// Whether the type carries any update metadata and is thus a source.
    #[must_use]
    pub fn is_source(&self) -> bool {
        !self.markers.is_empty()
            || !self.type_specs.is_empty()
            || self.members.iter().any(|member| !member.specs.is_empty())
    }
}

/// All declared types of one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTable {
    types: Vec<TypeInfo>
}

impl TypeTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type, replacing an earlier one with the same name.
    pub fn insert(&mut self, info: TypeInfo) {
        match self.types.iter_mut().find(|existing| existing.name == info.name) {
            Some(existing) => *existing = info,
            None => self.types.push(info)
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, info: TypeInfo) -> Self {
        self.insert(info);
        self
    }

    /// Look a type up by name. Qualified names match on their last segment.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        let name = simple_type_name(name);
        self.types.iter().find(|info| info.name == name)
    }

    /// Mutable lookup by exact name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut TypeInfo> {
        self.types.iter_mut().find(|info| info.name == name)
    }

    /// All types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.iter()
    }

    /// Types carrying update metadata, in declaration order.
    pub fn sources(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.iter().filter(|info| info.is_source())
    }

    /// Number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load a table from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns the deserializer error for malformed input.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the table to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which cannot happen for well-formed
    /// tables.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
