// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Update attribute parsing with darling.
//!
//! # Supported Attributes
//!
//! | Attribute | Placement | Keys |
//! |-----------|-----------|------|
//! | `#[update(...)]` | struct | `target` (required), `method`, `ignore_unmarked`, `extensible`, `nested` |
//! | `#[update_property(...)]` | struct, field | `target`, `method`, `ignore_null`, `ignore_empty`, `handling`, `all_methods`, `use_string_empty`, `source_array`, `expr` |
//! | `#[update_ignore]` | field | none |
//! | `#[update_target(...)]` | struct | `extensible` |
//!
//! Keys left out stay unset, so configured defaults apply and no
//! applicability rule fires for them.

use convert_case::{Case, Casing};
use darling::{FromMeta, util::Flag};
use syn::{Attribute, Meta, Token, ext::IdentExt};

use crate::model::{CollectionHandling, MarkerSpec, PropertySpec};

/// Marker attribute names stripped from the re-emitted module.
pub const HELPER_ATTRIBUTES: &[&str] = &["update", "update_property", "update_ignore", "update_target"];

/// `#[update(...)]` on a source struct.
#[derive(Debug, FromMeta)]
pub struct MarkerAttrs {
    /// Target type, a path or a string holding one.
    pub target: syn::Path,

    /// Generated method name.
    #[darling(default)]
    pub method: Option<String>,

    /// Skip fields without `#[update_property]`.
    #[darling(default)]
    pub ignore_unmarked: Option<bool>,

    /// Generate an inherent function on the target.
    #[darling(default)]
    pub extensible: Option<bool>,

    /// Prefix path into an element of a target array.
    #[darling(default)]
    pub nested: Option<String>
}

impl MarkerAttrs {
    /// Convert to the language-neutral form.
    #[must_use]
    pub fn into_spec(self) -> MarkerSpec {
        let target_type = self
            .target
            .segments
            .iter()
            .map(|segment| segment.ident.unraw().to_string())
            .collect::<Vec<_>>()
            .join("::");
        MarkerSpec {
            target_type,
            method_name: self.method,
            ignore_unmarked_properties: self.ignore_unmarked,
            extensible_target_required: self.extensible,
            nested_path: self.nested
        }
    }
}

/// `#[update_property(...)]` on a field or a struct.
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
pub struct PropertyAttrs {
    /// Target field or path.
    pub target: Option<String>,
    /// Method the spec belongs to.
    pub method: Option<String>,
    /// Omit the operation for `None`.
    pub ignore_null: Option<bool>,
    /// Omit the operation for empty values.
    pub ignore_empty: Option<bool>,
    /// Collection write semantics.
    pub handling: Option<CollectionHandling>,
    /// Bind to every declared method.
    pub all_methods: Option<bool>,
    /// Treat `""` as empty.
    pub use_string_empty: Option<bool>,
    /// Iterate the source instance.
    pub source_array: Option<bool>,
    /// Value expression override.
    pub expr: Option<String>
}

impl PropertyAttrs {
    /// Parse, accepting the bare `#[update_property]` form.
    ///
    /// # Errors
    ///
    /// Returns darling errors for unknown keys and wrong value types.
    pub fn from_attribute(attr: &Attribute) -> darling::Result<Self> {
        match &attr.meta {
            Meta::Path(_) => Ok(Self::default()),
            meta => Self::from_meta(meta)
        }
    }

    /// Convert to the language-neutral form.
    #[must_use]
    pub fn into_spec(self) -> PropertySpec {
        PropertySpec {
            target_property_name: self.target,
            method_name: self.method,
            ignore_null: self.ignore_null,
            ignore_empty: self.ignore_empty,
            collection_handling: self.handling,
            apply_to_all_methods: self.all_methods,
            use_string_empty: self.use_string_empty,
            is_source_array: self.source_array,
            append_source_expression: self.expr
        }
    }
}

/// `#[update_target(...)]` on a target struct.
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
pub struct TargetAttrs {
    /// Allow inherent update functions on this type.
    pub extensible: Flag
}

impl TargetAttrs {
    /// Parse, accepting the bare `#[update_target]` form.
    ///
    /// # Errors
    ///
    /// Returns darling errors for unknown keys.
    pub fn from_attribute(attr: &Attribute) -> darling::Result<Self> {
        match &attr.meta {
            Meta::Path(_) => Ok(Self::default()),
            meta => Self::from_meta(meta)
        }
    }
}

impl FromMeta for CollectionHandling {
    /// Accepts `set`, `add_to_set`, `push`, `pull_all`, case and
    /// underscores ignored (`AddToSet` works too).
    fn from_string(value: &str) -> darling::Result<Self> {
        match value.replace('_', "").to_lowercase().as_str() {
            "set" => Ok(Self::Set),
            "addtoset" => Ok(Self::AddToSet),
            "push" => Ok(Self::Push),
            "pullall" => Ok(Self::PullAll),
            _ => Err(darling::Error::unknown_value(value))
        }
    }
}

/// Serde attributes that affect stored names.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SerdeNaming {
    /// `rename_all` rule of a container.
    pub rename_all: Option<String>,
    /// `rename` of a field.
    pub rename: Option<String>,
    /// `skip` or `skip_serializing`.
    pub skip: bool
}

impl SerdeNaming {
    /// Collect naming options from every `#[serde(...)]` attribute.
    ///
    /// Keys this crate does not care about are consumed and ignored.
    ///
    /// # Errors
    ///
    /// A malformed `rename` or `rename_all` would silently change stored
    /// names, so any parse failure inside `#[serde(...)]` is reported.
    pub fn from_attrs(attrs: &[Attribute]) -> darling::Result<Self> {
        let mut errors = darling::Error::accumulator();
        let mut naming = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    if let Some(rule) = string_or_serialize(&meta)? {
                        naming.rename_all = Some(rule);
                    }
                } else if meta.path.is_ident("rename") {
                    if let Some(name) = string_or_serialize(&meta)? {
                        naming.rename = Some(name);
                    }
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    naming.skip = true;
                } else if meta.input.peek(Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                } else if meta.input.peek(syn::token::Paren) {
                    let _: proc_macro2::Group = meta.input.parse()?;
                }
                Ok(())
            });
            errors.handle(parsed.map_err(darling::Error::from));
        }
        errors.finish_with(naming)
    }

    /// Stored name of `field` inside a container using `container` rules.
    #[must_use]
    pub fn stored_name(&self, field: &str, container: &Self) -> String {
        if let Some(rename) = &self.rename {
            return rename.clone();
        }
        match container.rename_all.as_deref() {
            Some(rule) => apply_rename_rule(field, rule),
            None => field.to_string()
        }
    }
}

/// `key = "value"` or `key(serialize = "value", ...)`. Only the serialize
/// side names stored fields, so `key(deserialize = "...")` yields `None`.
fn string_or_serialize(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        let value: syn::LitStr = meta.value()?.parse()?;
        return Ok(Some(value.value()));
    }
    let mut found = None;
    meta.parse_nested_meta(|nested| {
        let value: syn::LitStr = nested.value()?.parse()?;
        if nested.path.is_ident("serialize") {
            found = Some(value.value());
        }
        Ok(())
    })?;
    Ok(found)
}

/// Apply a serde `rename_all` rule to a snake_case field name.
fn apply_rename_rule(field: &str, rule: &str) -> String {
    match rule {
        "lowercase" => field.to_lowercase(),
        "UPPERCASE" => field.to_uppercase(),
        "PascalCase" => field.to_case(Case::Pascal),
        "camelCase" => field.to_case(Case::Camel),
        "SCREAMING_SNAKE_CASE" => field.to_uppercase(),
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.replace('_', "-").to_uppercase(),
        _ => field.to_string()
    }
}
