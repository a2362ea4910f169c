// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Annotation reader: the syn front-end of the compiler.
//!
//! Reads the items of one compilation unit into a [`TypeTable`]. The reader
//! is purely structural: it interprets attribute syntax and nothing else,
//! so the only failures it reports are malformed attributes.
//!
//! # Architecture
//!
//! ```text
//! reader.rs (coordinator)
//! ├── attrs.rs - darling structs for the update attributes, serde naming
//! └── types.rs - field type classification
//! ```
//!
//! Spans cannot leave the calling thread, so they are kept apart from the
//! table in a [`SpanIndex`] used only for error reporting.

mod attrs;
mod types;


use std::collections::HashMap;

pub use attrs::{HELPER_ATTRIBUTES, MarkerAttrs, PropertyAttrs, SerdeNaming, TargetAttrs};
use darling::FromMeta;
use proc_macro2::Span;
use syn::{Fields, ImplItem, Item, ItemStruct, Type, Visibility, ext::IdentExt, spanned::Spanned};
pub use types::classify;

use crate::{
    diagnostic::Location,
    model::{MemberInfo, TypeInfo, TypeTable, simple_type_name}
};

/// Declaration sites of the unit.
#[derive(Debug, Default)]
pub struct SpanIndex {
    types: HashMap<String, Span>,
    members: HashMap<(String, String), Span>,
    markers: HashMap<String, Vec<MarkerSite>>
}

#[derive(Debug)]
struct MarkerSite {
    target: String,
    method: Option<String>,
    span: Span
}

impl SpanIndex {
    /// Best span for a diagnostic location, falling back to the call site.
    #[must_use]
    pub fn span_of(&self, location: &Location) -> Span {
        let source = &location.source_type;
        if let Some(member) = &location.member
            && let Some(span) = self.members.get(&(source.clone(), member.clone()))
        {
            return *span;
        }
        if let (Some(target), Some(method)) = (&location.target_type, &location.method)
            && let Some(site) = self.markers.get(source).and_then(|sites| {
                sites.iter().find(|site| {
                    simple_type_name(&site.target) == target
                        && site.method.as_deref().is_none_or(|name| name == method)
                })
            })
        {
            return site.span;
        }
        self.types
            .get(source)
            .copied()
            .unwrap_or_else(Span::call_site)
    }
}

/// Result of reading a unit.
#[derive(Debug, Default)]
pub struct ReadModule {
    /// Metadata of every declared type.
    pub table: TypeTable,
    /// Declaration sites.
    pub spans: SpanIndex
}

/// Read the items of one compilation unit.
///
/// # Errors
///
/// Returns every malformed update attribute at once.
pub fn read_items(items: &[Item]) -> darling::Result<ReadModule> {
    let mut errors = darling::Error::accumulator();
    let mut read = ReadModule::default();

    for item in items {
        match item {
            Item::Struct(item) => {
                if let Some(info) = errors.handle(read_struct(item, &mut read.spans)) {
                    read.table.insert(info);
                }
            }
            Item::Enum(item) => {
                let name = item.ident.unraw().to_string();
                read.spans.types.insert(name.clone(), item.ident.span());
                read.table.insert(TypeInfo::new(name));
            }
            _ => {}
        }
    }

    for item in items {
        if let Item::Impl(imp) = item
            && imp.trait_.is_none()
            && let Some(name) = self_type_name(&imp.self_ty)
            && let Some(info) = read.table.get_mut(&name)
        {
            info.methods.extend(imp.items.iter().filter_map(|item| match item {
                ImplItem::Fn(function) => Some(function.sig.ident.unraw().to_string()),
                ImplItem::Const(constant) => Some(constant.ident.unraw().to_string()),
                _ => None
            }));
        }
    }

    errors.finish_with(read)
}

/// Remove update attributes from structs and their fields.
pub fn strip_helper_attrs(items: &mut [Item]) {
    let is_helper = |attr: &syn::Attribute| {
        HELPER_ATTRIBUTES
            .iter()
            .any(|name| attr.path().is_ident(name))
    };
    for item in items {
        if let Item::Struct(item) = item {
            item.attrs.retain(|attr| !is_helper(attr));
            for field in item.fields.iter_mut() {
                field.attrs.retain(|attr| !is_helper(attr));
            }
        }
    }
}

fn read_struct(item: &ItemStruct, spans: &mut SpanIndex) -> darling::Result<TypeInfo> {
    let mut errors = darling::Error::accumulator();
    let name = item.ident.unraw().to_string();
    let mut info = TypeInfo::new(&name);
    spans.types.insert(name.clone(), item.ident.span());

    for attr in &item.attrs {
        let path = attr.path();
        if path.is_ident("update") {
            if let Some(marker) = errors.handle(MarkerAttrs::from_meta(&attr.meta)) {
                let spec = marker.into_spec();
                spans.markers.entry(name.clone()).or_default().push(MarkerSite {
                    target: spec.target_type.clone(),
                    method: spec.method_name.clone(),
                    span: attr.span()
                });
                info.markers.push(spec);
            }
        } else if path.is_ident("update_property") {
            if let Some(spec) = errors.handle(PropertyAttrs::from_attribute(attr)) {
                info.type_specs.push(spec.into_spec());
            }
        } else if path.is_ident("update_target") {
            if let Some(target) = errors.handle(TargetAttrs::from_attribute(attr)) {
                info.extensible = target.extensible.is_present();
            }
        } else if path.is_ident("update_ignore") {
            errors.push(
                darling::Error::custom("`#[update_ignore]` belongs on fields").with_span(attr)
            );
        }
    }

    let container = errors
        .handle(SerdeNaming::from_attrs(&item.attrs))
        .unwrap_or_default();
    match &item.fields {
        Fields::Named(fields) => {
            for field in &fields.named {
                let Some(ident) = &field.ident else {
                    continue;
                };
                let field_name = ident.unraw().to_string();
                let naming = errors
                    .handle(SerdeNaming::from_attrs(&field.attrs))
                    .unwrap_or_default();
                let mut member = MemberInfo::new(&field_name, classify(&field.ty));
                member.stored_name = naming.stored_name(&field_name, &container);
                member.public = !matches!(field.vis, Visibility::Inherited);
                member.skipped = naming.skip;

                for attr in &field.attrs {
                    if attr.path().is_ident("update_property") {
                        if let Some(spec) = errors.handle(PropertyAttrs::from_attribute(attr)) {
                            member.specs.push(spec.into_spec());
                        }
                    } else if attr.path().is_ident("update_ignore") {
                        if errors
                            .handle(attr.meta.require_path_only().map_err(darling::Error::from))
                            .is_some()
                        {
                            member.excluded = true;
                        }
                    } else if attr.path().is_ident("update") || attr.path().is_ident("update_target") {
                        errors.push(
                            darling::Error::custom("this attribute belongs on the struct")
                                .with_span(attr)
                        );
                    }
                }

                spans
                    .members
                    .insert((name.clone(), field_name), ident.span());
                info.members.push(member);
            }
        }
        Fields::Unnamed(_) | Fields::Unit => {
            if info.is_source() {
                errors.push(
                    darling::Error::custom("update sources must have named fields")
                        .with_span(&item.ident)
                );
            }
        }
    }

    errors.finish_with(info)
}

fn self_type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.unraw().to_string()),
        _ => None
    }
}
