// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Classification of field types into [`TypeRef`].
//!
//! Only the last path segment is inspected, so `std::vec::Vec<T>` and
//! `Vec<T>` classify the same way.
//!
//! | Rust type | Kind |
//! |-----------|------|
//! | `bool`, integers, floats, `char` | `Scalar` |
//! | `String`, `str`, `Cow<str>` | `String` |
//! | `Vec`, `VecDeque`, `HashSet`, `BTreeSet`, `IndexSet`, `[T; N]`, `[T]` | `Sequence` |
//! | `HashMap`, `BTreeMap`, `IndexMap` | `Map` |
//! | `Option<T>` | `T`, nullable |
//! | `Box<T>`, `Arc<T>`, `Rc<T>`, `&T` | `T` |
//! | other plain paths | `Named` |

use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type, ext::IdentExt};

use crate::model::TypeRef;

const SCALARS: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
    "u128", "usize", "f32", "f64"
];

const SEQUENCES: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "IndexSet",
    "BinaryHeap"
];

const MAPS: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

const TRANSPARENT: &[&str] = &["Box", "Arc", "Rc"];

/// Classify a field type.
#[must_use]
pub fn classify(ty: &Type) -> TypeRef {
    match ty {
        Type::Reference(reference) => classify(&reference.elem),
        Type::Paren(paren) => classify(&paren.elem),
        Type::Group(group) => classify(&group.elem),
        Type::Array(array) => TypeRef::sequence(classify(&array.elem)),
        Type::Slice(slice) => TypeRef::sequence(classify(&slice.elem)),
        Type::Path(path) if path.qself.is_none() => classify_path(&path.path, ty),
        other => opaque(other)
    }
}

fn classify_path(path: &syn::Path, ty: &Type) -> TypeRef {
    let Some(last) = path.segments.last() else {
        return opaque(ty);
    };
    let name = last.ident.unraw().to_string();
    let args = type_arguments(&last.arguments);
    let first = args.first().copied();

    match name.as_str() {
        "Option" => first.map_or_else(|| opaque(ty), |inner| classify(inner).optional()),
        "String" | "str" => TypeRef::string(),
        "Cow" => args.last().map_or_else(|| opaque(ty), |inner| classify(inner)),
        name if TRANSPARENT.contains(&name) => first.map_or_else(|| opaque(ty), classify),
        name if SEQUENCES.contains(&name) => {
            first.map_or_else(|| opaque(ty), |element| TypeRef::sequence(classify(element)))
        }
        name if MAPS.contains(&name) => args
            .get(1)
            .map_or_else(|| opaque(ty), |value| TypeRef::map(classify(value))),
        name if SCALARS.contains(&name) => TypeRef::scalar(name),
        _ if args.is_empty() => TypeRef::named(name),
        _ => opaque(ty)
    }
}

fn type_arguments(arguments: &PathArguments) -> Vec<&Type> {
    let PathArguments::AngleBracketed(bracketed) = arguments else {
        return Vec::new();
    };
    bracketed
        .args
        .iter()
        .filter_map(|argument| match argument {
            GenericArgument::Type(ty) => Some(ty),
            _ => None
        })
        .collect()
}

fn opaque(ty: &Type) -> TypeRef {
    TypeRef::opaque(ty.to_token_stream().to_string())
}
