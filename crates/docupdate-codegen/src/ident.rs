// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Identifier checks that do not touch `proc_macro2`.
//!
//! Analysis runs on rayon workers, where the compiler's proc-macro bridge is
//! unavailable, so names are checked with plain string rules.

const KEYWORDS: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield"
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW: &[&str] = &["Self", "crate", "self", "super"];

/// Whether `name` is a reserved word.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Whether `name` can be written as a plain identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && name != "_"
        && !is_keyword(name)
}

/// Whether `name` can be emitted, possibly as `r#name`.
pub fn is_emittable(name: &str) -> bool {
    is_identifier(name) || (is_keyword(name) && !NON_RAW.contains(&name))
}
