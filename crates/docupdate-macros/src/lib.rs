// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![warn(missing_docs)]

//! Proc-macro entry point of `docupdate`.
//!
//! All work happens in `docupdate-codegen`; this crate only converts between
//! `proc_macro` and `proc_macro2` token streams.

use proc_macro::TokenStream;

/// Generate partial-update callables for the structs of an inline module.
///
/// # Attribute Arguments
///
/// | Argument | Default | Meaning |
/// |----------|---------|---------|
/// | `method = "..."` | `"to_update"` | Method name for markers without one |
/// | `runtime = "..."` | `"::docupdate"` | Path of the runtime crate |
/// | `suffix = "..."` | `"UpdateExt"` | Extension trait suffix |
/// | `sequential` | off | Analyse on the compiler thread only |
///
/// # Helper Attributes
///
/// ```rust,ignore
/// #[docupdate::update_models]
/// mod models {
///     #[update_target(extensible)]            // target opts in to inherent fns
///     pub struct UserModel {
///         pub name: String,
///         pub groups: Vec<String>,
///     }
///
///     #[update(target = "UserModel", method = "to_add_group", ignore_unmarked)]
///     pub struct AddGroup {
///         #[update_property(handling = "add_to_set")]
///         pub groups: Vec<String>,
///         #[update_ignore]                    // never bound implicitly
///         pub note: String,
///     }
/// }
/// ```
///
/// Metadata problems become `compile_error!`s pointing at the offending
/// attribute or field; methods without problems are still generated.
#[proc_macro_attribute]
pub fn update_models(attr: TokenStream, item: TokenStream) -> TokenStream {
    docupdate_codegen::expand(attr.into(), item.into()).into()
}
