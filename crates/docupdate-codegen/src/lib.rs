// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! Update-definition compiler behind `docupdate`.
//!
//! Reads update metadata from a compilation unit and generates one
//! callable per `(target type, method name)` that turns a source value into
//! a partial document update.
//!
//! # Pipeline
//!
//! ```text
//! syn items ─► reader ─► TypeTable ─► resolve ─► validate ─► aggregate ─► emit
//!                         (JSON)      └──── per source type, on rayon ────┘
//! ```
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Annotation reader | [`reader`] | [`TypeTable`] |
//! | Binding resolver | [`resolve`] | [`resolve::Resolution`] |
//! | Diagnostic validator | [`validate`] | descriptors + [`Diagnostic`]s |
//! | Method aggregator | [`aggregate`] | one descriptor per key |
//! | Code emitter | [`emit`] | `TokenStream` |
//!
//! Problems with metadata are [`Diagnostic`]s and never stop other methods
//! from being generated. Only unparsable input is a [`GenerateError`].
//!
//! # Entry Points
//!
//! - [`expand`] for the `#[update_models]` attribute macro
//! - [`generate_source`] for build scripts working on a source file
//! - [`pipeline::generate`] for a [`TypeTable`] loaded from JSON

pub mod aggregate;
pub mod config;
pub mod diagnostic;
pub mod emit;
mod error;
pub mod ident;
pub mod model;
pub mod pipeline;
pub mod reader;
pub mod resolve;
pub mod validate;

pub use config::{GeneratorConfig, OptionDefaults};
use darling::{FromMeta, ast::NestedMeta};
pub use diagnostic::{Diagnostic, DiagnosticKind, Location, Severity};
pub use error::GenerateError;
pub use model::TypeTable;
pub use pipeline::{Analysis, Cancellation, Generated};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Item, ItemMod};

/// Arguments of `#[update_models(...)]`.
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct ModelsArgs {
    /// Default method name.
    method: Option<String>,
    /// Runtime crate path.
    runtime: Option<String>,
    /// Extension trait suffix.
    suffix: Option<String>,
    /// Analyse on the calling thread only.
    sequential: bool
}

impl ModelsArgs {
    fn into_config(self) -> GeneratorConfig {
        let mut config = GeneratorConfig::default().with_parallel(!self.sequential);
        if let Some(method) = self.method {
            config = config.with_default_method(method);
        }
        if let Some(runtime) = self.runtime {
            config = config.with_runtime_path(runtime);
        }
        if let Some(suffix) = self.suffix {
            config.extension_suffix = suffix;
        }
        config
    }
}

/// Expand `#[update_models]` on an inline module.
///
/// The module is the compilation unit. Helper attributes are stripped, the
/// generated items are appended to the module, and every error diagnostic
/// becomes a `compile_error!` at its declaration site.
#[must_use]
pub fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    match try_expand(attr, item) {
        Ok(tokens) => tokens,
        Err(error) => error.write_errors()
    }
}

fn try_expand(attr: TokenStream, item: TokenStream) -> darling::Result<TokenStream> {
    let args = ModelsArgs::from_list(&NestedMeta::parse_meta_list(attr)?)?;
    let mut module: ItemMod = syn::parse2(item)?;
    let Some((_, items)) = module.content.as_mut() else {
        return Err(darling::Error::custom(
            "`#[update_models]` needs an inline module: `mod name { ... }`"
        )
        .with_span(&module.ident));
    };

    let read = reader::read_items(items)?;
    reader::strip_helper_attrs(items);

    let config = args.into_config();
    let generated = pipeline::generate(&read.table, &config, &Cancellation::new())
        .map_err(|error| darling::Error::custom(error.to_string()))?;

    let errors = generated
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.is_error())
        .map(|diagnostic| {
            syn::Error::new(read.spans.span_of(&diagnostic.location), diagnostic.to_string())
        })
        .reduce(|mut combined, error| {
            combined.combine(error);
            combined
        })
        .map(|error| error.to_compile_error());

    items.push(Item::Verbatim(generated.tokens));
    Ok(quote! {
        #module
        #errors
    })
}

/// Run the generator over a whole Rust source file.
///
/// Intended for build scripts that write the generated items next to the
/// models instead of using the attribute macro.
///
/// # Errors
///
/// Returns [`GenerateError`] when the source does not parse, when update
/// attributes are malformed, or when the runtime path is invalid.
///
/// # Example
///
/// ```rust
/// use docupdate_codegen::{GeneratorConfig, generate_source};
///
/// let generated = generate_source(
///     r#"
///     pub struct GroupModel { pub name: String }
///
///     #[update(target = "GroupModel")]
///     pub struct GroupRequest { pub name: String }
///     "#,
///     &GeneratorConfig::default()
/// )
/// .unwrap();
/// assert!(!generated.has_errors());
/// assert!(generated.tokens.to_string().contains("GroupRequestUpdateExt"));
/// ```
pub fn generate_source(source: &str, config: &GeneratorConfig) -> Result<Generated, GenerateError> {
    let file = syn::parse_file(source)?;
    let read = reader::read_items(&file.items)?;
    pipeline::generate(&read.table, config, &Cancellation::new())
}
