// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Code emission.
//!
//! Renders aggregated [`UpdateMethodDescriptor`]s into Rust items. Output
//! depends only on the descriptors and the configuration, so identical
//! input always yields identical tokens.
//!
//! # Generated Code
//!
//! For a source `GroupRequest` updating `GroupModel`:
//!
//! ```rust,ignore
//! pub trait GroupRequestUpdateExt {
//!     fn to_update(&self) -> ::docupdate::UpdateResult<::docupdate::UpdateDefinition<GroupModel>>;
//! }
//!
//! impl GroupRequestUpdateExt for GroupRequest {
//!     fn to_update(&self) -> ::docupdate::UpdateResult<::docupdate::UpdateDefinition<GroupModel>> {
//!         let source = self;
//!         let mut update = ::docupdate::UpdateDefinition::<GroupModel>::new();
//!         if let Some(current) = &source.name {
//!             update = update.set("name", current)?;
//!         }
//!         Ok(update)
//!     }
//! }
//! ```
//!
//! Markers with `extensible` produce `impl GroupModel { pub fn to_update(source: &GroupRequest) -> ... }`
//! instead.
//!
//! # Guards
//!
//! | Binding | Guard |
//! |---------|-------|
//! | `Option` source, `ignore_null` or non-`set` handling | `if let Some(current) = &source.field` |
//! | `Option` source, `set` without `ignore_null` | writes the option, `None` becomes `null` |
//! | `ignore_empty` on a collection source | `if !value.is_empty()` |
//! | `ignore_empty` on a string source with `use_string_empty` | `if !value.is_empty()` |

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};

use crate::{
    GenerateError,
    config::GeneratorConfig,
    diagnostic::{Diagnostic, DiagnosticKind, Location},
    ident::{is_emittable, is_identifier},
    model::{BindingSource, CollectionHandling, PropertyBinding, UpdateMethodDescriptor}
};

/// Generated items and emission diagnostics.
#[derive(Debug, Default)]
pub struct Emission {
    /// Generated items.
    pub tokens: TokenStream,
    /// Problems found while rendering; the affected methods are omitted.
    pub diagnostics: Vec<Diagnostic>
}

/// Renders descriptors with a fixed configuration.
#[derive(Debug)]
pub struct Emitter<'a> {
    config: &'a GeneratorConfig,
    runtime: syn::Path
}

/// A method rendered as signature plus body.
struct Rendered {
    signature: TokenStream,
    body: TokenStream,
    doc: String
}

impl<'a> Emitter<'a> {
    /// Prepare an emitter.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidRuntimePath`] when the configured
    /// runtime path does not parse.
    pub fn new(config: &'a GeneratorConfig) -> Result<Self, GenerateError> {
        let runtime = syn::parse_str::<syn::Path>(&config.runtime_path)
            .map_err(|_| GenerateError::InvalidRuntimePath(config.runtime_path.clone()))?;
        Ok(Self {
            config,
            runtime
        })
    }

    /// Render all descriptors.
    ///
    /// Descriptors are expected in merge order. Trait-mode methods are
    /// grouped into one extension trait per source type; extensible methods
    /// each get an inherent `impl` block on their target.
    #[must_use]
    pub fn emit(&self, descriptors: &[UpdateMethodDescriptor]) -> Emission {
        let mut emission = Emission::default();
        let mut traits: BTreeMap<&str, Vec<Rendered>> = BTreeMap::new();
        let mut inherent = Vec::new();

        for descriptor in descriptors {
            let rendered = match self.render(descriptor) {
                Ok(rendered) => rendered,
                Err(diagnostic) => {
                    tracing::debug!(
                        source = %descriptor.source_type,
                        method = %descriptor.method_name,
                        code = diagnostic.code(),
                        "update method dropped by emitter"
                    );
                    emission.diagnostics.push(diagnostic);
                    continue;
                }
            };
            if descriptor.requires_extensible_target {
                match self.inherent_impl(descriptor, rendered) {
                    Ok(tokens) => inherent.push(tokens),
                    Err(diagnostic) => emission.diagnostics.push(diagnostic)
                }
            } else {
                traits
                    .entry(descriptor.source_type.as_str())
                    .or_default()
                    .push(rendered);
            }
        }

        let mut tokens = TokenStream::new();
        for (source, methods) in traits {
            match self.extension_trait(source, methods) {
                Ok(items) => tokens.extend(items),
                Err(diagnostic) => emission.diagnostics.push(diagnostic)
            }
        }
        tokens.extend(inherent);
        emission.tokens = tokens;
        emission
    }

    fn extension_trait(&self, source: &str, methods: Vec<Rendered>) -> Result<TokenStream, Diagnostic> {
        let location = || Location::source(source);
        let source_ident = ident(source, location)?;
        let trait_ident = ident(&format!("{source}{}", self.config.extension_suffix), location)?;
        let trait_doc = format!("Partial updates built from [`{source}`].");

        let declarations = methods.iter().map(|method| {
            let signature = &method.signature;
            let doc = &method.doc;
            quote! {
                #[doc = #doc]
                #signature;
            }
        });
        let definitions = methods.iter().map(|method| {
            let signature = &method.signature;
            let body = &method.body;
            quote! {
                #[allow(unused_mut, unused_variables)]
                #signature {
                    let source = self;
                    #body
                }
            }
        });

        Ok(quote! {
            #[doc = #trait_doc]
            pub trait #trait_ident {
                #(#declarations)*
            }

            impl #trait_ident for #source_ident {
                #(#definitions)*
            }
        })
    }

    fn inherent_impl(
        &self,
        descriptor: &UpdateMethodDescriptor,
        rendered: Rendered
    ) -> Result<TokenStream, Diagnostic> {
        let location = || descriptor.location.clone();
        let target = ident(&descriptor.target_type_name, location)?;
        let Rendered {
            signature,
            body,
            doc
        } = rendered;
        Ok(quote! {
            impl #target {
                #[doc = #doc]
                #[allow(unused_mut, unused_variables)]
                pub #signature {
                    #body
                }
            }
        })
    }

    fn render(&self, descriptor: &UpdateMethodDescriptor) -> Result<Rendered, Diagnostic> {
        let location = || descriptor.location.clone();
        let runtime = &self.runtime;
        let method = ident(&descriptor.method_name, location)?;
        let target = ident(&descriptor.target_type_name, location)?;
        let output = quote! { #runtime::UpdateResult<#runtime::UpdateDefinition<#target>> };

        let signature = if descriptor.requires_extensible_target {
            let source = ident(&descriptor.source_type, location)?;
            quote! { fn #method(source: &#source) -> #output }
        } else {
            quote! { fn #method(&self) -> #output }
        };

        let blocks = descriptor
            .bindings
            .iter()
            .map(|binding| self.binding(binding))
            .collect::<Result<Vec<_>, _>>()?;

        let body = quote! {
            let mut update = #runtime::UpdateDefinition::<#target>::new();
            #(#blocks)*
            ::core::result::Result::Ok(update)
        };

        let doc = format!(
            "Build the `{}` update of [`{}`] from [`{}`].",
            descriptor.method_name, descriptor.target_type_name, descriptor.source_type
        );

        Ok(Rendered {
            signature,
            body,
            doc
        })
    }

    /// One guarded builder call.
    fn binding(&self, binding: &PropertyBinding) -> Result<TokenStream, Diagnostic> {
        let location = || binding.location.clone();
        let options = &binding.options;
        let handling = options.collection_handling;
        let sequence = binding.source.is_sequence(options);
        let each = sequence && handling != CollectionHandling::Set;

        let override_expr = binding
            .expression
            .as_deref()
            .map(|text| {
                syn::parse_str::<syn::Expr>(text).map_err(|error| {
                    Diagnostic::new(
                        DiagnosticKind::InvalidSourceExpression {
                            property: binding.resolved_target_path.clone(),
                            reason: error.to_string()
                        },
                        location()
                    )
                })
            })
            .transpose()?;

        let mut conditions = Vec::new();
        let subject = match &binding.source {
            BindingSource::Instance => quote! { source },
            BindingSource::Property {
                name,
                ty
            } => {
                let field = ident(name, location)?;
                let empty_check = options.ignore_empty
                    && (ty.is_collection() || (ty.is_string() && options.use_string_empty));
                if ty.nullable && (options.ignore_null || handling != CollectionHandling::Set) {
                    conditions.push(quote! {
                        let ::core::option::Option::Some(current) = &source.#field
                    });
                    if empty_check {
                        conditions.push(quote! { !current.is_empty() });
                    }
                    quote! { current }
                } else {
                    if empty_check {
                        conditions.push(if ty.nullable {
                            quote! { !source.#field.as_ref().is_some_and(|current| current.is_empty()) }
                        } else {
                            quote! { !source.#field.is_empty() }
                        });
                    }
                    quote! { &source.#field }
                }
            }
        };

        let value = match &override_expr {
            Some(expr) if each => quote! { (#expr) },
            Some(expr) => quote! { &(#expr) },
            None => subject
        };
        let path = binding.resolved_target_path.as_str();

        let call = match handling {
            CollectionHandling::Set => quote! { set(#path, #value) },
            CollectionHandling::AddToSet if each => quote! { add_to_set_each(#path, #value) },
            CollectionHandling::AddToSet => quote! { add_to_set(#path, #value) },
            CollectionHandling::Push if each => quote! { push_each(#path, #value) },
            CollectionHandling::Push => quote! { push(#path, #value) },
            CollectionHandling::PullAll if each => quote! { pull_all(#path, #value) },
            CollectionHandling::PullAll => {
                quote! { pull_all(#path, ::core::iter::once(#value)) }
            }
        };

        tracing::trace!(path, handling = %handling, guards = conditions.len(), "binding emitted");

        let mut block = quote! { update = update.#call?; };
        for condition in conditions.into_iter().rev() {
            block = quote! {
                if #condition {
                    #block
                }
            };
        }
        Ok(block)
    }
}

/// Identifier for a name from the table; keywords become raw identifiers.
fn ident(name: &str, location: impl FnOnce() -> Location) -> Result<Ident, Diagnostic> {
    if is_identifier(name) {
        Ok(format_ident!("{}", name))
    } else if is_emittable(name) {
        Ok(Ident::new_raw(name, Span::call_site()))
    } else {
        Err(Diagnostic::new(
            DiagnosticKind::InvalidIdentifier {
                name: name.to_string()
            },
            location()
        ))
    }
}
