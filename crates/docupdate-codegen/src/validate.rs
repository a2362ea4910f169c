// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Diagnostic validation.
//!
//! Turns the problems recorded by the [`resolve`](crate::resolve) stage into
//! [`Diagnostic`]s and applies the option applicability rules. Every binding
//! of every method is checked so one pass reports all problems. A method
//! with any error is dropped; its siblings are unaffected.
//!
//! # Rules
//!
//! | Trigger | Diagnostic |
//! |---------|------------|
//! | `handling` other than `set` on a non-collection target | `UPD001` |
//! | explicit `ignore_empty` on a target that is neither collection nor string | `UPD002` |
//! | method name taken on the target (or on the source for extension traits) | `UPD003` |
//! | `handling` other than `set` on a map target | `UPD004` |
//! | explicit `use_string_empty` on a non-string target | `UPD005` |
//! | `extensible` marker on a target without `#[update_target(extensible)]` | `UPD006` |
//! | explicit `ignore_null` where neither source nor target can be `None` | `UPD007` |
//! | sequence source written with `set` into a non-collection target | `UPD009` |
//! | `source_array` on a field spec | `UPD010` |


use crate::{
    diagnostic::{Diagnostic, DiagnosticKind},
    ident::is_emittable,
    model::{
        BindingSource, CollectionHandling, PropertyBinding, TypeInfo, TypeTable,
        UpdateMethodDescriptor
    },
    resolve::{PathProblem, Resolution, ResolvedBinding, ResolvedMethod, ResolvedTarget}
};

/// Methods that passed validation and every diagnostic raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Error-free methods, in marker order.
    pub descriptors: Vec<UpdateMethodDescriptor>,
    /// All diagnostics, in discovery order.
    pub diagnostics: Vec<Diagnostic>
}

/// Validate the resolution of `source`.
#[must_use]
pub fn validate(source: &TypeInfo, resolution: Resolution, table: &TypeTable) -> Validation {
    let mut validation = Validation::default();

    for unmatched in resolution.unmatched {
        validation.diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnknownMethod {
                method: unmatched.method_name
            },
            unmatched.location
        ));
    }

    for method in resolution.methods {
        let mut found = Vec::new();
        check_method(source, &method, table, &mut found);
        for binding in &method.bindings {
            check_binding(binding, &mut found);
        }

        let failed = found.iter().any(Diagnostic::is_error);
        validation.diagnostics.extend(found);
        if failed {
            tracing::debug!(
                source = %method.source_type,
                target = %method.target_type,
                method = %method.method_name,
                "update method dropped by validation"
            );
            continue;
        }
        validation.descriptors.push(into_descriptor(method));
    }

    validation
}

fn check_method(
    source: &TypeInfo,
    method: &ResolvedMethod,
    table: &TypeTable,
    out: &mut Vec<Diagnostic>
) {
    let at = || method.location.clone();

    if !is_emittable(&method.method_name) {
        out.push(Diagnostic::new(
            DiagnosticKind::InvalidIdentifier {
                name: method.method_name.clone()
            },
            at()
        ));
    }

    let Some(target) = table.get(&method.target_type).filter(|_| method.target_found) else {
        out.push(Diagnostic::new(
            DiagnosticKind::TargetTypeNotFound {
                target: method.target_type.clone()
            },
            at()
        ));
        return;
    };

    if let Some(PathProblem::InvalidNested {
        path,
        target
    }) = &method.prefix_problem
    {
        out.push(Diagnostic::new(
            DiagnosticKind::InvalidNestedProperty {
                path: path.clone(),
                target: target.clone()
            },
            at()
        ));
    }

    if method.requires_extensible_target && !target.extensible {
        out.push(Diagnostic::new(
            DiagnosticKind::ExtensibleTargetMissing {
                target: target.name.clone(),
                method: method.method_name.clone()
            },
            at()
        ));
    }

    let owner = if target.has_member_named(&method.method_name) {
        Some(&target.name)
    } else if !method.requires_extensible_target
        && source.methods.iter().any(|name| *name == method.method_name)
    {
        Some(&source.name)
    } else {
        None
    };
    if let Some(owner) = owner {
        out.push(Diagnostic::new(
            DiagnosticKind::MethodNameAlreadyExists {
                method: method.method_name.clone(),
                owner: owner.clone()
            },
            at()
        ));
    }
}

fn check_binding(binding: &ResolvedBinding, out: &mut Vec<Diagnostic>) {
    let mut report = |kind| out.push(Diagnostic::new(kind, binding.location.clone()));

    if let BindingSource::Property {
        name, ..
    } = &binding.source
    {
        if !is_emittable(name) {
            report(DiagnosticKind::InvalidIdentifier {
                name: name.clone()
            });
        }
        if binding.spec.is_source_array == Some(true) {
            report(DiagnosticKind::IsSourceArrayNotApplicable);
        }
    }

    let target = match &binding.target {
        Ok(target) => target,
        Err(PathProblem::TargetNameMissing) => {
            report(DiagnosticKind::TargetPropertyNameMissing);
            return;
        }
        Err(PathProblem::PropertyNotFound {
            property,
            target
        }) => {
            report(DiagnosticKind::PropertyNotFound {
                property: property.clone(),
                target: target.clone()
            });
            return;
        }
        Err(PathProblem::InvalidNested {
            path,
            target
        }) => {
            report(DiagnosticKind::InvalidNestedProperty {
                path: path.clone(),
                target: target.clone()
            });
            return;
        }
        // Reported once on the method.
        Err(PathProblem::TargetTypeMissing | PathProblem::PrefixInvalid) => return
    };

    for kind in applicability(binding, target) {
        report(kind);
    }
}

/// Option rules that need the resolved target facts.
fn applicability(binding: &ResolvedBinding, target: &ResolvedTarget) -> Vec<DiagnosticKind> {
    let facts = &target.facts;
    let spec = &binding.spec;
    let property = || target.path.clone();
    let handling = binding.options.collection_handling;
    let mut found = Vec::new();

    if handling != CollectionHandling::Set {
        if !facts.is_collection {
            found.push(DiagnosticKind::CollectionHandlingNotApplicable {
                property: property(),
                handling
            });
        } else if facts.ty.is_map() {
            found.push(DiagnosticKind::CollectionHandlingNotSupported {
                property: property(),
                handling,
                reason: "map-valued fields are stored as sub-documents, not arrays".to_string()
            });
        }
    }

    if spec.ignore_empty.is_some() && !facts.is_collection && !facts.is_string {
        found.push(DiagnosticKind::IgnoreEmptyNotApplicable {
            property: property()
        });
    }

    if spec.use_string_empty.is_some() && !facts.is_string {
        found.push(DiagnosticKind::UseStringEmptyNotApplicable {
            property: property()
        });
    }

    let source_nullable = match &binding.source {
        BindingSource::Property {
            ty, ..
        } => ty.nullable,
        BindingSource::Instance => false
    };
    if spec.ignore_null.is_some() && !source_nullable && !facts.is_nullable_or_reference {
        found.push(DiagnosticKind::IgnoreNullNotApplicable {
            property: property()
        });
    }

    if handling == CollectionHandling::Set
        && binding.source.is_sequence(&binding.options)
        && !facts.is_collection
    {
        found.push(DiagnosticKind::PropertyNotEnumerable {
            property: property(),
            target: binding
                .location
                .target_type
                .clone()
                .unwrap_or_default()
        });
    }

    found
}

fn into_descriptor(method: ResolvedMethod) -> UpdateMethodDescriptor {
    let bindings = method
        .bindings
        .into_iter()
        .filter_map(|binding| {
            let target = binding.target.ok()?;
            Some(PropertyBinding {
                order: binding.order,
                source: binding.source,
                resolved_target_path: target.path,
                options: binding.options,
                facts: target.facts,
                expression: binding.spec.append_source_expression,
                location: binding.location
            })
        })
        .collect();

    UpdateMethodDescriptor {
        source_type: method.source_type,
        target_type_name: method.target_type,
        method_name: method.method_name,
        bindings,
        requires_extensible_target: method.requires_extensible_target,
        location: method.location
    }
}
