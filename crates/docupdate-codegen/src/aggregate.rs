// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Method aggregation.
//!
//! Groups the validated methods of one source type by
//! `(target type, method name)`, so each pair yields at most one generated
//! callable. Ambiguity is judged on every declared marker, including those
//! validation already rejected:
//!
//! | Clash | Diagnostic | Dropped |
//! |-------|------------|---------|
//! | two markers with the same `(target, method)` | `UPD014` | every method with that pair |
//! | one method name for several targets in the extension trait | `UPD003` | every trait method with that name |
//!
//! Within a descriptor every document path may be written once.


use std::collections::{BTreeMap, BTreeSet};

use crate::{
    config::GeneratorConfig,
    diagnostic::{Diagnostic, DiagnosticKind, Location},
    model::UpdateMethodDescriptor,
    resolve::Resolution
};

/// A marker as declared, whether or not it survived validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredMethod {
    /// Target type name, unqualified.
    pub target_type: String,
    /// Callable name.
    pub method_name: String,
    /// Emitted as inherent function of the target.
    pub inherent: bool,
    /// Marker declaration site.
    pub location: Location
}

/// Every marker of a resolution, in marker order.
#[must_use]
pub fn declared_methods(resolution: &Resolution) -> Vec<DeclaredMethod> {
    resolution
        .methods
        .iter()
        .map(|method| DeclaredMethod {
            target_type: method.target_type.clone(),
            method_name: method.method_name.clone(),
            inherent: method.requires_extensible_target,
            location: method.location.clone()
        })
        .collect()
}

/// Aggregated descriptors of one source type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Descriptors sorted by `(target, method)`.
    pub descriptors: Vec<UpdateMethodDescriptor>,
    /// Collision diagnostics.
    pub diagnostics: Vec<Diagnostic>
}

/// Group descriptors and reject collisions.
///
/// `declared` lists every marker of the source type, so a pair stays
/// ambiguous even when validation dropped one of its methods.
#[must_use]
pub fn aggregate(
    descriptors: Vec<UpdateMethodDescriptor>,
    declared: &[DeclaredMethod],
    config: &GeneratorConfig
) -> Aggregation {
    let mut aggregation = Aggregation::default();
    let mut ambiguous_pairs = BTreeSet::new();
    let mut ambiguous_trait_methods = BTreeSet::new();

    let mut pairs: BTreeMap<(&str, &str), Vec<&DeclaredMethod>> = BTreeMap::new();
    for method in declared {
        pairs
            .entry((method.target_type.as_str(), method.method_name.as_str()))
            .or_default()
            .push(method);
    }
    for ((target, method), group) in &pairs {
        if group.len() > 1 {
            aggregation.diagnostics.push(Diagnostic::new(
                DiagnosticKind::DuplicateMethod {
                    method: (*method).to_string(),
                    target: (*target).to_string()
                },
                group[0].location.clone()
            ));
            ambiguous_pairs.insert((*target, *method));
        }
    }

    let mut trait_methods: BTreeMap<&str, Vec<&DeclaredMethod>> = BTreeMap::new();
    for method in declared.iter().filter(|method| !method.inherent) {
        let targets = trait_methods.entry(method.method_name.as_str()).or_default();
        if targets
            .iter()
            .all(|known| known.target_type != method.target_type)
        {
            targets.push(method);
        }
    }
    for (method, targets) in &trait_methods {
        if let [_, clash, ..] = targets.as_slice() {
            aggregation.diagnostics.push(Diagnostic::new(
                DiagnosticKind::MethodNameAlreadyExists {
                    method: (*method).to_string(),
                    owner: format!("{}{}", clash.location.source_type, config.extension_suffix)
                },
                clash.location.clone()
            ));
            ambiguous_trait_methods.insert(*method);
        }
    }

    let mut groups: BTreeMap<(String, String), Vec<UpdateMethodDescriptor>> = BTreeMap::new();
    for descriptor in descriptors {
        groups
            .entry((
                descriptor.target_type_name.clone(),
                descriptor.method_name.clone()
            ))
            .or_default()
            .push(descriptor);
    }

    for ((target, method), mut group) in groups {
        let ambiguous = group.len() > 1
            || ambiguous_pairs.contains(&(target.as_str(), method.as_str()))
            || group.iter().any(|descriptor| {
                !descriptor.requires_extensible_target
                    && ambiguous_trait_methods.contains(method.as_str())
            });
        if ambiguous {
            tracing::debug!(
                target = %target,
                method = %method,
                "ambiguous update method dropped"
            );
            continue;
        }
        let Some(mut descriptor) = group.pop() else {
            continue;
        };
        descriptor.bindings.sort_by_key(|binding| binding.order);

        let duplicates = duplicate_paths(&descriptor);
        if !duplicates.is_empty() {
            for path in duplicates {
                aggregation.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateTargetPath {
                        path,
                        method: descriptor.method_name.clone()
                    },
                    descriptor.location.clone()
                ));
            }
            continue;
        }

        tracing::debug!(
            source = %descriptor.source_type,
            target = %descriptor.target_type_name,
            method = %descriptor.method_name,
            bindings = descriptor.bindings.len(),
            "update method aggregated"
        );
        aggregation.descriptors.push(descriptor);
    }
    aggregation
}

/// Paths written by more than one binding, in first-repeat order.
fn duplicate_paths(descriptor: &UpdateMethodDescriptor) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut duplicates = Vec::new();
    for binding in &descriptor.bindings {
        let path = binding.resolved_target_path.as_str();
        if !seen.insert(path) && !duplicates.iter().any(|known| known == path) {
            duplicates.push(path.to_string());
        }
    }
    duplicates
}
