// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Pipeline driver.
//!
//! Every source type is an independent unit: resolve, validate and
//! aggregate share no mutable state across units, so units run on the rayon
//! pool. Results are merged into a deterministic order before emission,
//! which always happens on the calling thread.
//!
//! ```text
//! TypeTable ──► per source type (parallel) ──► merge ──► Emitter ──► TokenStream
//!                resolve → validate → aggregate   sort      (calling thread)
//! ```


use std::{
    collections::BTreeSet,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering}
    }
};

use proc_macro2::TokenStream;
use rayon::prelude::*;

use crate::{
    GenerateError,
    aggregate::{aggregate, declared_methods},
    config::GeneratorConfig,
    diagnostic::{Diagnostic, DiagnosticKind, sort_diagnostics},
    emit::Emitter,
    model::{TypeInfo, TypeTable, UpdateMethodDescriptor},
    resolve::resolve,
    validate::validate
};

/// Cooperative cancellation flag shared with the surrounding build.
///
/// Checked at every stage boundary of every unit. A unit that observes the
/// flag contributes nothing to the pass.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>
}

impl Cancellation {
    /// A flag that is not set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Merged analysis of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Descriptors sorted by `(target, method, source)`.
    pub descriptors: Vec<UpdateMethodDescriptor>,
    /// Diagnostics sorted by `(target, method, source)`, stable within a key.
    pub diagnostics: Vec<Diagnostic>,
    /// Source types that were cancelled, in table order.
    pub cancelled: Vec<String>
}

/// Output of a full generator run.
#[derive(Debug, Default)]
pub struct Generated {
    /// Generated items.
    pub tokens: TokenStream,
    /// Descriptors that were emitted.
    pub descriptors: Vec<UpdateMethodDescriptor>,
    /// All diagnostics of the pass.
    pub diagnostics: Vec<Diagnostic>,
    /// Source types that were cancelled.
    pub cancelled: Vec<String>
}

impl Generated {
    /// Whether any error-severity diagnostic was raised.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

enum Outcome {
    Done {
        descriptors: Vec<UpdateMethodDescriptor>,
        diagnostics: Vec<Diagnostic>
    },
    Cancelled(String)
}

/// Analyse every source type of `table`.
#[must_use]
pub fn analyze(
    table: &TypeTable,
    config: &GeneratorConfig,
    cancellation: &Cancellation
) -> Analysis {
    let sources: Vec<&TypeInfo> = table.sources().collect();
    analyze_units(&sources, table, config, cancellation)
}

/// Analyse only the named source types.
///
/// Used to re-run a changed subset; names that are not source types are
/// ignored.
#[must_use]
pub fn analyze_subset(
    table: &TypeTable,
    names: &[&str],
    config: &GeneratorConfig,
    cancellation: &Cancellation
) -> Analysis {
    let sources: Vec<&TypeInfo> = table
        .sources()
        .filter(|source| names.contains(&source.name.as_str()))
        .collect();
    analyze_units(&sources, table, config, cancellation)
}

/// Analyse and emit.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidRuntimePath`] for an unusable
/// `runtime_path`. Metadata problems are diagnostics, never errors.
pub fn generate(
    table: &TypeTable,
    config: &GeneratorConfig,
    cancellation: &Cancellation
) -> Result<Generated, GenerateError> {
    let emitter = Emitter::new(config)?;
    let analysis = analyze(table, config, cancellation);

    if cancellation.is_cancelled() {
        tracing::warn!("update generation cancelled before emission");
        return Ok(Generated {
            cancelled: table.sources().map(|source| source.name.clone()).collect(),
            ..Generated::default()
        });
    }

    let mut diagnostics = analysis.diagnostics;
    let descriptors = without_errors(analysis.descriptors, &diagnostics);
    let emission = emitter.emit(&descriptors);
    diagnostics.extend(emission.diagnostics);
    sort_diagnostics(&mut diagnostics);
    let descriptors = without_errors(descriptors, &diagnostics);

    Ok(Generated {
        tokens: emission.tokens,
        descriptors,
        diagnostics,
        cancelled: analysis.cancelled
    })
}

/// Drop descriptors an error diagnostic points at.
fn without_errors(
    descriptors: Vec<UpdateMethodDescriptor>,
    diagnostics: &[Diagnostic]
) -> Vec<UpdateMethodDescriptor> {
    let dropped: BTreeSet<(&str, &str, &str)> = diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.is_error())
        .filter_map(|diagnostic| {
            let location = &diagnostic.location;
            Some((
                location.target_type.as_deref()?,
                location.method.as_deref()?,
                location.source_type.as_str()
            ))
        })
        .collect();
    descriptors
        .into_iter()
        .filter(|descriptor| !dropped.contains(&descriptor.sort_key()))
        .collect()
}

fn analyze_units(
    sources: &[&TypeInfo],
    table: &TypeTable,
    config: &GeneratorConfig,
    cancellation: &Cancellation
) -> Analysis {
    tracing::debug!(units = sources.len(), parallel = config.parallel, "analysing update models");
    let outcomes: Vec<Outcome> = if config.parallel {
        sources
            .par_iter()
            .map(|source| analyze_unit(source, table, config, cancellation))
            .collect()
    } else {
        sources
            .iter()
            .map(|source| analyze_unit(source, table, config, cancellation))
            .collect()
    };
    merge(outcomes)
}

fn analyze_unit(
    source: &TypeInfo,
    table: &TypeTable,
    config: &GeneratorConfig,
    cancellation: &Cancellation
) -> Outcome {
    let span = tracing::debug_span!("update_unit", source = %source.name);
    let _entered = span.enter();
    let cancelled = || {
        let cancelled = cancellation.is_cancelled();
        if cancelled {
            tracing::warn!("unit cancelled");
        }
        cancelled
    };

    if cancelled() {
        return Outcome::Cancelled(source.name.clone());
    }
    let resolution = resolve(source, table, config);
    if cancelled() {
        return Outcome::Cancelled(source.name.clone());
    }
    let declared = declared_methods(&resolution);
    let validation = validate(source, resolution, table);
    if cancelled() {
        return Outcome::Cancelled(source.name.clone());
    }
    let aggregation = aggregate(validation.descriptors, &declared, config);
    if cancelled() {
        return Outcome::Cancelled(source.name.clone());
    }

    let mut diagnostics = validation.diagnostics;
    diagnostics.extend(aggregation.diagnostics);
    tracing::debug!(
        descriptors = aggregation.descriptors.len(),
        diagnostics = diagnostics.len(),
        "unit analysed"
    );
    Outcome::Done {
        descriptors: aggregation.descriptors,
        diagnostics
    }
}

/// Deterministic merge of unit results.
///
/// Inherent functions live in the target's namespace, so two source types
/// generating the same extensible `(target, method)` clash; the first by
/// source name keeps it.
fn merge(outcomes: Vec<Outcome>) -> Analysis {
    let mut analysis = Analysis::default();
    let mut descriptors = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Done {
                descriptors: unit,
                diagnostics
            } => {
                descriptors.extend(unit);
                analysis.diagnostics.extend(diagnostics);
            }
            Outcome::Cancelled(name) => analysis.cancelled.push(name)
        }
    }

    descriptors.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    let mut claimed = BTreeSet::new();
    for descriptor in descriptors {
        if descriptor.requires_extensible_target
            && !claimed.insert((
                descriptor.target_type_name.clone(),
                descriptor.method_name.clone()
            ))
        {
            analysis.diagnostics.push(Diagnostic::new(
                DiagnosticKind::DuplicateMethod {
                    method: descriptor.method_name.clone(),
                    target: descriptor.target_type_name.clone()
                },
                descriptor.location.clone()
            ));
            continue;
        }
        analysis.descriptors.push(descriptor);
    }

    sort_diagnostics(&mut analysis.diagnostics);
    analysis
}
