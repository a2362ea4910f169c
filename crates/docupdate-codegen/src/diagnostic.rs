// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Diagnostics reported by the update compiler.
//!
//! Problems with update metadata never abort the pipeline. They are
//! collected as [`Diagnostic`] values; a method with any error-severity
//! diagnostic is dropped from emission while sibling methods proceed.
//!
//! | Code | Kind |
//! |------|------|
//! | `UPD001` | [`CollectionHandlingNotApplicable`](DiagnosticKind::CollectionHandlingNotApplicable) |
//! | `UPD002` | [`IgnoreEmptyNotApplicable`](DiagnosticKind::IgnoreEmptyNotApplicable) |
//! | `UPD003` | [`MethodNameAlreadyExists`](DiagnosticKind::MethodNameAlreadyExists) |
//! | `UPD004` | [`CollectionHandlingNotSupported`](DiagnosticKind::CollectionHandlingNotSupported) |
//! | `UPD005` | [`UseStringEmptyNotApplicable`](DiagnosticKind::UseStringEmptyNotApplicable) |
//! | `UPD006` | [`ExtensibleTargetMissing`](DiagnosticKind::ExtensibleTargetMissing) |
//! | `UPD007` | [`IgnoreNullNotApplicable`](DiagnosticKind::IgnoreNullNotApplicable) |
//! | `UPD008` | [`PropertyNotFound`](DiagnosticKind::PropertyNotFound) |
//! | `UPD009` | [`PropertyNotEnumerable`](DiagnosticKind::PropertyNotEnumerable) |
//! | `UPD010` | [`IsSourceArrayNotApplicable`](DiagnosticKind::IsSourceArrayNotApplicable) |
//! | `UPD011` | [`TargetPropertyNameMissing`](DiagnosticKind::TargetPropertyNameMissing) |
//! | `UPD012` | [`TargetTypeNotFound`](DiagnosticKind::TargetTypeNotFound) |
//! | `UPD013` | [`InvalidNestedProperty`](DiagnosticKind::InvalidNestedProperty) |
//! | `UPD014` | [`DuplicateMethod`](DiagnosticKind::DuplicateMethod) |
//! | `UPD015` | [`DuplicateTargetPath`](DiagnosticKind::DuplicateTargetPath) |
//! | `UPD016` | [`InvalidIdentifier`](DiagnosticKind::InvalidIdentifier) |
//! | `UPD017` | [`UnknownMethod`](DiagnosticKind::UnknownMethod) (warning) |
//! | `UPD018` | [`InvalidSourceExpression`](DiagnosticKind::InvalidSourceExpression) |

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::model::CollectionHandling;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, emission unaffected.
    Warning,
    /// The affected method is not generated.
    Error
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error"
        })
    }
}

/// Closed set of problems the compiler reports.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Non-`set` handling on a target that is not a collection.
    #[error(
        "`handling = \"{handling}\"` is only applicable to collection properties, but `{property}` is not a collection"
    )]
    CollectionHandlingNotApplicable {
        /// Target property.
        property: String,
        /// Requested handling.
        handling: CollectionHandling
    },

    /// `ignore_empty` on a target that is neither collection nor string.
    #[error(
        "`ignore_empty` is only applicable to collection or string properties, but `{property}` is neither"
    )]
    IgnoreEmptyNotApplicable {
        /// Target property.
        property: String
    },

    /// The generated method would clash with an existing member.
    #[error("a member named `{method}` already exists on `{owner}`")]
    MethodNameAlreadyExists {
        /// Method name.
        method: String,
        /// Type that already has the member.
        owner: String
    },

    /// Handling not supported for the target element kind.
    #[error("`{handling}` is not supported for `{property}`: {reason}")]
    CollectionHandlingNotSupported {
        /// Target property.
        property: String,
        /// Requested handling.
        handling: CollectionHandling,
        /// Why the combination is rejected.
        reason: String
    },

    /// `use_string_empty` on a non-string target.
    #[error("`use_string_empty` is only applicable to string properties, but `{property}` is not a string")]
    UseStringEmptyNotApplicable {
        /// Target property.
        property: String
    },

    /// `extensible` marker on a target that has not opted in.
    #[error(
        "`{target}` must be declared with `#[update_target(extensible)]` to receive the generated `{method}`"
    )]
    ExtensibleTargetMissing {
        /// Target type.
        target: String,
        /// Method name.
        method: String
    },

    /// `ignore_null` on a non-nullable target.
    #[error("`ignore_null` is only applicable to nullable (`Option`) properties, but `{property}` is not nullable")]
    IgnoreNullNotApplicable {
        /// Target property.
        property: String
    },

    /// Final path segment missing on the target type.
    #[error("property `{property}` not found in the target type `{target}`")]
    PropertyNotFound {
        /// Missing property.
        property: String,
        /// Type searched.
        target: String
    },

    /// Array-shaped source written with `set` into a scalar target.
    #[error("property `{property}` of `{target}` is not a collection but the source value is")]
    PropertyNotEnumerable {
        /// Target property.
        property: String,
        /// Target type.
        target: String
    },

    /// `source_array` on a field-level spec.
    #[error("`source_array` is only applicable to `#[update_property]` placed on the type")]
    IsSourceArrayNotApplicable,

    /// Type-level spec without a target name.
    #[error("`target` is missing; it must be set when `#[update_property]` is placed on the type")]
    TargetPropertyNameMissing,

    /// Marker target not declared in the unit.
    #[error("target type `{target}` not found in this module")]
    TargetTypeNotFound {
        /// Target type.
        target: String
    },

    /// A non-final path segment does not resolve.
    #[error("nested property `{path}` is not found in the target type `{target}`")]
    InvalidNestedProperty {
        /// Path as written.
        path: String,
        /// Type the walk failed on.
        target: String
    },

    /// Several markers declare the same `(target, method)`.
    #[error("update method `{method}` for `{target}` is declared more than once")]
    DuplicateMethod {
        /// Method name.
        method: String,
        /// Target type.
        target: String
    },

    /// Two bindings of one method write the same path.
    #[error("target path `{path}` is written more than once by `{method}`")]
    DuplicateTargetPath {
        /// Resolved path.
        path: String,
        /// Method name.
        method: String
    },

    /// A name cannot be used as a Rust identifier.
    #[error("`{name}` is not a valid Rust identifier")]
    InvalidIdentifier {
        /// Offending name.
        name: String
    },

    /// A spec names a method no marker declares.
    #[error("`method = \"{method}\"` does not match any `#[update]` marker on this type; the attribute is ignored")]
    UnknownMethod {
        /// Method name.
        method: String
    },

    /// `expr` does not tokenize.
    #[error("`expr` of `{property}` is not valid Rust: {reason}")]
    InvalidSourceExpression {
        /// Source property or type.
        property: String,
        /// Lexer message.
        reason: String
    }
}

impl DiagnosticKind {
    /// Stable diagnostic code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CollectionHandlingNotApplicable { .. } => "UPD001",
            Self::IgnoreEmptyNotApplicable { .. } => "UPD002",
            Self::MethodNameAlreadyExists { .. } => "UPD003",
            Self::CollectionHandlingNotSupported { .. } => "UPD004",
            Self::UseStringEmptyNotApplicable { .. } => "UPD005",
            Self::ExtensibleTargetMissing { .. } => "UPD006",
            Self::IgnoreNullNotApplicable { .. } => "UPD007",
            Self::PropertyNotFound { .. } => "UPD008",
            Self::PropertyNotEnumerable { .. } => "UPD009",
            Self::IsSourceArrayNotApplicable => "UPD010",
            Self::TargetPropertyNameMissing => "UPD011",
            Self::TargetTypeNotFound { .. } => "UPD012",
            Self::InvalidNestedProperty { .. } => "UPD013",
            Self::DuplicateMethod { .. } => "UPD014",
            Self::DuplicateTargetPath { .. } => "UPD015",
            Self::InvalidIdentifier { .. } => "UPD016",
            Self::UnknownMethod { .. } => "UPD017",
            Self::InvalidSourceExpression { .. } => "UPD018"
        }
    }

    /// Severity of the kind.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UnknownMethod { .. } => Severity::Warning,
            _ => Severity::Error
        }
    }
}

/// Where a diagnostic applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    /// Source type carrying the metadata.
    pub source_type: String,
    /// Source field, when the problem is on a field.
    pub member: Option<String>,
    /// Target type of the affected method.
    pub target_type: Option<String>,
    /// Affected method.
    pub method: Option<String>
}

impl Location {
    /// Location on a source type.
    #[must_use]
    pub fn source(source_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            ..Self::default()
        }
    }

    /// Narrow to a source field.
    #[must_use]
    pub fn with_member(mut self, member: Option<&str>) -> Self {
        self.member = member.map(str::to_string);
        self
    }

    /// Attach the affected `(target, method)` pair.
    #[must_use]
    pub fn with_method(mut self, target: &str, method: &str) -> Self {
        self.target_type = Some(target.to_string());
        self.method = Some(method.to_string());
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source_type)?;
        if let Some(member) = &self.member {
            write!(f, ".{member}")?;
        }
        if let (Some(target), Some(method)) = (&self.target_type, &self.method) {
            write!(f, " ({target}::{method})")?;
        }
        Ok(())
    }
}

/// A reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Where.
    pub location: Location
}

impl Diagnostic {
    /// Create a diagnostic.
    #[must_use]
    pub const fn new(kind: DiagnosticKind, location: Location) -> Self {
        Self {
            kind,
            location
        }
    }

    /// Stable code, e.g. `UPD001`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Whether this diagnostic blocks emission of its method.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Rendered message.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Merge order: target type, method, then source type.
    #[must_use]
    pub fn sort_key(&self) -> (Option<&str>, Option<&str>, &str) {
        (
            self.location.target_type.as_deref(),
            self.location.method.as_deref(),
            &self.location.source_type
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} (at {})",
            self.severity(),
            self.code(),
            self.kind,
            self.location
        )
    }
}

/// Sort diagnostics into merge order, keeping the relative order of equal
/// keys.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}
