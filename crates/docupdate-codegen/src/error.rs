// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Failures of the generator entry points.
//!
//! Problems with update metadata are [`Diagnostic`](crate::Diagnostic)s.
//! This type only covers input that cannot be analysed at all.

use thiserror::Error;

/// Error returned by [`generate`](crate::pipeline::generate) and
/// [`generate_source`](crate::generate_source).
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The unit is not valid Rust.
    #[error("failed to parse source: {0}")]
    Parse(#[from] syn::Error),

    /// Malformed update attributes.
    #[error("invalid update attributes: {0}")]
    Attributes(String),

    /// `runtime_path` is not a Rust path.
    #[error("`{0}` is not a valid runtime crate path")]
    InvalidRuntimePath(String)
}

impl From<darling::Error> for GenerateError {
    fn from(error: darling::Error) -> Self {
        Self::Attributes(error.to_string())
    }
}
