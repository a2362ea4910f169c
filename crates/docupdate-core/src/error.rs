// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error type for building partial-update definitions.

use thiserror::Error;

/// Errors raised while composing an [`UpdateDefinition`](crate::UpdateDefinition).
#[derive(Debug, Error)]
pub enum UpdateError {
    /// A value could not be converted into BSON.
    #[error("cannot serialize value for `{path}`: {source}")]
    Serialization {
        /// Field path the value was destined for.
        path: String,
        /// Underlying BSON serializer error.
        #[source]
        source: bson::error::Error
    },

    /// An operation was requested with an empty field path.
    #[error("update field path must not be empty")]
    EmptyPath
}

/// Result alias used by generated update callables.
pub type UpdateResult<T> = Result<T, UpdateError>;
