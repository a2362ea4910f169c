// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime types for docupdate generated code.
//!
//! Generated update callables return an [`UpdateDefinition`] scoped to the
//! target document type. The definition can be rendered into a MongoDB update
//! document with [`UpdateDefinition::to_document`] and handed to the driver.
//!
//! # Overview
//!
//! - [`UpdateDefinition`] — ordered, typed partial update
//! - [`UpdateOperation`] — one field-level operation
//! - [`UpdateError`] / [`UpdateResult`] — composition failures

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod definition;
mod error;
mod operation;

pub use definition::UpdateDefinition;
pub use error::{UpdateError, UpdateResult};
pub use operation::UpdateOperation;

/// Re-export of the BSON crate used for rendered documents.
pub use bson;
