// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Individual field operations of a partial update.
//!
//! Every operation addresses one field path and maps onto one MongoDB update
//! operator:
//!
//! | Variant | Operator | Operand |
//! |---------|----------|---------|
//! | [`Set`](UpdateOperation::Set) | `$set` | value |
//! | [`AddToSet`](UpdateOperation::AddToSet) | `$addToSet` | element |
//! | [`AddToSetEach`](UpdateOperation::AddToSetEach) | `$addToSet` | `{ $each: [...] }` |
//! | [`Push`](UpdateOperation::Push) | `$push` | element |
//! | [`PushEach`](UpdateOperation::PushEach) | `$push` | `{ $each: [...] }` |
//! | [`PullAll`](UpdateOperation::PullAll) | `$pullAll` | `[...]` |

use bson::{Bson, doc};

/// One field-level operation of an update definition.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOperation {
    /// Replace the whole field.
    Set {
        /// Dotted field path.
        path: String,
        /// New value.
        value: Bson
    },

    /// Insert one element unless it is already present.
    AddToSet {
        /// Dotted field path.
        path: String,
        /// Element to insert.
        value: Bson
    },

    /// Insert several elements with set semantics.
    AddToSetEach {
        /// Dotted field path.
        path: String,
        /// Elements to insert.
        values: Vec<Bson>
    },

    /// Append one element.
    Push {
        /// Dotted field path.
        path: String,
        /// Element to append.
        value: Bson
    },

    /// Append several elements, keeping duplicates and order.
    PushEach {
        /// Dotted field path.
        path: String,
        /// Elements to append.
        values: Vec<Bson>
    },

    /// Remove every element equal to one of the values.
    PullAll {
        /// Dotted field path.
        path: String,
        /// Elements to remove.
        values: Vec<Bson>
    }
}

impl UpdateOperation {
    /// MongoDB update operator this operation is rendered under.
    #[must_use]
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::Set { .. } => "$set",
            Self::AddToSet { .. } | Self::AddToSetEach { .. } => "$addToSet",
            Self::Push { .. } | Self::PushEach { .. } => "$push",
            Self::PullAll { .. } => "$pullAll"
        }
    }

    /// Field path addressed by this operation.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Set { path, .. }
            | Self::AddToSet { path, .. }
            | Self::AddToSetEach { path, .. }
            | Self::Push { path, .. }
            | Self::PushEach { path, .. }
            | Self::PullAll { path, .. } => path
        }
    }

    /// Operand placed under the path inside the operator document.
    #[must_use]
    pub fn operand(&self) -> Bson {
        match self {
            Self::Set { value, .. } | Self::AddToSet { value, .. } | Self::Push { value, .. } => {
                value.clone()
            }
            Self::AddToSetEach { values, .. } | Self::PushEach { values, .. } => {
                Bson::Document(doc! { "$each": values.clone() })
            }
            Self::PullAll { values, .. } => Bson::Array(values.clone())
        }
    }
}
