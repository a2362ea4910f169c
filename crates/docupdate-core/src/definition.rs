// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Typed partial-update builder.
//!
//! [`UpdateDefinition`] is the value returned by every generated update
//! callable. It records field operations in the order they were added and
//! renders them into a MongoDB update document on demand.
//!
//! # Example
//!
//! ```rust
//! use bson::doc;
//! use docupdate_core::UpdateDefinition;
//!
//! struct Group;
//!
//! let update = UpdateDefinition::<Group>::new()
//!     .set("name", "Editors")?
//!     .add_to_set_each("permissions", ["read", "write"])?;
//!
//! assert_eq!(
//!     update.to_document(),
//!     doc! {
//!         "$set": { "name": "Editors" },
//!         "$addToSet": { "permissions": { "$each": ["read", "write"] } }
//!     }
//! );
//! # Ok::<(), docupdate_core::UpdateError>(())
//! ```

use std::{fmt, marker::PhantomData};

use bson::{Bson, Document, ser::serialize_to_bson};
use serde::Serialize;

use crate::{
    error::{UpdateError, UpdateResult},
    operation::UpdateOperation
};

/// Ordered set of field operations scoped to the target document type `T`.
///
/// The type parameter only ties the definition to its target collection; no
/// bound is placed on it.
pub struct UpdateDefinition<T> {
    operations: Vec<UpdateOperation>,
    target: PhantomData<fn() -> T>
}

impl<T> UpdateDefinition<T> {
    /// Create an empty definition.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            operations: Vec::new(),
            target: PhantomData
        }
    }

    /// Replace the field at `path` with `value`.
    ///
    /// # Errors
    ///
    /// Fails when the path is empty or the value cannot be serialized.
    pub fn set<V>(self, path: &str, value: &V) -> UpdateResult<Self>
    where
        V: Serialize + ?Sized
    {
        let value = to_bson(path, value)?;
        Ok(self.with(UpdateOperation::Set {
            path: path.to_string(),
            value
        }))
    }

    /// Insert `value` into the array at `path` unless already present.
    ///
    /// # Errors
    ///
    /// Fails when the path is empty or the value cannot be serialized.
    pub fn add_to_set<V>(self, path: &str, value: &V) -> UpdateResult<Self>
    where
        V: Serialize + ?Sized
    {
        let value = to_bson(path, value)?;
        Ok(self.with(UpdateOperation::AddToSet {
            path: path.to_string(),
            value
        }))
    }

    /// Insert every element of `values` with set semantics (`$each`).
    ///
    /// # Errors
    ///
    /// Fails when the path is empty or an element cannot be serialized.
    pub fn add_to_set_each<I>(self, path: &str, values: I) -> UpdateResult<Self>
    where
        I: IntoIterator,
        I::Item: Serialize
    {
        let values = to_bson_array(path, values)?;
        Ok(self.with(UpdateOperation::AddToSetEach {
            path: path.to_string(),
            values
        }))
    }

    /// Append `value` to the array at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the path is empty or the value cannot be serialized.
    pub fn push<V>(self, path: &str, value: &V) -> UpdateResult<Self>
    where
        V: Serialize + ?Sized
    {
        let value = to_bson(path, value)?;
        Ok(self.with(UpdateOperation::Push {
            path: path.to_string(),
            value
        }))
    }

    /// Append every element of `values`, keeping order and duplicates.
    ///
    /// # Errors
    ///
    /// Fails when the path is empty or an element cannot be serialized.
    pub fn push_each<I>(self, path: &str, values: I) -> UpdateResult<Self>
    where
        I: IntoIterator,
        I::Item: Serialize
    {
        let values = to_bson_array(path, values)?;
        Ok(self.with(UpdateOperation::PushEach {
            path: path.to_string(),
            values
        }))
    }

    /// Remove from the array at `path` every element equal to one of
    /// `values`.
    ///
    /// # Errors
    ///
    /// Fails when the path is empty or an element cannot be serialized.
    pub fn pull_all<I>(self, path: &str, values: I) -> UpdateResult<Self>
    where
        I: IntoIterator,
        I::Item: Serialize
    {
        let values = to_bson_array(path, values)?;
        Ok(self.with(UpdateOperation::PullAll {
            path: path.to_string(),
            values
        }))
    }

    /// Append all operations of `other` after the ones already recorded.
    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        self.operations.extend(other.operations);
        self
    }

    /// Recorded operations in insertion order.
    #[must_use]
    pub fn operations(&self) -> &[UpdateOperation] {
        &self.operations
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether no operation has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Field paths touched by this definition, in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(UpdateOperation::path)
    }

    /// Render the MongoDB update document.
    ///
    /// Operators appear in the order their first operation was recorded;
    /// paths keep insertion order inside each operator.
    #[must_use]
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        for operation in &self.operations {
            let operator = operation.operator();
            match document.get_mut(operator) {
                Some(Bson::Document(fields)) => {
                    fields.insert(operation.path(), operation.operand());
                }
                _ => {
                    let mut fields = Document::new();
                    fields.insert(operation.path(), operation.operand());
                    document.insert(operator, fields);
                }
            }
        }
        document
    }

    /// Consume the definition and render the update document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.to_document()
    }

    fn with(mut self, operation: UpdateOperation) -> Self {
        self.operations.push(operation);
        self
    }
}

impl<T> Default for UpdateDefinition<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for UpdateDefinition<T> {
    fn clone(&self) -> Self {
        Self {
            operations: self.operations.clone(),
            target: PhantomData
        }
    }
}

impl<T> PartialEq for UpdateDefinition<T> {
    fn eq(&self, other: &Self) -> bool {
        self.operations == other.operations
    }
}

impl<T> fmt::Debug for UpdateDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateDefinition")
            .field("target", &std::any::type_name::<T>())
            .field("operations", &self.operations)
            .finish()
    }
}

impl<T> From<UpdateDefinition<T>> for Document {
    fn from(update: UpdateDefinition<T>) -> Self {
        update.into_document()
    }
}

fn to_bson<V>(path: &str, value: &V) -> UpdateResult<Bson>
where
    V: Serialize + ?Sized
{
    if path.is_empty() {
        return Err(UpdateError::EmptyPath);
    }
    serialize_to_bson(value).map_err(|source| UpdateError::Serialization {
        path: path.to_string(),
        source
    })
}

fn to_bson_array<I>(path: &str, values: I) -> UpdateResult<Vec<Bson>>
where
    I: IntoIterator,
    I::Item: Serialize
{
    if path.is_empty() {
        return Err(UpdateError::EmptyPath);
    }
    values
        .into_iter()
        .map(|value| to_bson(path, &value))
        .collect()
}
