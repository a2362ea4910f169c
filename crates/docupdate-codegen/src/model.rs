// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Language-neutral metadata model.
//!
//! Every stage of the compiler works on plain data defined here, never on
//! `syn` trees. The syn front-end in [`reader`](crate::reader) and a JSON
//! schema file both produce the same [`TypeTable`].
//!
//! # Module Structure
//!
//! ```text
//! model/
//! ├── table.rs   — TypeTable, TypeInfo, MemberInfo, TypeRef
//! ├── spec.rs    — MarkerSpec, PropertySpec, CollectionHandling
//! ├── path.rs    — target path grammar (`items[$].name`)
//! └── binding.rs — resolved bindings and method descriptors
//! ```

mod binding;
mod path;
mod spec;
mod table;

pub use binding::{
    BindingSource, EffectiveOptions, PropertyBinding, TargetFacts, UpdateMethodDescriptor
};
pub use path::{PathIndex, PathSegment, PathSyntaxError, TargetPath};
pub use spec::{CollectionHandling, MarkerSpec, PropertySpec};
pub use table::{MemberInfo, TypeInfo, TypeKind, TypeRef, TypeTable, simple_type_name};
