// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # docupdate
//!
//! Compile-time partial-update builders for document stores. Re-exports:
//! - [`update_models`] attribute macro from `docupdate-macros`
//! - All runtime types from `docupdate-core` ([`UpdateDefinition`],
//!   [`UpdateOperation`], [`UpdateError`])
//!
//! # Quick Start
//!
//! ```rust
//! use docupdate::{bson::doc, update_models};
//!
//! #[update_models]
//! mod models {
//!     pub struct UserModel {
//!         pub name: String,
//!         pub groups: Vec<String>,
//!     }
//!
//!     #[update(target = "UserModel", method = "to_add_group", ignore_unmarked)]
//!     pub struct AddGroup {
//!         #[update_property(handling = "add_to_set")]
//!         pub groups: Vec<String>,
//!     }
//! }
//!
//! use models::{AddGroup, AddGroupUpdateExt};
//!
//! let request = AddGroup {
//!     groups: vec!["admins".into()]
//! };
//! let update = request.to_add_group().unwrap();
//! assert_eq!(
//!     update.to_document(),
//!     doc! { "$addToSet": { "groups": { "$each": ["admins"] } } }
//! );
//! ```

pub use docupdate_core::*;
pub use docupdate_macros::update_models;
