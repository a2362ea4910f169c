// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use docupdate::update_models;

#[update_models]
mod models {
    pub struct UserModel {
        pub name: String,
        pub groups: Vec<String>,
    }

    #[update_target(extensible)]
    pub struct AuditModel {
        pub name: String,
    }

    #[update(target = "UserModel")]
    #[update(target = "UserModel", method = "to_join", ignore_unmarked)]
    #[update(target = "AuditModel", method = "to_audit", ignore_unmarked)]
    #[update(target = "AuditModel", method = "to_update", extensible, ignore_unmarked)]
    pub struct Rename {
        #[update_property(all_methods)]
        pub name: String,
        #[update_property(method = "to_join", handling = "push")]
        pub groups: Vec<String>,
    }
}

use models::{AuditModel, Rename, RenameUpdateExt};

fn main() {
    let rename = Rename {
        name: "ops".into(),
        groups: vec!["admins".into()]
    };
    assert_eq!(rename.to_update().unwrap().len(), 1);
    assert_eq!(rename.to_join().unwrap().len(), 2);
    assert_eq!(rename.to_audit().unwrap().len(), 1);
    assert_eq!(AuditModel::to_update(&rename).unwrap().len(), 1);
}
