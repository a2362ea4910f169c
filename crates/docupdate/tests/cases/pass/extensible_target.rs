// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use docupdate::update_models;

#[update_models]
mod models {
    #[update_target(extensible)]
    pub struct AccountModel {
        pub email: String,
        pub roles: Vec<String>,
    }

    impl AccountModel {
        pub fn primary_role(&self) -> Option<&str> {
            self.roles.first().map(String::as_str)
        }
    }

    #[update(target = "AccountModel", method = "from_invite", extensible)]
    pub struct Invite {
        pub email: String,
        #[update_property(handling = "push")]
        pub roles: Vec<String>,
    }
}

use models::{AccountModel, Invite};

fn main() {
    let invite = Invite {
        email: "a@b.c".into(),
        roles: Vec::new()
    };
    let update = AccountModel::from_invite(&invite).unwrap();
    assert_eq!(update.paths().collect::<Vec<_>>(), vec!["email"]);
}
