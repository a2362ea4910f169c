// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use docupdate::update_models;

#[update_models]
mod models {
    pub struct GroupModel {
        pub name: String,
        pub tags: Vec<String>,
    }

    #[update(target = "GroupModel")]
    pub struct GroupRequest {
        pub name: String,
        #[update_property(handling = "add_to_set")]
        pub tags: Vec<String>,
        #[update_ignore]
        pub audit: String,
    }
}

use models::{GroupRequest, GroupRequestUpdateExt};

fn main() {
    let request = GroupRequest {
        name: "core".into(),
        tags: vec!["rust".into()],
        audit: String::new()
    };
    let update = request.to_update().unwrap();
    assert_eq!(update.len(), 2);
}
