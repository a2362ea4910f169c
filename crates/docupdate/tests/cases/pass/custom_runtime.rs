// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

mod rt {
    pub use docupdate::*;
}

#[docupdate::update_models(runtime = "crate::rt", method = "to_patch", suffix = "Patch")]
mod models {
    pub struct ItemModel {
        pub r#type: String,
        pub counts: Option<Vec<i32>>,
    }

    #[update(target = "ItemModel")]
    pub struct ItemRequest {
        pub r#type: String,
        #[update_property(handling = "pull_all")]
        pub counts: Option<Vec<i32>>,
    }
}

use models::{ItemRequest, ItemRequestPatch};

fn main() {
    let request = ItemRequest {
        r#type: "box".into(),
        counts: None
    };
    let update: rt::UpdateDefinition<models::ItemModel> = request.to_patch().unwrap();
    assert_eq!(update.paths().collect::<Vec<_>>(), vec!["type"]);
}
