// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generated update methods executed end to end.

#![allow(dead_code)]

use docupdate::{bson::doc, update_models};

#[update_models]
mod templates {
    use serde::Serialize;

    #[derive(Serialize)]
    pub struct CollectionModel {
        #[serde(rename = "Templates")]
        pub templates: Vec<TemplateModel>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TemplateModel {
        pub disabled: bool,
        pub single_item: bool,
        pub template: Option<String>,
    }

    #[update(target = "CollectionModel", method = "to_update_template", nested = "templates[$]")]
    pub struct UpdateTemplate {
        pub disabled: bool,
        #[update_property(ignore_null)]
        pub template: Option<String>,
        pub single_item: bool,
    }
}

#[test]
fn nested_positional_update_skips_null_property() {
    use templates::{UpdateTemplate, UpdateTemplateUpdateExt};

    let request = UpdateTemplate {
        disabled: false,
        template: None,
        single_item: true
    };
    let update = request.to_update_template().unwrap();
    assert_eq!(
        update.paths().collect::<Vec<_>>(),
        vec!["Templates.$.disabled", "Templates.$.singleItem"]
    );
    assert_eq!(
        update.to_document(),
        doc! { "$set": { "Templates.$.disabled": false, "Templates.$.singleItem": true } }
    );

    let request = UpdateTemplate {
        template: Some("compact".into()),
        ..request
    };
    let update = request.to_update_template().unwrap();
    assert_eq!(
        update.paths().collect::<Vec<_>>(),
        vec![
            "Templates.$.disabled",
            "Templates.$.template",
            "Templates.$.singleItem"
        ]
    );
}

#[update_models]
mod groups {
    pub struct UserModel {
        pub groups: Vec<String>,
    }

    #[update(target = "UserModel", method = "to_add_group", ignore_unmarked)]
    #[update(target = "UserModel", method = "to_remove_group", ignore_unmarked)]
    pub struct UserGroups {
        #[update_property(method = "to_add_group", handling = "add_to_set")]
        #[update_property(method = "to_remove_group", handling = "pull_all")]
        pub groups: Vec<String>,
        pub note: String,
    }
}

#[test]
fn one_property_feeds_two_methods() {
    use groups::{UserGroups, UserGroupsUpdateExt};

    let request = UserGroups {
        groups: vec!["admins".into(), "ops".into()],
        note: "ignored".into()
    };
    assert_eq!(
        request.to_add_group().unwrap().to_document(),
        doc! { "$addToSet": { "groups": { "$each": ["admins", "ops"] } } }
    );
    assert_eq!(
        request.to_remove_group().unwrap().to_document(),
        doc! { "$pullAll": { "groups": ["admins", "ops"] } }
    );
}

#[test]
fn empty_collection_is_skipped() {
    use groups::{UserGroups, UserGroupsUpdateExt};

    let request = UserGroups {
        groups: Vec::new(),
        note: String::new()
    };
    assert!(request.to_add_group().unwrap().is_empty());
}

#[update_models(sequential)]
mod profiles {
    #[update_target(extensible)]
    pub struct ProfileModel {
        pub display_name: String,
        pub tags: Vec<String>,
    }

    #[update(target = "ProfileModel", method = "from_rename", extensible)]
    pub struct Rename {
        pub display_name: String,
    }
}

#[test]
fn extensible_target_gets_inherent_function() {
    use profiles::{ProfileModel, Rename};

    let rename = Rename {
        display_name: "Ada".into()
    };
    assert_eq!(
        ProfileModel::from_rename(&rename).unwrap().to_document(),
        doc! { "$set": { "display_name": "Ada" } }
    );
}

#[update_models]
mod settings {
    pub struct SettingsModel {
        pub name: String,
        pub limit: i64,
        pub active: bool,
        pub note: Option<String>,
        pub tags: Option<Vec<String>>,
    }

    #[update(target = "SettingsModel")]
    pub struct SettingsRequest {
        pub name: String,
        pub limit: i64,
        pub active: bool,
    }

    #[update(target = "SettingsModel", method = "to_annotate", ignore_unmarked)]
    pub struct AnnotateRequest {
        #[update_property(ignore_null = false)]
        pub note: Option<String>,
        #[update_property(handling = "push")]
        pub tags: Option<Vec<String>>,
        #[update_property(target = "name", expr = "source.label.to_uppercase()")]
        pub label: String,
    }
}

#[test]
fn unmarked_properties_bind_in_declaration_order() {
    use settings::{SettingsRequest, SettingsRequestUpdateExt};

    let request = SettingsRequest {
        name: "main".into(),
        limit: 10,
        active: true
    };
    let update = request.to_update().unwrap();
    assert_eq!(
        update.paths().collect::<Vec<_>>(),
        vec!["name", "limit", "active"]
    );

    let request = SettingsRequest {
        name: String::new(),
        ..request
    };
    assert_eq!(
        request.to_update().unwrap().to_document(),
        doc! { "$set": { "limit": 10_i64, "active": true } }
    );
}

#[test]
fn options_shape_each_operation() {
    use settings::{AnnotateRequest, AnnotateRequestUpdateExt};

    let request = AnnotateRequest {
        note: None,
        tags: Some(vec!["a".into()]),
        label: "beta".into()
    };
    assert_eq!(
        request.to_annotate().unwrap().to_document(),
        doc! {
            "$set": { "note": null, "name": "BETA" },
            "$push": { "tags": { "$each": ["a"] } }
        }
    );

    let request = AnnotateRequest {
        note: Some("n".into()),
        tags: None,
        label: String::new()
    };
    assert_eq!(
        request.to_annotate().unwrap().to_document(),
        doc! { "$set": { "note": "n" } }
    );
}

#[update_models]
mod catalog {
    use serde::Serialize;

    pub struct CatalogModel {
        pub templates: Vec<ApiTemplate>,
    }

    #[derive(Serialize)]
    #[update(target = "CatalogModel", method = "to_add_template", ignore_unmarked)]
    #[update_property(target = "templates", handling = "push")]
    pub struct ApiTemplate {
        pub name: String,
    }
}

#[test]
fn whole_instance_is_pushed() {
    use catalog::{ApiTemplate, ApiTemplateUpdateExt};

    let template = ApiTemplate {
        name: "invoice".into()
    };
    assert_eq!(
        template.to_add_template().unwrap().to_document(),
        doc! { "$push": { "templates": { "name": "invoice" } } }
    );
}
