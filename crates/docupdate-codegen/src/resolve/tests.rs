// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Tests for binding resolution.

use super::*;
use crate::reader::read_items;

fn table(file: syn::File) -> TypeTable {
    read_items(&file.items).unwrap().table
}

fn resolve_first(table: &TypeTable, source: &str) -> Resolution {
    let info = table.get(source).unwrap();
    resolve(info, table, &GeneratorConfig::default())
}

fn paths(method: &ResolvedMethod) -> Vec<String> {
    method
        .bindings
        .iter()
        .map(|binding| match &binding.target {
            Ok(target) => target.path.clone(),
            Err(problem) => format!("{problem:?}")
        })
        .collect()
}

fn groups_table() -> TypeTable {
    table(syn::parse_quote! {
        pub struct GroupModel {
            pub name: String,
            pub tags: Vec<String>,
            pub owner: Option<String>,
        }

        #[update(target = "GroupModel")]
        pub struct GroupRequest {
            pub name: String,
            #[update_property(handling = "add_to_set")]
            pub tags: Vec<String>,
            #[update_ignore]
            pub owner: Option<String>,
            secret: String,
        }
    })
}

#[test]
fn unmarked_public_fields_bind_implicitly() {
    let table = groups_table();
    let resolution = resolve_first(&table, "GroupRequest");
    assert_eq!(resolution.methods.len(), 1);
    let method = &resolution.methods[0];
    assert_eq!(method.method_name, "to_update");
    assert_eq!(method.target_type, "GroupModel");
    assert!(method.target_found);
    assert_eq!(paths(method), vec!["name", "tags"]);
    assert!(resolution.unmatched.is_empty());
}

#[test]
fn ignore_unmarked_keeps_explicit_only() {
    let table = table(syn::parse_quote! {
        pub struct GroupModel {
            pub name: String,
            pub tags: Vec<String>,
        }

        #[update(target = "GroupModel", ignore_unmarked)]
        pub struct GroupRequest {
            pub name: String,
            #[update_property]
            pub tags: Vec<String>,
        }
    });
    let resolution = resolve_first(&table, "GroupRequest");
    assert_eq!(paths(&resolution.methods[0]), vec!["tags"]);
}

#[test]
fn nested_marker_prefixes_stored_names() {
    let table = table(syn::parse_quote! {
        pub struct CollectionModel {
            #[serde(rename = "Templates")]
            pub templates: Vec<TemplateModel>,
        }

        #[serde(rename_all = "camelCase")]
        pub struct TemplateModel {
            pub disabled: bool,
            pub single_item: bool,
            pub template: Option<String>,
        }

        #[update(target = "CollectionModel", method = "to_update_template", nested = "templates[$]")]
        pub struct UpdateTemplate {
            pub disabled: bool,
            pub template: Option<String>,
            pub single_item: bool,
        }
    });
    let resolution = resolve_first(&table, "UpdateTemplate");
    let method = &resolution.methods[0];
    assert!(method.prefix_problem.is_none());
    assert_eq!(
        paths(method),
        vec![
            "Templates.$.disabled",
            "Templates.$.template",
            "Templates.$.singleItem"
        ]
    );
    let template = &method.bindings[1];
    let facts = &template.target.as_ref().unwrap().facts;
    assert!(facts.is_nullable_or_reference);
    assert!(facts.is_string);
}

#[test]
fn nested_marker_must_end_on_element() {
    let table = table(syn::parse_quote! {
        pub struct CollectionModel {
            pub templates: Vec<TemplateModel>,
        }

        pub struct TemplateModel {
            pub disabled: bool,
        }

        #[update(target = "CollectionModel", nested = "templates")]
        pub struct UpdateTemplate {
            pub disabled: bool,
        }
    });
    let resolution = resolve_first(&table, "UpdateTemplate");
    let method = &resolution.methods[0];
    assert!(matches!(
        method.prefix_problem,
        Some(PathProblem::InvalidNested { .. })
    ));
    assert_eq!(
        method.bindings[0].target,
        Err(PathProblem::PrefixInvalid)
    );
}

#[test]
fn type_level_spec_requires_target_name() {
    let table = table(syn::parse_quote! {
        pub struct CollectionModel {
            pub templates: Vec<String>,
        }

        #[update(target = "CollectionModel", ignore_unmarked)]
        #[update_property(handling = "push")]
        pub struct ApiTemplate {
            pub name: String,
        }
    });
    let resolution = resolve_first(&table, "ApiTemplate");
    let binding = &resolution.methods[0].bindings[0];
    assert_eq!(binding.source, BindingSource::Instance);
    assert_eq!(binding.target, Err(PathProblem::TargetNameMissing));
}

#[test]
fn type_level_specs_come_first() {
    let table = table(syn::parse_quote! {
        pub struct CollectionModel {
            pub name: String,
            pub templates: Vec<ApiTemplate>,
        }

        #[update(target = "CollectionModel")]
        #[update_property(target = "templates", handling = "push")]
        pub struct ApiTemplate {
            pub name: String,
        }
    });
    let resolution = resolve_first(&table, "ApiTemplate");
    let method = &resolution.methods[0];
    assert_eq!(paths(method), vec!["templates", "name"]);
    assert_eq!(method.bindings[0].order, 0);
    assert_eq!(method.bindings[1].order, 1);
}

#[test]
fn missing_final_segment_is_not_found() {
    let table = table(syn::parse_quote! {
        pub struct GroupModel {
            pub name: String,
            pub settings: Settings,
        }

        pub struct Settings {
            pub color: String,
        }

        #[update(target = "GroupModel", ignore_unmarked)]
        pub struct GroupRequest {
            #[update_property(target = "title")]
            pub name: String,
            #[update_property(target = "settings.shade")]
            pub shade: String,
            #[update_property(target = "owner.color")]
            pub color: String,
            #[update_property(target = "settings.color")]
            pub settings_color: String,
        }
    });
    let resolution = resolve_first(&table, "GroupRequest");
    let method = &resolution.methods[0];
    assert_eq!(
        method.bindings[0].target,
        Err(PathProblem::PropertyNotFound {
            property: "title".into(),
            target: "GroupModel".into()
        })
    );
    assert_eq!(
        method.bindings[1].target,
        Err(PathProblem::PropertyNotFound {
            property: "shade".into(),
            target: "Settings".into()
        })
    );
    assert_eq!(
        method.bindings[2].target,
        Err(PathProblem::InvalidNested {
            path: "owner.color".into(),
            target: "GroupModel".into()
        })
    );
    assert_eq!(
        method.bindings[3].target.as_ref().map(|target| target.path.as_str()),
        Ok("settings.color")
    );
}

#[test]
fn unknown_target_type_is_recorded() {
    let table = table(syn::parse_quote! {
        #[update(target = "crate::models::Missing")]
        pub struct GroupRequest {
            pub name: String,
        }
    });
    let resolution = resolve_first(&table, "GroupRequest");
    let method = &resolution.methods[0];
    assert!(!method.target_found);
    assert_eq!(method.target_type, "Missing");
    assert_eq!(
        method.bindings[0].target,
        Err(PathProblem::TargetTypeMissing)
    );
}

#[test]
fn specs_route_by_method_name() {
    let table = table(syn::parse_quote! {
        pub struct UserModel {
            pub name: String,
            pub groups: Vec<String>,
        }

        #[update(target = "UserModel", method = "to_add_group", ignore_unmarked)]
        #[update(target = "UserModel", method = "to_remove_group", ignore_unmarked)]
        pub struct UserGroups {
            #[update_property(method = "to_add_group", handling = "add_to_set")]
            #[update_property(method = "to_remove_group", handling = "pull_all")]
            pub groups: Vec<String>,
            #[update_property(all_methods)]
            pub name: String,
            #[update_property(method = "to_rename")]
            pub alias: String,
        }
    });
    let resolution = resolve_first(&table, "UserGroups");
    assert_eq!(resolution.methods.len(), 2);

    let add = &resolution.methods[0];
    assert_eq!(add.method_name, "to_add_group");
    assert_eq!(paths(add), vec!["groups", "name"]);
    assert_eq!(
        add.bindings[0].options.collection_handling,
        crate::model::CollectionHandling::AddToSet
    );

    let remove = &resolution.methods[1];
    assert_eq!(paths(remove), vec!["groups", "name"]);
    assert_eq!(
        remove.bindings[0].options.collection_handling,
        crate::model::CollectionHandling::PullAll
    );

    assert_eq!(resolution.unmatched.len(), 1);
    assert_eq!(resolution.unmatched[0].method_name, "to_rename");
    assert_eq!(resolution.unmatched[0].location.member.as_deref(), Some("alias"));
}

#[test]
fn single_marker_method_is_the_spec_default() {
    let table = table(syn::parse_quote! {
        pub struct GroupModel {
            pub name: String,
        }

        #[update(target = "GroupModel", method = "to_rename", ignore_unmarked)]
        pub struct Rename {
            #[update_property]
            pub name: String,
        }
    });
    let resolution = resolve_first(&table, "Rename");
    assert!(resolution.unmatched.is_empty());
    assert_eq!(paths(&resolution.methods[0]), vec!["name"]);
}

#[test]
fn positional_indexes_render_in_path() {
    let table = table(syn::parse_quote! {
        pub struct Board {
            pub columns: Vec<Column>,
        }

        pub struct Column {
            pub cards: Vec<String>,
            pub title: String,
        }

        #[update(target = "Board", ignore_unmarked)]
        pub struct Move {
            #[update_property(target = "columns[].cards", handling = "pull_all")]
            pub card: String,
            #[update_property(target = "columns[active].title")]
            pub title: String,
            #[update_property(target = "columns[2].title")]
            pub third: String,
        }
    });
    let resolution = resolve_first(&table, "Move");
    assert_eq!(
        paths(&resolution.methods[0]),
        vec!["columns.$[].cards", "columns.$[active].title", "columns.2.title"]
    );
}
