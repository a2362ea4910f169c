// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Tests for code emission.

use super::*;
use crate::{
    aggregate::{aggregate, declared_methods},
    reader::read_items,
    resolve::resolve,
    validate::validate
};

fn descriptors(file: syn::File) -> Vec<UpdateMethodDescriptor> {
    let table = read_items(&file.items).unwrap().table;
    let config = GeneratorConfig::default();
    let mut all = Vec::new();
    for source in table.sources() {
        let resolution = resolve(source, &table, &config);
        let declared = declared_methods(&resolution);
        let validation = validate(source, resolution, &table);
        assert!(validation.diagnostics.is_empty(), "{:?}", validation.diagnostics);
        all.extend(aggregate(validation.descriptors, &declared, &config).descriptors);
    }
    all
}

fn compact(emission: &Emission) -> String {
    emission.tokens.to_string().replace(' ', "")
}

fn emit_with(config: &GeneratorConfig, file: syn::File) -> Emission {
    Emitter::new(config).unwrap().emit(&descriptors(file))
}

fn emit(file: syn::File) -> Emission {
    emit_with(&GeneratorConfig::default(), file)
}

#[test]
fn extension_trait_per_source() {
    let emission = emit(syn::parse_quote! {
        pub struct GroupModel {
            pub name: String,
            pub enabled: bool,
        }

        #[update(target = "GroupModel")]
        pub struct GroupRequest {
            pub name: String,
            pub enabled: bool,
        }
    });
    assert!(emission.diagnostics.is_empty());
    let code = compact(&emission);
    assert!(code.contains("pubtraitGroupRequestUpdateExt"));
    assert!(code.contains("implGroupRequestUpdateExtforGroupRequest"));
    assert!(code.contains(
        "fnto_update(&self)->::docupdate::UpdateResult<::docupdate::UpdateDefinition<GroupModel>>"
    ));
    assert!(code.contains("letsource=self;"));
    assert!(code.contains("if!source.name.is_empty(){update=update.set(\"name\",&source.name)?;}"));
    assert!(code.contains("update=update.set(\"enabled\",&source.enabled)?;"));
    assert!(code.contains("::core::result::Result::Ok(update)"));
}

#[test]
fn optional_source_is_skipped_when_none() {
    let emission = emit(syn::parse_quote! {
        pub struct GroupModel {
            pub owner: Option<String>,
            pub note: Option<String>,
        }

        #[update(target = "GroupModel")]
        pub struct GroupRequest {
            pub owner: Option<String>,
            #[update_property(ignore_null = false, ignore_empty = false)]
            pub note: Option<String>,
        }
    });
    let code = compact(&emission);
    assert!(code.contains(
        "iflet::core::option::Option::Some(current)=&source.owner{if!current.is_empty(){update=update.set(\"owner\",current)?;}}"
    ));
    assert!(code.contains("update=update.set(\"note\",&source.note)?;"));
}

#[test]
fn optional_source_without_ignore_null_keeps_empty_guard() {
    let emission = emit(syn::parse_quote! {
        pub struct GroupModel {
            pub tags: Option<Vec<String>>,
        }

        #[update(target = "GroupModel")]
        pub struct GroupRequest {
            #[update_property(ignore_null = false)]
            pub tags: Option<Vec<String>>,
        }
    });
    let code = compact(&emission);
    assert!(code.contains(
        "if!source.tags.as_ref().is_some_and(|current|current.is_empty()){update=update.set(\"tags\",&source.tags)?;}"
    ));
}

#[test]
fn collection_handling_selects_builder_call() {
    let emission = emit(syn::parse_quote! {
        pub struct UserModel {
            pub groups: Vec<String>,
            pub history: Vec<String>,
            pub blocked: Vec<String>,
        }

        #[update(target = "UserModel", ignore_unmarked)]
        pub struct UserChange {
            #[update_property(handling = "add_to_set", ignore_empty = false)]
            pub groups: Vec<String>,
            #[update_property(target = "history", handling = "push")]
            pub event: String,
            #[update_property(target = "blocked", handling = "pull_all")]
            pub unblocked: String,
        }
    });
    let code = compact(&emission);
    assert!(code.contains("update=update.add_to_set_each(\"groups\",&source.groups)?;"));
    assert!(code.contains("update=update.push(\"history\",&source.event)?;"));
    assert!(code.contains(
        "update=update.pull_all(\"blocked\",::core::iter::once(&source.unblocked))?;"
    ));
}

#[test]
fn nested_paths_use_stored_names() {
    let emission = emit(syn::parse_quote! {
        pub struct CollectionModel {
            #[serde(rename = "Templates")]
            pub templates: Vec<TemplateModel>,
        }

        #[serde(rename_all = "camelCase")]
        pub struct TemplateModel {
            pub single_item: bool,
        }

        #[update(target = "CollectionModel", nested = "templates[$]")]
        pub struct UpdateTemplate {
            pub single_item: bool,
        }
    });
    let code = compact(&emission);
    assert!(code.contains("update=update.set(\"Templates.$.singleItem\",&source.single_item)?;"));
}

#[test]
fn extensible_target_gets_inherent_function() {
    let emission = emit(syn::parse_quote! {
        #[update_target(extensible)]
        pub struct GroupModel {
            pub name: String,
        }

        #[update(target = "GroupModel", method = "from_request", extensible)]
        pub struct GroupRequest {
            #[update_property(ignore_empty = false)]
            pub name: String,
        }
    });
    let code = compact(&emission);
    assert!(code.contains("implGroupModel{"));
    assert!(code.contains("pubfnfrom_request(source:&GroupRequest)"));
    assert!(!code.contains("UpdateExt"));
}

#[test]
fn type_level_binding_writes_instance() {
    let emission = emit(syn::parse_quote! {
        pub struct CollectionModel {
            pub templates: Vec<ApiTemplate>,
        }

        #[update(target = "CollectionModel", method = "to_add_template", ignore_unmarked)]
        #[update_property(target = "templates", handling = "push")]
        pub struct ApiTemplate {
            pub name: String,
        }
    });
    let code = compact(&emission);
    assert!(code.contains("update=update.push(\"templates\",source)?;"));
}

#[test]
fn source_array_instance_uses_each() {
    let emission = emit(syn::parse_quote! {
        pub struct CollectionModel {
            pub templates: Vec<String>,
        }

        #[update(target = "CollectionModel", method = "to_add_all", ignore_unmarked)]
        #[update_property(target = "templates", handling = "add_to_set", source_array)]
        pub struct TemplateBatch {
            pub names: Vec<String>,
        }
    });
    let code = compact(&emission);
    assert!(code.contains("update=update.add_to_set_each(\"templates\",source)?;"));
}

#[test]
fn expression_override_replaces_value() {
    let emission = emit(syn::parse_quote! {
        pub struct GroupModel {
            pub slug: String,
            pub tags: Vec<String>,
        }

        #[update(target = "GroupModel", ignore_unmarked)]
        pub struct GroupRequest {
            #[update_property(expr = "source.slug.to_lowercase()")]
            pub slug: String,
            #[update_property(handling = "add_to_set", expr = "source.tags.iter().map(|tag| tag.trim())")]
            pub tags: Vec<String>,
        }
    });
    let code = compact(&emission);
    assert!(code.contains(
        "if!source.slug.is_empty(){update=update.set(\"slug\",&(source.slug.to_lowercase()))?;}"
    ));
    assert!(code.contains(
        "update=update.add_to_set_each(\"tags\",(source.tags.iter().map(|tag|tag.trim())))?;"
    ));
}

#[test]
fn broken_expression_drops_the_method() {
    let emission = emit(syn::parse_quote! {
        pub struct GroupModel {
            pub slug: String,
        }

        #[update(target = "GroupModel", method = "to_slug", ignore_unmarked)]
        #[update(target = "GroupModel", method = "to_plain", ignore_unmarked)]
        pub struct GroupRequest {
            #[update_property(method = "to_slug", expr = "source.slug.(")]
            #[update_property(method = "to_plain")]
            pub slug: String,
        }
    });
    assert_eq!(emission.diagnostics.len(), 1);
    assert_eq!(emission.diagnostics[0].code(), "UPD018");
    let code = compact(&emission);
    assert!(code.contains("fnto_plain"));
    assert!(!code.contains("fnto_slug"));
}

#[test]
fn keyword_fields_become_raw_identifiers() {
    let emission = emit(syn::parse_quote! {
        pub struct Item {
            pub r#type: u32,
        }

        #[update(target = "Item")]
        pub struct ItemRequest {
            pub r#type: u32,
        }
    });
    let code = compact(&emission);
    assert!(code.contains("update=update.set(\"type\",&source.r#type)?;"));
}

#[test]
fn runtime_path_and_suffix_are_configurable() {
    let config = GeneratorConfig {
        extension_suffix: "Patch".into(),
        ..GeneratorConfig::default().with_runtime_path("crate::runtime")
    };
    let emission = emit_with(
        &config,
        syn::parse_quote! {
            pub struct GroupModel {
                pub count: u32,
            }

            #[update(target = "GroupModel")]
            pub struct GroupRequest {
                pub count: u32,
            }
        }
    );
    let code = compact(&emission);
    assert!(code.contains("pubtraitGroupRequestPatch"));
    assert!(code.contains("crate::runtime::UpdateDefinition::<GroupModel>::new()"));
}

#[test]
fn invalid_runtime_path_is_an_error() {
    let config = GeneratorConfig::default().with_runtime_path("not a path");
    assert!(matches!(
        Emitter::new(&config),
        Err(GenerateError::InvalidRuntimePath(_))
    ));
}

#[test]
fn output_is_deterministic() {
    let file: syn::File = syn::parse_quote! {
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
        }

        #[update(target = "UserModel")]
        pub struct UserRename {
            pub name: String,
        }
    };
    let first = emit(file.clone()).tokens.to_string();
    let second = emit(file).tokens.to_string();
    assert_eq!(first, second);
}
