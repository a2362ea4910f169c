// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Binding resolution.
//!
//! For one source type this stage decides which property specs belong to
//! which marker, adds implicit bindings for unmarked fields, and walks every
//! target path through the [`TypeTable`]. Nothing is rejected here: every
//! problem is recorded on the resolved item and turned into a diagnostic by
//! the [`validate`](crate::validate) stage.
//!
//! # Ordering
//!
//! Bindings carry a counter assigned in declaration order: type-level specs
//! first, then fields top to bottom, several specs on one field in the order
//! written. Both explicit specs and unmarked fields advance the counter, so
//! implicit and explicit bindings interleave exactly as declared.

#[cfg(test)]
mod tests;

use crate::{
    config::GeneratorConfig,
    diagnostic::Location,
    model::{
        BindingSource, EffectiveOptions, PropertySpec, TargetFacts, TargetPath, TypeInfo,
        TypeRef, TypeTable, simple_type_name
    }
};

/// Spec used for fields without `#[update_property]`.
static IMPLICIT_SPEC: PropertySpec = PropertySpec {
    target_property_name: None,
    method_name: None,
    ignore_null: None,
    ignore_empty: None,
    collection_handling: None,
    apply_to_all_methods: None,
    use_string_empty: None,
    is_source_array: None,
    append_source_expression: None
};

/// Why a target path could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathProblem {
    /// Type-level spec without `target`.
    TargetNameMissing,
    /// The last path segment names no field of its owner.
    PropertyNotFound {
        /// Segment as written.
        property: String,
        /// Owner type searched.
        target: String
    },
    /// An intermediate segment is missing, not indexable or not a known
    /// type.
    InvalidNested {
        /// Path as written.
        path: String,
        /// Type the walk started from.
        target: String
    },
    /// The marker's target type is unknown; reported once per method.
    TargetTypeMissing,
    /// The marker's nested prefix is invalid; reported once per method.
    PrefixInvalid
}

/// Resolved document path and the facts of the field it ends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Dotted stored path, e.g. `Templates.$.singleItem`.
    pub path: String,
    /// Facts about the addressed field.
    pub facts: TargetFacts
}

/// A spec attached to one method, with its target resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    /// Declaration counter.
    pub order: usize,
    /// Value origin.
    pub source: BindingSource,
    /// Spec as written; [`IMPLICIT_SPEC`] for unmarked fields.
    pub spec: PropertySpec,
    /// Spec merged with configured defaults.
    pub options: EffectiveOptions,
    /// Target path or the reason it failed.
    pub target: Result<ResolvedTarget, PathProblem>,
    /// Declaration site.
    pub location: Location
}

/// A marker with all bindings routed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMethod {
    /// Source type name.
    pub source_type: String,
    /// Target type name, unqualified.
    pub target_type: String,
    /// Callable name.
    pub method_name: String,
    /// Emit as inherent function of the target.
    pub requires_extensible_target: bool,
    /// Whether the target type exists in the table.
    pub target_found: bool,
    /// Problem with the marker's nested path, if any.
    pub prefix_problem: Option<PathProblem>,
    /// Bindings in declaration order.
    pub bindings: Vec<ResolvedBinding>,
    /// Marker declaration site.
    pub location: Location
}

/// A spec naming a method no marker declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedSpec {
    /// Method named by the spec.
    pub method_name: String,
    /// Declaration site.
    pub location: Location
}

/// Result of resolving one source type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// One entry per marker, in marker order.
    pub methods: Vec<ResolvedMethod>,
    /// Specs routed to undeclared methods.
    pub unmatched: Vec<UnmatchedSpec>
}

/// A spec before it is attached to a marker.
struct Entry<'a> {
    order: usize,
    source: BindingSource,
    member: Option<&'a str>,
    spec: &'a PropertySpec,
    methods: Vec<&'a str>
}

/// Validated prefix of a nested marker.
struct Prefix<'a> {
    parts: Vec<String>,
    owner: &'a TypeInfo
}

/// Resolve every marker of `source`.
#[must_use]
pub fn resolve(source: &TypeInfo, table: &TypeTable, config: &GeneratorConfig) -> Resolution {
    let declared = declared_methods(source, config);
    let fallback = match source.markers.as_slice() {
        [only] => config.marker_method(only),
        _ => config.default_method.as_str()
    };

    let mut unmatched = Vec::new();
    let mut explicit = Vec::new();
    let mut implicit = Vec::new();
    let mut order = 0usize;

    for spec in &source.type_specs {
        let location = Location::source(&source.name);
        explicit.push(Entry {
            order,
            source: BindingSource::Instance,
            member: None,
            spec,
            methods: route(spec, &declared, fallback, config, &mut unmatched, location)
        });
        order += 1;
    }

    for member in &source.members {
        let property = || BindingSource::Property {
            name: member.name.clone(),
            ty: member.ty.clone()
        };
        if member.specs.is_empty() {
            if member.public && !member.excluded && !member.skipped {
                implicit.push(Entry {
                    order,
                    source: property(),
                    member: Some(&member.name),
                    spec: &IMPLICIT_SPEC,
                    methods: Vec::new()
                });
            }
            order += 1;
            continue;
        }
        for spec in &member.specs {
            let location = Location::source(&source.name).with_member(Some(&member.name));
            explicit.push(Entry {
                order,
                source: property(),
                member: Some(&member.name),
                spec,
                methods: route(spec, &declared, fallback, config, &mut unmatched, location)
            });
            order += 1;
        }
    }

    let methods = source
        .markers
        .iter()
        .map(|marker| {
            let method = config.marker_method(marker);
            let target_type = simple_type_name(&marker.target_type);
            let target = table.get(target_type);
            let prefix = match (target, marker.nested_path.as_deref()) {
                (None, _) => Err(PathProblem::TargetTypeMissing),
                (Some(owner), None) => Ok(Prefix {
                    parts: Vec::new(),
                    owner
                }),
                (Some(owner), Some(nested)) => resolve_prefix(table, owner, nested)
            };

            let mut routed: Vec<&Entry<'_>> = explicit
                .iter()
                .filter(|entry| entry.methods.contains(&method))
                .collect();
            if !config.defaults.ignores_unmarked(marker) {
                routed.extend(implicit.iter());
            }
            routed.sort_by_key(|entry| entry.order);

            let bindings: Vec<ResolvedBinding> = routed
                .into_iter()
                .map(|entry| ResolvedBinding {
                    order: entry.order,
                    source: entry.source.clone(),
                    spec: entry.spec.clone(),
                    options: config.defaults.effective(entry.spec),
                    target: match &prefix {
                        Ok(prefix) => resolve_target(table, prefix, entry),
                        Err(PathProblem::TargetTypeMissing) => Err(PathProblem::TargetTypeMissing),
                        Err(_) => Err(PathProblem::PrefixInvalid)
                    },
                    location: Location::source(&source.name)
                        .with_member(entry.member)
                        .with_method(target_type, method)
                })
                .collect();

            tracing::trace!(
                source = %source.name,
                target = target_type,
                method,
                bindings = bindings.len(),
                "resolved marker"
            );

            ResolvedMethod {
                source_type: source.name.clone(),
                target_type: target_type.to_string(),
                method_name: method.to_string(),
                requires_extensible_target: config.defaults.requires_extensible(marker),
                target_found: target.is_some(),
                prefix_problem: prefix.err().filter(|problem| *problem != PathProblem::TargetTypeMissing),
                bindings,
                location: Location::source(&source.name).with_method(target_type, method)
            }
        })
        .collect();

    Resolution {
        methods,
        unmatched
    }
}

/// Methods an explicit spec binds to. Names no marker declares are
/// recorded in `unmatched`.
fn route<'a>(
    spec: &'a PropertySpec,
    declared: &[&'a str],
    fallback: &'a str,
    config: &GeneratorConfig,
    unmatched: &mut Vec<UnmatchedSpec>,
    location: Location
) -> Vec<&'a str> {
    if config.defaults.applies_to_all(spec) {
        return declared.to_vec();
    }
    let method = spec.method_name.as_deref().unwrap_or(fallback);
    if !declared.contains(&method) {
        unmatched.push(UnmatchedSpec {
            method_name: method.to_string(),
            location
        });
    }
    vec![method]
}

/// Method names declared by the markers of `source`, without repeats.
fn declared_methods<'a>(source: &'a TypeInfo, config: &'a GeneratorConfig) -> Vec<&'a str> {
    let mut declared: Vec<&str> = Vec::with_capacity(source.markers.len());
    for marker in &source.markers {
        let method = config.marker_method(marker);
        if !declared.contains(&method) {
            declared.push(method);
        }
    }
    declared
}

/// Walk a nested marker path. It must end on an indexed sequence of a known
/// user type.
fn resolve_prefix<'a>(
    table: &'a TypeTable,
    owner: &'a TypeInfo,
    nested: &str
) -> Result<Prefix<'a>, PathProblem> {
    let invalid = || PathProblem::InvalidNested {
        path: nested.to_string(),
        target: owner.name.clone()
    };
    let path = TargetPath::parse(nested).map_err(|_| invalid())?;
    if !path.ends_with_index() {
        return Err(invalid());
    }
    let (parts, ty) = walk(table, owner, &path, nested).map_err(|_| invalid())?;
    let element = ty
        .named_type()
        .and_then(|name| table.get(name))
        .ok_or_else(invalid)?;
    Ok(Prefix {
        parts,
        owner: element
    })
}

/// Resolve the target of one entry below `prefix`.
fn resolve_target(
    table: &TypeTable,
    prefix: &Prefix<'_>,
    entry: &Entry<'_>
) -> Result<ResolvedTarget, PathProblem> {
    let written = match (&entry.spec.target_property_name, entry.member) {
        (Some(name), _) => name.as_str(),
        (None, Some(member)) => member,
        (None, None) => return Err(PathProblem::TargetNameMissing)
    };
    let path = TargetPath::parse(written).map_err(|_| PathProblem::PropertyNotFound {
        property: written.to_string(),
        target: prefix.owner.name.clone()
    })?;
    let (parts, ty) = walk(table, prefix.owner, &path, written)?;
    let path = prefix
        .parts
        .iter()
        .chain(parts.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(".");
    Ok(ResolvedTarget {
        path,
        facts: TargetFacts::from(ty)
    })
}

/// Follow `path` from `owner`, returning the stored path parts and the type
/// of the last addressed field.
fn walk(
    table: &TypeTable,
    owner: &TypeInfo,
    path: &TargetPath,
    written: &str
) -> Result<(Vec<String>, TypeRef), PathProblem> {
    let invalid = |owner: &TypeInfo| PathProblem::InvalidNested {
        path: written.to_string(),
        target: owner.name.clone()
    };
    let segments = path.segments();
    let mut current = owner;
    let mut parts = Vec::with_capacity(segments.len() * 2);

    for (position, segment) in segments.iter().enumerate() {
        let last = position + 1 == segments.len();
        let Some(member) = current.member(&segment.member) else {
            return Err(if last {
                PathProblem::PropertyNotFound {
                    property: segment.member.clone(),
                    target: current.name.clone()
                }
            } else {
                invalid(owner)
            });
        };
        parts.push(member.stored_name.clone());

        let mut ty = member.ty.clone();
        if let Some(index) = &segment.index {
            let Some(element) = ty.element().cloned() else {
                return Err(invalid(owner));
            };
            parts.push(index.render());
            ty = element;
        }

        if last {
            return Ok((parts, ty));
        }
        current = ty
            .named_type()
            .and_then(|name| table.get(name))
            .ok_or_else(|| invalid(owner))?;
    }

    Err(invalid(owner))
}
