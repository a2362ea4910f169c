// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generator configuration.
//!
//! One immutable [`GeneratorConfig`] is built per expansion (or per build
//! script run) and passed by reference to every stage.
//!
//! # Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | `default_method` | `"to_update"` |
//! | `runtime_path` | `"::docupdate"` |
//! | `extension_suffix` | `"UpdateExt"` |
//! | `parallel` | `true` |
//! | `defaults.ignore_null` | `true` |
//! | `defaults.ignore_empty` | `true` |
//! | `defaults.collection_handling` | `Set` |
//! | `defaults.use_string_empty` | `true` |
//! | `defaults.apply_to_all_methods` | `false` |
//! | `defaults.is_source_array` | `false` |
//! | `defaults.ignore_unmarked_properties` | `false` |
//! | `defaults.extensible_target_required` | `false` |

use serde::{Deserialize, Serialize};

use crate::model::{CollectionHandling, EffectiveOptions, MarkerSpec, PropertySpec};

/// Defaults applied to options a spec leaves unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionDefaults {
    /// See [`PropertySpec::ignore_null`].
    pub ignore_null: bool,
    /// See [`PropertySpec::ignore_empty`].
    pub ignore_empty: bool,
    /// See [`PropertySpec::collection_handling`].
    pub collection_handling: CollectionHandling,
    /// See [`PropertySpec::use_string_empty`].
    pub use_string_empty: bool,
    /// See [`PropertySpec::apply_to_all_methods`].
    pub apply_to_all_methods: bool,
    /// See [`PropertySpec::is_source_array`].
    pub is_source_array: bool,
    /// See [`MarkerSpec::ignore_unmarked_properties`].
    pub ignore_unmarked_properties: bool,
    /// See [`MarkerSpec::extensible_target_required`].
    pub extensible_target_required: bool
}

impl Default for OptionDefaults {
    fn default() -> Self {
        Self {
            ignore_null: true,
            ignore_empty: true,
            collection_handling: CollectionHandling::Set,
            use_string_empty: true,
            apply_to_all_methods: false,
            is_source_array: false,
            ignore_unmarked_properties: false,
            extensible_target_required: false
        }
    }
}

impl OptionDefaults {
    /// Merge a property spec with these defaults.
    #[must_use]
    pub fn effective(&self, spec: &PropertySpec) -> EffectiveOptions {
        EffectiveOptions {
            ignore_null: spec.ignore_null.unwrap_or(self.ignore_null),
            ignore_empty: spec.ignore_empty.unwrap_or(self.ignore_empty),
            collection_handling: spec.collection_handling.unwrap_or(self.collection_handling),
            use_string_empty: spec.use_string_empty.unwrap_or(self.use_string_empty),
            is_source_array: spec.is_source_array.unwrap_or(self.is_source_array)
        }
    }

    /// Whether the spec binds to every declared method.
    #[must_use]
    pub fn applies_to_all(&self, spec: &PropertySpec) -> bool {
        spec.apply_to_all_methods.unwrap_or(self.apply_to_all_methods)
    }

    /// Whether unmarked properties are skipped for this marker.
    #[must_use]
    pub fn ignores_unmarked(&self, marker: &MarkerSpec) -> bool {
        marker
            .ignore_unmarked_properties
            .unwrap_or(self.ignore_unmarked_properties)
    }

    /// Whether the marker asks for an inherent function on the target.
    #[must_use]
    pub fn requires_extensible(&self, marker: &MarkerSpec) -> bool {
        marker
            .extensible_target_required
            .unwrap_or(self.extensible_target_required)
    }
}

/// Configuration of one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Method name for markers and specs that do not name one.
    pub default_method: String,
    /// Path of the runtime crate in generated code.
    pub runtime_path: String,
    /// Suffix of per-source extension traits (`{Source}{suffix}`).
    pub extension_suffix: String,
    /// Analyse source types on the rayon pool.
    pub parallel: bool,
    /// Option defaults.
    pub defaults: OptionDefaults
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_method: "to_update".to_string(),
            runtime_path: "::docupdate".to_string(),
            extension_suffix: "UpdateExt".to_string(),
            parallel: true,
            defaults: OptionDefaults::default()
        }
    }
}

impl GeneratorConfig {
    /// Method name a marker generates.
    #[must_use]
    pub fn marker_method<'a>(&'a self, marker: &'a MarkerSpec) -> &'a str {
        marker.method_name.as_deref().unwrap_or(&self.default_method)
    }

    /// Set the default method name.
    #[must_use]
    pub fn with_default_method(mut self, method: impl Into<String>) -> Self {
        self.default_method = method.into();
        self
    }

    /// Set the runtime crate path.
    #[must_use]
    pub fn with_runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    /// Enable or disable parallel analysis.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
