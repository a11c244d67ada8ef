//! Decal pass configuration with TOML preset support.
//!
//! Binding slots, decal limits and sampler state are consolidated here.
//! Options serialize to/from TOML so a renderer can keep its binding
//! convention next to its other pass presets.

mod bindings;
mod decals;
mod sampler;

use std::path::Path;

pub use bindings::{BindingOptions, MAX_BIND_GROUPS};
pub use decals::DecalOptions;
pub use sampler::SamplerOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::DecalError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[bindings]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Bind group and binding slots of the decal resources.
    pub bindings: BindingOptions,
    /// Per-frame decal limits.
    pub decals: DecalOptions,
    /// Sampler state and texture format.
    pub sampler: SamplerOptions,
}

impl Options {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`DecalError::Io`] if the file cannot be read,
    /// [`DecalError::OptionsParse`] if it is not valid TOML or allows no
    /// decals, and [`DecalError::BindingConflict`] if two resources share a
    /// slot.
    pub fn load(path: &Path) -> Result<Self, DecalError> {
        let content = std::fs::read_to_string(path).map_err(DecalError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text and check binding slots and limits.
    ///
    /// # Errors
    ///
    /// See [`Options::load`].
    pub fn from_toml(content: &str) -> Result<Self, DecalError> {
        let options: Self = toml::from_str(content)
            .map_err(|e| DecalError::OptionsParse(e.to_string()))?;
        options.bindings.validate()?;
        options.decals.validate()?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`DecalError::OptionsParse`] on serialization failure,
    /// [`DecalError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), DecalError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DecalError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DecalError::Io)?;
        }
        std::fs::write(path, content).map_err(DecalError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{AddressMode, FilterMode};
    use crate::decal::OverflowPolicy;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn defaults_match_pass_constants_convention() {
        let b = BindingOptions::default();
        assert_eq!((b.group, b.textures, b.sampler, b.constants, b.decals), (1, 7, 8, 9, 10));
        assert_eq!(DecalOptions::default().max_decals, 20);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[bindings]
group = 2

[sampler]
address_mode = "clamp_to_border"
filter = "nearest"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.bindings.group, 2);
        assert_eq!(opts.bindings.textures, 7);
        assert_eq!(opts.sampler.address_mode, AddressMode::ClampToBorder);
        assert_eq!(opts.sampler.filter, FilterMode::Nearest);
        assert!(opts.sampler.srgb);
        assert_eq!(opts.decals.overflow, OverflowPolicy::Reject);
    }

    #[test]
    fn shared_binding_slot_is_rejected() {
        let toml_str = r"
[bindings]
sampler = 7
";
        let err = Options::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, DecalError::BindingConflict(_)));
        assert!(err.to_string().contains("textures and sampler"));
    }

    #[test]
    fn group_beyond_default_limits_is_rejected() {
        let err = Options::from_toml("[bindings]\ngroup = 4").unwrap_err();
        assert!(matches!(err, DecalError::BindingConflict(_)));
    }

    #[test]
    fn zero_decal_limit_is_rejected() {
        let err = Options::from_toml("[decals]\nmax_decals = 0").unwrap_err();
        assert!(matches!(err, DecalError::OptionsParse(_)));
        assert!(err.to_string().contains("max_decals"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Options::from_toml("[decals]\nmax_decals = \"many\"").unwrap_err();
        assert!(matches!(err, DecalError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = std::env::temp_dir().join(format!(
            "radius-decals-options-{}",
            std::process::id()
        ));
        let path = dir.join("custom.toml");
        let mut opts = Options::default();
        opts.decals.max_decals = 64;
        opts.decals.overflow = OverflowPolicy::Clamp;
        opts.save(&path).unwrap();

        assert_eq!(Options::load(&path).unwrap(), opts);
        assert_eq!(Options::list_presets(&dir), vec!["custom".to_owned()]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("bindings"));
        assert!(props.contains_key("decals"));
        assert!(props.contains_key("sampler"));

        let bindings = &props["bindings"]["properties"];
        assert!(bindings.get("group").is_some());
        assert!(bindings.get("decals").is_some());
    }
}
