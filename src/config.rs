//! Bridge configuration: host layout and version thresholds.
//!
//! Every field has a default matching the hosts the bridge was written
//! against, so an empty document is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! layout:
//!   api_package: "org.bukkit"
//!   implementation_package: "org.bukkit.craftbukkit"
//!   internal_package: "net.minecraft.server"
//!   flattened_internal_package: "net.minecraft"
//!   text_type: "Component"
//! versions:
//!   hex_colors_since: 16
//!   flattened_namespace_since: 17
//!   obfuscated_objective_since: 18
//!   json_item_text_since: "16.5"
//!   tree_item_text: { min: 14, max: 16 }
//!   tree_objective_text_since: 13
//!   newest_known_protocol: 20
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::probe::version::ExactVersion;

// ============================================================================
// BridgeConfig
// ============================================================================

/// Top-level configuration handed to the probe and the registry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub layout: HostLayout,
    pub versions: VersionThresholds,
}

impl BridgeConfig {
    /// Parse a `BridgeConfig` from a YAML string and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a `BridgeConfig` from a YAML file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn with_layout(mut self, layout: HostLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_versions(mut self, versions: VersionThresholds) -> Self {
        self.versions = versions;
        self
    }

    /// Rejects empty package names and inverted ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let packages = [
            ("layout.api_package", &self.layout.api_package),
            ("layout.implementation_package", &self.layout.implementation_package),
            ("layout.internal_package", &self.layout.internal_package),
            ("layout.flattened_internal_package", &self.layout.flattened_internal_package),
            ("layout.text_type", &self.layout.text_type),
        ];
        for (key, value) in packages {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
            }
        }

        let tree = &self.versions.tree_item_text;
        if tree.min > tree.max {
            return Err(ConfigError::Invalid(format!(
                "versions.tree_item_text: min {} is above max {}",
                tree.min, tree.max
            )));
        }
        Ok(())
    }
}

// ============================================================================
// HostLayout
// ============================================================================

/// Where the host keeps its types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostLayout {
    /// Public, version-stable API (`ItemMeta`, `Scoreboard`, `Objective`).
    pub api_package: String,
    /// Versioned implementation types, prefixed by the implementation tag.
    pub implementation_package: String,
    /// Internal types before the namespace was flattened.
    pub internal_package: String,
    /// Internal types after the namespace was flattened.
    pub flattened_internal_package: String,
    /// Simple name of the host's native rich text type.
    pub text_type: String,
}

impl Default for HostLayout {
    fn default() -> Self {
        Self {
            api_package: "org.bukkit".to_string(),
            implementation_package: "org.bukkit.craftbukkit".to_string(),
            internal_package: "net.minecraft.server".to_string(),
            flattened_internal_package: "net.minecraft".to_string(),
            text_type: "Component".to_string(),
        }
    }
}

// ============================================================================
// VersionThresholds
// ============================================================================

/// Inclusive protocol range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolRange {
    pub min: u32,
    pub max: u32,
}

impl ProtocolRange {
    pub fn contains(&self, protocol: u32) -> bool {
        (self.min..=self.max).contains(&protocol)
    }
}

/// The version table driving the version-derived flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionThresholds {
    pub hex_colors_since: u32,
    pub flattened_namespace_since: u32,
    /// Internal objective accessors switch to obfuscated names here.
    pub obfuscated_objective_since: u32,
    /// Item text is stored as JSON strings from this exact version.
    pub json_item_text_since: ExactVersion,
    /// Item text is stored as internal tree objects in this range.
    pub tree_item_text: ProtocolRange,
    /// Objective text goes through the internal objective from here on.
    pub tree_objective_text_since: u32,
    /// Anything newer is logged as untested.
    pub newest_known_protocol: u32,
}

impl Default for VersionThresholds {
    fn default() -> Self {
        Self {
            hex_colors_since: 16,
            flattened_namespace_since: 17,
            obfuscated_objective_since: 18,
            json_item_text_since: ExactVersion::new(16, 5),
            tree_item_text: ProtocolRange { min: 14, max: 16 },
            tree_objective_text_since: 13,
            newest_known_protocol: 20,
        }
    }
}
