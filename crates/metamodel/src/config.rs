//! Build configuration.
//!
//! ```toml
//! mode = "prototype"
//! validation = "tolerant"
//! parallelism = 4
//!
//! [win-policies]
//! named = "first-wins"
//! ```
//!
//! Locating and reading the file is the host's concern; this module only
//! parses the text.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::capability::WinPolicy;
use crate::error::ConfigError;

/// Whether the graph may be rebuilt after bootstrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentMode {
	/// Built once; reload is refused.
	#[default]
	Production,
	/// Reload allowed.
	Prototype,
}

/// What a non-empty validation report does to a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
	/// Any failure rejects the graph.
	#[default]
	Strict,
	/// Failures are logged and kept as graph warnings.
	Tolerant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct MetamodelConfig {
	pub mode: DeploymentMode,
	pub validation: ValidationPolicy,
	/// Worker threads for per-type discovery; 0 means available cores.
	pub parallelism: usize,
	/// Win-policy overrides keyed by capability kind name.
	pub win_policies: BTreeMap<String, WinPolicy>,
}

impl MetamodelConfig {
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	/// Prototype mode with otherwise default settings.
	pub fn prototype() -> Self {
		Self {
			mode: DeploymentMode::Prototype,
			..Self::default()
		}
	}

	pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
		self.validation = validation;
		self
	}

	pub fn with_parallelism(mut self, parallelism: usize) -> Self {
		self.parallelism = parallelism;
		self
	}

	pub fn with_win_policy(mut self, kind: impl Into<String>, policy: WinPolicy) -> Self {
		self.win_policies.insert(kind.into(), policy);
		self
	}

	pub fn effective_parallelism(&self) -> usize {
		match self.parallelism {
			0 => std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
			n => n,
		}
	}

	pub fn reload_allowed(&self) -> bool {
		self.mode == DeploymentMode::Prototype
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn test_empty_config_is_default() {
		let config = MetamodelConfig::from_toml_str("").unwrap();
		assert_eq!(config, MetamodelConfig::default());
		assert!(!config.reload_allowed());
		assert!(config.effective_parallelism() >= 1);
	}

	#[test]
	fn test_full_config() {
		const CONFIG: &str = r#"
			mode = "prototype"
			validation = "tolerant"
			parallelism = 3

			[win-policies]
			named = "first-wins"
			hidden = "replace"
		"#;
		let config = MetamodelConfig::from_toml_str(CONFIG).unwrap();

		assert_eq!(
			config,
			MetamodelConfig::prototype()
				.with_validation(ValidationPolicy::Tolerant)
				.with_parallelism(3)
				.with_win_policy("named", WinPolicy::FirstWins)
				.with_win_policy("hidden", WinPolicy::Replace)
		);
		assert_eq!(config.effective_parallelism(), 3);
	}

	#[test]
	fn test_rejects_unknown_keys_and_values() {
		assert!(MetamodelConfig::from_toml_str("paralelism = 2").is_err());
		assert!(MetamodelConfig::from_toml_str("mode = \"staging\"").is_err());

		let err = MetamodelConfig::from_toml_str("[win-policies]\nnamed = \"newest\"").unwrap_err();
		assert!(err.to_string().starts_with("invalid metamodel configuration"));
	}
}
