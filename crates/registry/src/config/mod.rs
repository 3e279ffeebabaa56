//! Configuration documents.
//!
//! A config file is TOML with two sections:
//!
//! ```toml
//! [settings]
//! rarity_group = "rarities"
//!
//! [registry.rarities.common]
//! name = "Common"
//! chance = 100
//! ```
//!
//! `[registry]` holds the descriptor groups; see [`crate::descriptor`]. Unknown
//! sections and settings are reported as [`ConfigWarning`]s, not errors.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::{DescriptorError, DescriptorSource};

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Descriptor group the rarity table is built from.
	pub rarity_group: String,
}

impl Settings {
	const KNOWN: &'static [&'static str] = &["rarity_group"];
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			rarity_group: "rarities".into(),
		}
	}
}

/// A parsed configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
	pub settings: Settings,
	pub registry: DescriptorSource,
	pub warnings: Vec<ConfigWarning>,
}

/// Non-fatal finding while parsing a config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
	/// A top-level section other than `settings` or `registry`.
	UnknownSection(String),
	/// A key inside `[settings]` that no setting reads.
	UnknownSetting(String),
}

impl fmt::Display for ConfigWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigWarning::UnknownSection(section) => write!(f, "unknown section [{section}] will be ignored"),
			ConfigWarning::UnknownSetting(key) => write!(f, "unknown setting '{key}' will be ignored"),
		}
	}
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The file could not be read.
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The document is not valid TOML or a section has the wrong shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A top-level section is not a table.
	#[error("section [{0}] must be a table")]
	InvalidSection(String),

	/// The `[registry]` section does not split into descriptor groups.
	#[error(transparent)]
	Descriptor(#[from] DescriptorError),
}

/// Parses a config document.
pub fn parse_config_str(content: &str) -> Result<Config, ConfigError> {
	let document: toml::Table = content.parse()?;
	let mut config = Config::default();

	for (section, value) in document {
		match section.as_str() {
			"settings" => {
				let toml::Value::Table(table) = value else {
					return Err(ConfigError::InvalidSection(section));
				};
				config.warnings.extend(
					table
						.keys()
						.filter(|key| !Settings::KNOWN.contains(&key.as_str()))
						.map(|key| ConfigWarning::UnknownSetting(key.clone())),
				);
				config.settings = toml::Value::Table(table).try_into()?;
			}
			"registry" => {
				let toml::Value::Table(table) = value else {
					return Err(ConfigError::InvalidSection(section));
				};
				config.registry = DescriptorSource::from_table(table)?;
			}
			_ => config.warnings.push(ConfigWarning::UnknownSection(section)),
		}
	}

	Ok(config)
}

/// Reads and parses the config file at `path`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
	let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	let config = parse_config_str(&content)?;
	debug!(
		path = %path.display(),
		groups = config.registry.group_names().count(),
		warnings = config.warnings.len(),
		"Config loaded"
	);
	Ok(config)
}
