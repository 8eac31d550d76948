//! Configuration module for the herb pre-order client.
//!
//! Configuration is read from a TOML file. Before parsing, `${VAR_NAME}` and
//! `${VAR_NAME:-default}` placeholders are replaced with values from the
//! environment, which is how the backend URL is usually supplied. After parsing
//! the configuration is validated so that problems surface at startup.

use herb_types::MessageCatalog;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Application-level settings.
	#[serde(default)]
	pub app: AppConfig,
	/// Which order backend to talk to and how.
	pub backend: BackendConfig,
	/// Behaviour of the order form.
	#[serde(default)]
	pub form: FormConfig,
	/// Overrides for user-facing texts.
	#[serde(default)]
	pub messages: MessageCatalog,
}

/// Application-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
	/// Heading shown when no order batch name is available.
	#[serde(default = "default_title")]
	pub title: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			title: default_title(),
		}
	}
}

fn default_title() -> String {
	"Kräuterbestellung".to_string()
}

/// Configuration of the order backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of backend implementation names to their raw configuration tables.
	pub implementations: HashMap<String, toml::Value>,
}

impl BackendConfig {
	/// Configuration table of the primary implementation.
	pub fn primary_config(&self) -> Option<&toml::Value> {
		self.implementations.get(&self.primary)
	}
}

/// Which loading flow the form uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
	/// Gate the form on the state of an order batch.
	#[default]
	BatchAware,
	/// No batch check, the form opens as soon as loading settles.
	Simple,
}

/// Whether the form stays locked after a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SubmitFailurePolicy {
	/// Keep the form locked when creating a new order failed.
	#[serde(default)]
	pub lock_after_failed_create: bool,
	/// Keep the form locked when updating an existing order failed.
	#[serde(default)]
	pub lock_after_failed_update: bool,
}

/// Behaviour of the order form.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormConfig {
	#[serde(default)]
	pub flow: FlowMode,
	/// Order batch checked by the batch-aware flow.
	#[serde(default = "default_batch_id")]
	pub batch_id: String,
	/// Number of blank rows a new order starts with.
	#[serde(default = "default_rows")]
	pub default_rows: usize,
	/// Base URL of the public site, used to build order links.
	#[serde(default = "default_public_base_url")]
	pub public_base_url: String,
	#[serde(default)]
	pub failure_policy: SubmitFailurePolicy,
}

impl Default for FormConfig {
	fn default() -> Self {
		Self {
			flow: FlowMode::default(),
			batch_id: default_batch_id(),
			default_rows: default_rows(),
			public_base_url: default_public_base_url(),
			failure_policy: SubmitFailurePolicy::default(),
		}
	}
}

fn default_batch_id() -> String {
	"abcde".to_string()
}

fn default_rows() -> usize {
	5
}

fn default_public_base_url() -> String {
	"https://meine-kraeuterbestellung.online".to_string()
}

/// Upper bound for `form.default_rows`.
const MAX_DEFAULT_ROWS: usize = 50;

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut missing = None;
	let resolved = re.replace_all(input, |caps: &regex::Captures<'_>| {
		let var_name = &caps[1];
		match (std::env::var(var_name), caps.get(2)) {
			(Ok(value), _) => value,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				missing.get_or_insert_with(|| var_name.to_string());
				String::new()
			},
		}
	});

	match missing {
		Some(var_name) => Err(ConfigError::Validation(format!(
			"Environment variable '{}' not found",
			var_name
		))),
		None => Ok(resolved.into_owned()),
	}
}

impl Config {
	/// Loads configuration from a file, resolving environment placeholders.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.backend.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Backend primary implementation cannot be empty".into(),
			));
		}
		if self.backend.primary_config().is_none() {
			return Err(ConfigError::Validation(format!(
				"Primary backend '{}' not found in implementations",
				self.backend.primary
			)));
		}

		if self.form.flow == FlowMode::BatchAware && self.form.batch_id.trim().is_empty() {
			return Err(ConfigError::Validation(
				"form.batch_id is required for the batch_aware flow".into(),
			));
		}
		if self.form.default_rows > MAX_DEFAULT_ROWS {
			return Err(ConfigError::Validation(format!(
				"form.default_rows cannot exceed {}",
				MAX_DEFAULT_ROWS
			)));
		}
		let base_url = &self.form.public_base_url;
		if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
			return Err(ConfigError::Validation(format!(
				"form.public_base_url must be an http(s) URL, got '{}'",
				base_url
			)));
		}

		Ok(())
	}
}

/// Parses a configuration from TOML text.
///
/// Environment variables are resolved first and the configuration is
/// validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
