//! Backend selection.
//!
//! Looks up the configured `backend.primary` among the registered
//! implementations and builds it from its configuration table.

use herb_api::{get_all_implementations, OrderApiService};
use herb_config::BackendConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
	#[error("Unknown backend implementation '{0}'")]
	UnknownImplementation(String),
	#[error("Failed to create backend '{name}': {source}")]
	Creation {
		name: String,
		#[source]
		source: herb_api::ApiError,
	},
}

/// Builds the service for the primary backend implementation.
pub fn build_backend(config: &BackendConfig) -> Result<OrderApiService, BackendError> {
	for (name, _) in get_all_implementations() {
		tracing::debug!("Registered backend implementation: {}", name);
	}

	let factory = get_all_implementations()
		.into_iter()
		.find(|(name, _)| *name == config.primary)
		.map(|(_, factory)| factory)
		.ok_or_else(|| BackendError::UnknownImplementation(config.primary.clone()))?;

	let empty = toml::Value::Table(toml::Table::new());
	let table = config.primary_config().unwrap_or(&empty);
	let backend = factory(table).map_err(|source| BackendError::Creation {
		name: config.primary.clone(),
		source,
	})?;

	tracing::info!(implementation = %config.primary, "Backend ready");
	Ok(OrderApiService::new(backend))
}
