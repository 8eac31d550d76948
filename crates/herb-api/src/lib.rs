//! Order backend clients for the herb pre-order client.
//!
//! This module defines the interface the form uses to load reference data
//! (herb catalog, order batch), load an existing order and submit new or
//! changed orders. Implementations are selected by name from the
//! configuration, following the same factory/registry pattern for every
//! backend.

use async_trait::async_trait;
use herb_types::{
	truncate_id, ConfigSchema, Herb, ImplementationRegistry, Order, OrderBatch, OrderPayload,
	SubmitReceipt,
};
use thiserror::Error;
use tracing::instrument;

/// Re-export implementations
pub mod implementations {
	pub mod http;
	pub mod memory;
}

/// Errors that can occur while talking to the order backend.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The referenced entity does not exist (HTTP 404).
	#[error("Not found: {0}")]
	NotFound(String),
	/// The backend answered with a status other than the expected one.
	#[error("Unexpected status {status}{}", format_detail(.detail))]
	Status { status: u16, detail: Option<String> },
	/// The request could not be sent or the connection failed.
	#[error("Transport error: {0}")]
	Transport(String),
	/// The response body could not be decoded.
	#[error("Decode error: {0}")]
	Decode(String),
	/// The implementation was configured incorrectly.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

fn format_detail(detail: &Option<String>) -> String {
	detail
		.as_deref()
		.map(|d| format!(": {}", d))
		.unwrap_or_default()
}

impl ApiError {
	/// Returns true if the error means the entity does not exist.
	pub fn is_not_found(&self) -> bool {
		matches!(self, ApiError::NotFound(_))
	}
}

/// Trait defining the interface to the order backend.
///
/// Every method maps to one backend request; implementations never retry.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait OrderApiInterface: Send + Sync {
	/// Returns the configuration schema for this implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Lists the herbs that can be ordered.
	async fn fetch_herbs(&self) -> Result<Vec<Herb>, ApiError>;

	/// Loads the order batch with the given identifier.
	async fn fetch_order_batch(&self, batch_id: &str) -> Result<OrderBatch, ApiError>;

	/// Loads an existing order. Rows are keyed by position.
	async fn fetch_order(&self, order_id: &str) -> Result<Order, ApiError>;

	/// Creates a new order. Succeeds only on HTTP 201.
	async fn create_order(&self, payload: &OrderPayload) -> Result<SubmitReceipt, ApiError>;

	/// Replaces an existing order. Succeeds only on HTTP 200.
	async fn update_order(
		&self,
		order_id: &str,
		payload: &OrderPayload,
	) -> Result<SubmitReceipt, ApiError>;
}

/// Type alias for backend factory functions.
pub type OrderApiFactory = fn(&toml::Value) -> Result<Box<dyn OrderApiInterface>, ApiError>;

/// Registry trait for backend implementations.
pub trait OrderApiRegistry: ImplementationRegistry<Factory = OrderApiFactory> {}

/// Get all registered backend implementations.
///
/// Returns a vector of (name, factory) tuples used to resolve the configured
/// `backend.primary` implementation.
pub fn get_all_implementations() -> Vec<(&'static str, OrderApiFactory)> {
	use implementations::{http, memory};

	vec![
		(http::Registry::NAME, http::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// High-level service wrapping the selected backend implementation.
///
/// Adds tracing around every request so that the form code does not have to.
pub struct OrderApiService {
	backend: Box<dyn OrderApiInterface>,
}

impl OrderApiService {
	/// Creates a new OrderApiService with the specified backend.
	pub fn new(backend: Box<dyn OrderApiInterface>) -> Self {
		Self { backend }
	}

	#[instrument(skip(self))]
	pub async fn fetch_herbs(&self) -> Result<Vec<Herb>, ApiError> {
		let herbs = self.backend.fetch_herbs().await;
		match &herbs {
			Ok(herbs) => tracing::debug!(count = herbs.len(), "Loaded herb catalog"),
			Err(e) => tracing::warn!(error = %e, "Loading herb catalog failed"),
		}
		herbs
	}

	#[instrument(skip(self))]
	pub async fn fetch_order_batch(&self, batch_id: &str) -> Result<OrderBatch, ApiError> {
		let batch = self.backend.fetch_order_batch(batch_id).await;
		match &batch {
			Ok(batch) => tracing::debug!(state = ?batch.order_state, "Loaded order batch"),
			Err(e) => tracing::warn!(error = %e, "Loading order batch failed"),
		}
		batch
	}

	#[instrument(skip_all, fields(order_id = %truncate_id(order_id)))]
	pub async fn fetch_order(&self, order_id: &str) -> Result<Order, ApiError> {
		let order = self.backend.fetch_order(order_id).await;
		match &order {
			Ok(order) => tracing::debug!(rows = order.herbs.len(), "Loaded order"),
			Err(e) => tracing::warn!(error = %e, "Loading order failed"),
		}
		order
	}

	#[instrument(skip_all, fields(rows = payload.herbs.len()))]
	pub async fn create_order(&self, payload: &OrderPayload) -> Result<SubmitReceipt, ApiError> {
		let receipt = self.backend.create_order(payload).await;
		match &receipt {
			Ok(receipt) => tracing::info!(
				order_id = %truncate_id(&receipt.external_id),
				"Order created"
			),
			Err(e) => tracing::warn!(error = %e, "Creating order failed"),
		}
		receipt
	}

	#[instrument(skip_all, fields(order_id = %truncate_id(order_id), rows = payload.herbs.len()))]
	pub async fn update_order(
		&self,
		order_id: &str,
		payload: &OrderPayload,
	) -> Result<SubmitReceipt, ApiError> {
		let receipt = self.backend.update_order(order_id, payload).await;
		match &receipt {
			Ok(_) => tracing::info!("Order updated"),
			Err(e) => tracing::warn!(error = %e, "Updating order failed"),
		}
		receipt
	}
}
