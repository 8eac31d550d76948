//! In-memory backend implementation.
//!
//! Serves a fixed herb catalog and a single order batch from configuration and
//! keeps orders in a map. Useful for demos and for running the form without a
//! server. Stored data is lost when the process exits.

use crate::{ApiError, OrderApiFactory, OrderApiInterface, OrderApiRegistry};
use async_trait::async_trait;
use herb_types::{
	ConfigSchema, Field, FieldType, Herb, HerbId, ImplementationRegistry, Order, OrderBatch,
	OrderBatchState, OrderPayload, OrderResponse, OrderedHerb, Schema, SubmitReceipt,
	ValidationError, WireQuantity,
};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Order backend kept in process memory.
pub struct MemoryOrderApi {
	batch_id: String,
	batch: OrderBatch,
	herbs: Vec<Herb>,
	orders: RwLock<HashMap<String, OrderPayload>>,
}

impl MemoryOrderApi {
	/// Creates a backend serving `batch` under `batch_id` and the given catalog.
	pub fn new(batch_id: impl Into<String>, batch: OrderBatch, herbs: Vec<Herb>) -> Self {
		Self {
			batch_id: batch_id.into(),
			batch,
			herbs,
			orders: RwLock::new(HashMap::new()),
		}
	}

	/// Stores an order under a known identifier, replacing any previous one.
	pub async fn insert_order(&self, external_id: impl Into<String>, payload: OrderPayload) {
		self.orders.write().await.insert(external_id.into(), payload);
	}

	/// Rejects payloads referring to herbs outside the catalog.
	fn check_herbs(&self, payload: &OrderPayload) -> Result<(), ApiError> {
		let unknown: Vec<String> = payload
			.herbs
			.iter()
			.filter(|row| !self.herbs.iter().any(|herb| herb.id == row.herb_id))
			.map(|row| row.herb_id.to_string())
			.collect();

		if unknown.is_empty() {
			Ok(())
		} else {
			Err(ApiError::Status {
				status: 422,
				detail: Some(format!("Unknown herb ids: {}", unknown.join(", "))),
			})
		}
	}
}

#[async_trait]
impl OrderApiInterface for MemoryOrderApi {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryOrderApiSchema)
	}

	async fn fetch_herbs(&self) -> Result<Vec<Herb>, ApiError> {
		Ok(self.herbs.clone())
	}

	async fn fetch_order_batch(&self, batch_id: &str) -> Result<OrderBatch, ApiError> {
		if batch_id == self.batch_id {
			Ok(self.batch.clone())
		} else {
			Err(ApiError::NotFound(format!("order batch {}", batch_id)))
		}
	}

	async fn fetch_order(&self, order_id: &str) -> Result<Order, ApiError> {
		let orders = self.orders.read().await;
		let payload = orders
			.get(order_id)
			.ok_or_else(|| ApiError::NotFound(format!("order {}", order_id)))?;

		// Go through the wire representation so rows are keyed like an HTTP load.
		let response = OrderResponse {
			external_id: Some(order_id.to_string()),
			first_name: Some(payload.first_name.clone()),
			last_name: Some(payload.last_name.clone()),
			mail: Some(payload.mail.clone()),
			herbs: payload
				.herbs
				.iter()
				.map(|row| OrderedHerb {
					herb_id: row.herb_id,
					quantity: WireQuantity::Number(row.quantity.into()),
				})
				.collect(),
		};
		Ok(response.into_order())
	}

	async fn create_order(&self, payload: &OrderPayload) -> Result<SubmitReceipt, ApiError> {
		self.check_herbs(payload)?;

		let external_id = uuid::Uuid::new_v4().simple().to_string();
		self.orders
			.write()
			.await
			.insert(external_id.clone(), payload.clone());
		Ok(SubmitReceipt { external_id })
	}

	async fn update_order(
		&self,
		order_id: &str,
		payload: &OrderPayload,
	) -> Result<SubmitReceipt, ApiError> {
		self.check_herbs(payload)?;

		let mut orders = self.orders.write().await;
		let stored = orders
			.get_mut(order_id)
			.ok_or_else(|| ApiError::NotFound(format!("order {}", order_id)))?;
		*stored = payload.clone();
		Ok(SubmitReceipt {
			external_id: order_id.to_string(),
		})
	}
}

/// Configuration schema for MemoryOrderApi.
pub struct MemoryOrderApiSchema;

impl ConfigSchema for MemoryOrderApiSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let herb = Schema::new(
			vec![
				Field::new(
					"id",
					FieldType::Integer {
						min: Some(1),
						max: None,
					},
				),
				Field::new("name", FieldType::String),
			],
			vec![],
		);
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("batch_id", FieldType::String),
				Field::new("batch_name", FieldType::String),
				Field::new("batch_state", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some("CREATED") | Some("ORDERS_OPEN") | Some("CLOSED") => Ok(()),
						_ => Err("batch_state must be CREATED, ORDERS_OPEN or CLOSED".to_string()),
					}
				}),
				Field::new("herbs", FieldType::Array(Box::new(FieldType::Table(herb)))),
			],
		);
		schema.validate(config)
	}
}

#[derive(Debug, Deserialize)]
struct MemoryConfig {
	#[serde(default = "default_batch_id")]
	batch_id: String,
	#[serde(default = "default_batch_name")]
	batch_name: String,
	#[serde(default = "default_batch_state")]
	batch_state: OrderBatchState,
	#[serde(default)]
	herbs: Vec<HerbEntry>,
}

#[derive(Debug, Deserialize)]
struct HerbEntry {
	id: u64,
	name: String,
}

fn default_batch_id() -> String {
	"abcde".to_string()
}

fn default_batch_name() -> String {
	"Kräuterbestellung".to_string()
}

fn default_batch_state() -> OrderBatchState {
	OrderBatchState::OrdersOpen
}

/// Factory function to create an in-memory backend from configuration.
///
/// Configuration parameters (all optional):
/// - `batch_id`: identifier of the served batch (default `abcde`)
/// - `batch_name`: display name of the batch
/// - `batch_state`: `CREATED`, `ORDERS_OPEN` (default) or `CLOSED`
/// - `herbs`: array of `{ id, name }` tables
pub fn create_order_api(config: &toml::Value) -> Result<Box<dyn OrderApiInterface>, ApiError> {
	MemoryOrderApiSchema
		.validate(config)
		.map_err(|e| ApiError::Configuration(e.to_string()))?;

	let config: MemoryConfig = config
		.clone()
		.try_into()
		.map_err(|e: toml::de::Error| ApiError::Configuration(e.to_string()))?;

	let herbs = config
		.herbs
		.into_iter()
		.map(|entry| Herb {
			id: HerbId(entry.id),
			name: entry.name,
		})
		.collect();

	Ok(Box::new(MemoryOrderApi::new(
		config.batch_id,
		OrderBatch {
			name: config.batch_name,
			order_state: config.batch_state,
		},
		herbs,
	)))
}

/// Registry for the in-memory backend implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = OrderApiFactory;

	fn factory() -> Self::Factory {
		create_order_api
	}
}

impl OrderApiRegistry for Registry {}
