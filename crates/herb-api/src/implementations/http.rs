//! HTTP backend implementation.
//!
//! Talks to the order REST API with a shared reqwest client. Every request
//! carries `Accept: application/json,application/problem+json`; error bodies in
//! problem format are decoded so that their `detail` ends up in the error.

use crate::{ApiError, OrderApiFactory, OrderApiInterface, OrderApiRegistry};
use async_trait::async_trait;
use herb_types::{
	ConfigSchema, Field, FieldType, Herb, ImplementationRegistry, Order, OrderBatch,
	OrderPayload, OrderResponse, ProblemDetails, Schema, SubmitReceipt, ValidationError,
	ACCEPT_JSON_OR_PROBLEM,
};
use reqwest::{header::ACCEPT, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default request timeout when `timeout_seconds` is not configured.
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Order backend reached over HTTP.
pub struct HttpOrderApi {
	client: reqwest::Client,
	/// Backend root, e.g. `http://localhost:8080`. May carry a path prefix.
	base_url: Url,
}

impl HttpOrderApi {
	/// Creates a client for the backend at `base_url`.
	pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
		let client = reqwest::Client::builder()
			.pool_idle_timeout(Duration::from_secs(90))
			.timeout(timeout)
			.build()
			.map_err(|e| ApiError::Configuration(e.to_string()))?;

		let base_url = Url::parse(&base_url.into())
			.map_err(|e| ApiError::Configuration(format!("Invalid base_url: {}", e)))?;

		Ok(Self { client, base_url })
	}

	/// Appends `segments` to the base URL. Each segment is percent-encoded, so
	/// identifiers cannot change the request path.
	fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|_| ApiError::Configuration("base_url cannot carry a path".to_string()))?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	/// Sends a request and returns the response if it has the expected status.
	///
	/// 404 is reported as [`ApiError::NotFound`] naming `what`, any other
	/// status as [`ApiError::Status`].
	async fn send(
		&self,
		request: RequestBuilder,
		expected: StatusCode,
		what: &str,
	) -> Result<Response, ApiError> {
		let response = request
			.header(ACCEPT, ACCEPT_JSON_OR_PROBLEM)
			.send()
			.await
			.map_err(|e| ApiError::Transport(e.to_string()))?;

		let status = response.status();
		if status == expected {
			return Ok(response);
		}
		if status == StatusCode::NOT_FOUND {
			return Err(ApiError::NotFound(what.to_string()));
		}

		// The body is only used for diagnostics, an unreadable one is not an error.
		let detail = response
			.text()
			.await
			.ok()
			.and_then(|body| serde_json::from_str::<ProblemDetails>(&body).ok())
			.and_then(|problem| problem.detail.or(problem.title));

		Err(ApiError::Status {
			status: status.as_u16(),
			detail,
		})
	}

	async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
		response
			.json::<T>()
			.await
			.map_err(|e| ApiError::Decode(e.to_string()))
	}

	async fn get_json<T: DeserializeOwned>(
		&self,
		segments: &[&str],
		what: &str,
	) -> Result<T, ApiError> {
		let response = self
			.send(self.client.get(self.url(segments)?), StatusCode::OK, what)
			.await?;
		Self::decode(response).await
	}
}

#[async_trait]
impl OrderApiInterface for HttpOrderApi {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpOrderApiSchema)
	}

	async fn fetch_herbs(&self) -> Result<Vec<Herb>, ApiError> {
		self.get_json(&["api", "herbs"], "herb catalog").await
	}

	async fn fetch_order_batch(&self, batch_id: &str) -> Result<OrderBatch, ApiError> {
		self.get_json(
			&["api", "order_batches", batch_id],
			&format!("order batch {}", batch_id),
		)
		.await
	}

	async fn fetch_order(&self, order_id: &str) -> Result<Order, ApiError> {
		let response: OrderResponse = self
			.get_json(&["api", "orders", order_id], &format!("order {}", order_id))
			.await?;
		Ok(response.into_order())
	}

	async fn create_order(&self, payload: &OrderPayload) -> Result<SubmitReceipt, ApiError> {
		let request = self.client.post(self.url(&["api", "orders"])?).json(payload);
		let response = self.send(request, StatusCode::CREATED, "orders").await?;
		Self::decode(response).await
	}

	async fn update_order(
		&self,
		order_id: &str,
		payload: &OrderPayload,
	) -> Result<SubmitReceipt, ApiError> {
		let request = self
			.client
			.put(self.url(&["api", "orders", order_id])?)
			.json(payload);
		let response = self
			.send(request, StatusCode::OK, &format!("order {}", order_id))
			.await?;
		Self::decode(response).await
	}
}

/// Configuration schema for HttpOrderApi.
pub struct HttpOrderApiSchema;

impl ConfigSchema for HttpOrderApiSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("base_url", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
						Ok(())
					},
					_ => Err("base_url must start with http:// or https://".to_string()),
				}
			})],
			vec![Field::new(
				"timeout_seconds",
				FieldType::Integer {
					min: Some(1),
					max: Some(300),
				},
			)],
		);
		schema.validate(config)
	}
}

/// Factory function to create an HTTP backend from configuration.
///
/// Configuration parameters:
/// - `base_url`: backend root, e.g. `http://localhost:8080` (required)
/// - `timeout_seconds`: request timeout (optional, default 30)
pub fn create_order_api(config: &toml::Value) -> Result<Box<dyn OrderApiInterface>, ApiError> {
	HttpOrderApiSchema
		.validate(config)
		.map_err(|e| ApiError::Configuration(e.to_string()))?;

	let base_url = config
		.get("base_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| ApiError::Configuration("base_url is required".to_string()))?;
	let timeout_seconds = config
		.get("timeout_seconds")
		.and_then(|v| v.as_integer())
		.map(|v| v as u64)
		.unwrap_or(DEFAULT_TIMEOUT_SECONDS);

	Ok(Box::new(HttpOrderApi::new(
		base_url,
		Duration::from_secs(timeout_seconds),
	)?))
}

/// Registry for the HTTP backend implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = OrderApiFactory;

	fn factory() -> Self::Factory {
		create_order_api
	}
}

impl OrderApiRegistry for Registry {}
