//! Order batch types.
//!
//! An order batch is the administrative ordering window. Its state decides
//! whether the form accepts new or edited orders.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an order batch as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderBatchState {
	/// The batch exists but does not accept orders yet.
	Created,
	/// Orders can be placed and changed.
	OrdersOpen,
	/// The batch no longer accepts orders.
	Closed,
	/// Any state this client does not know about.
	#[serde(other)]
	Unknown,
}

/// An ordering window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBatch {
	pub name: String,
	pub order_state: OrderBatchState,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_deserialize_known_states() {
		let batch: OrderBatch =
			serde_json::from_str(r#"{"name": "Kräuter 2025", "order_state": "ORDERS_OPEN"}"#)
				.unwrap();
		assert_eq!(batch.name, "Kräuter 2025");
		assert_eq!(batch.order_state, OrderBatchState::OrdersOpen);

		let batch: OrderBatch =
			serde_json::from_str(r#"{"name": "x", "order_state": "CREATED"}"#).unwrap();
		assert_eq!(batch.order_state, OrderBatchState::Created);
	}

	#[test]
	fn test_unknown_state_is_tolerated() {
		let batch: OrderBatch =
			serde_json::from_str(r#"{"name": "x", "order_state": "ARCHIVED"}"#).unwrap();
		assert_eq!(batch.order_state, OrderBatchState::Unknown);
	}
}
