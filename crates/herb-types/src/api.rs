//! API payloads for the order backend.
//!
//! The backend speaks snake_case JSON, which matches the Rust field names, so
//! the key casing is carried entirely by the serde derives below.

use crate::{HerbId, LineItem, LineItemKey, Order};
use serde::{Deserialize, Serialize};

/// Accept header sent with every request.
pub const ACCEPT_JSON_OR_PROBLEM: &str = "application/json,application/problem+json";

/// Order body sent when creating or updating an order.
///
/// Produced by the validator: empty rows are dropped, row keys are stripped and
/// quantities are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
	pub first_name: String,
	pub last_name: String,
	pub mail: String,
	pub herbs: Vec<HerbQuantity>,
}

/// One submitted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerbQuantity {
	pub herb_id: HerbId,
	pub quantity: u32,
}

/// Quantity as found in a stored order. Older orders carry it as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireQuantity {
	Number(serde_json::Number),
	Text(String),
}

impl WireQuantity {
	/// Converts the quantity into the raw text shown in the form.
	///
	/// Whole numbers sent as floats (`2.0`) come out without the fraction.
	pub fn into_raw(self) -> String {
		match self {
			WireQuantity::Number(number) => match number.as_f64() {
				Some(value) if !number.is_u64() && value.is_finite() && value.fract() == 0.0 => {
					format!("{}", value)
				},
				_ => number.to_string(),
			},
			WireQuantity::Text(text) => text,
		}
	}
}

/// One row of a stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedHerb {
	pub herb_id: HerbId,
	pub quantity: WireQuantity,
}

/// Order as returned by `GET /api/orders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
	#[serde(default)]
	pub external_id: Option<String>,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
	#[serde(default)]
	pub mail: Option<String>,
	#[serde(default)]
	pub herbs: Vec<OrderedHerb>,
}

impl OrderResponse {
	/// Converts the stored order into the editable model.
	///
	/// The wire format has no row identifier, so rows are keyed by position.
	pub fn into_order(self) -> Order {
		Order {
			external_id: self.external_id,
			first_name: self.first_name.unwrap_or_default(),
			last_name: self.last_name.unwrap_or_default(),
			mail: self.mail.unwrap_or_default(),
			herbs: self
				.herbs
				.into_iter()
				.enumerate()
				.map(|(index, herb)| LineItem {
					key: LineItemKey(index as u64),
					herb_id: Some(herb.herb_id),
					quantity: herb.quantity.into_raw(),
				})
				.collect(),
		}
	}
}

/// Body of a successful create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
	pub external_id: String,
}

/// RFC 7807 problem document returned by the backend on errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub status: Option<u16>,
	#[serde(default)]
	pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_order_response_assigns_keys_by_position() {
		let json = r#"{
			"external_id": "abcde",
			"first_name": "Anna",
			"last_name": "Berg",
			"mail": "anna@example.org",
			"herbs": [
				{"herb_id": 3, "quantity": 2},
				{"herb_id": 7, "quantity": "5"}
			]
		}"#;

		let order = serde_json::from_str::<OrderResponse>(json).unwrap().into_order();

		assert_eq!(order.external_id.as_deref(), Some("abcde"));
		assert_eq!(order.first_name, "Anna");
		assert_eq!(order.herbs.len(), 2);
		assert_eq!(order.herbs[0].key, LineItemKey(0));
		assert_eq!(order.herbs[0].herb_id, Some(HerbId(3)));
		assert_eq!(order.herbs[0].quantity, "2");
		assert_eq!(order.herbs[1].key, LineItemKey(1));
		assert_eq!(order.herbs[1].quantity, "5");
	}

	#[test]
	fn test_whole_float_quantity_loses_fraction() {
		let row = |json: &str| serde_json::from_str::<OrderedHerb>(json).unwrap().quantity.into_raw();

		assert_eq!(row(r#"{"herb_id": 1, "quantity": 2.0}"#), "2");
		assert_eq!(row(r#"{"herb_id": 1, "quantity": 2.5}"#), "2.5");
		assert_eq!(row(r#"{"herb_id": 1, "quantity": -3}"#), "-3");
		assert_eq!(row(r#"{"herb_id": 1, "quantity": "2.0"}"#), "2.0");
	}

	#[test]
	fn test_payload_uses_snake_case_keys() {
		let payload = OrderPayload {
			first_name: "Anna".to_string(),
			last_name: "Berg".to_string(),
			mail: "anna@example.org".to_string(),
			herbs: vec![HerbQuantity {
				herb_id: HerbId(3),
				quantity: 2,
			}],
		};

		let value = serde_json::to_value(&payload).unwrap();
		assert_eq!(value["first_name"], "Anna");
		assert_eq!(value["last_name"], "Berg");
		assert_eq!(value["herbs"][0]["herb_id"], 3);
		assert_eq!(value["herbs"][0]["quantity"], 2);
		assert!(value["herbs"][0].get("key").is_none());
	}

	#[test]
	fn test_receipt_ignores_extra_fields() {
		let receipt: SubmitReceipt =
			serde_json::from_str(r#"{"external_id": "xyz", "first_name": "Anna", "herbs": []}"#)
				.unwrap();
		assert_eq!(receipt.external_id, "xyz");
	}
}
