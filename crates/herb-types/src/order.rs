//! Order model types.
//!
//! An [`Order`] is the editable state behind the form: personal details plus
//! an ordered list of [`LineItem`] rows. Rows are addressed by a UI-only
//! [`LineItemKey`] that never leaves the client.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identifier of a herb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HerbId(pub u64);

impl fmt::Display for HerbId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Row-local identifier used to address a line item for edits and removal.
///
/// Keys are only unique among the rows currently present in one order and are
/// never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineItemKey(pub u64);

impl fmt::Display for LineItemKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A herb from the backend catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Herb {
	pub id: HerbId,
	pub name: String,
}

impl Herb {
	pub fn new(id: u64, name: impl Into<String>) -> Self {
		Self {
			id: HerbId(id),
			name: name.into(),
		}
	}
}

/// One (herb, quantity) row of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
	pub key: LineItemKey,
	/// Selected herb, `None` while the row is unselected.
	pub herb_id: Option<HerbId>,
	/// Raw quantity as typed by the user. Parsed only when submitting.
	pub quantity: String,
}

impl LineItem {
	/// Creates an unselected row with a blank quantity.
	pub fn blank(key: LineItemKey) -> Self {
		Self {
			key,
			herb_id: None,
			quantity: String::new(),
		}
	}
}

/// The order being edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Order {
	/// External identifier, absent until the order has been persisted.
	pub external_id: Option<String>,
	pub first_name: String,
	pub last_name: String,
	pub mail: String,
	pub herbs: Vec<LineItem>,
}

impl Order {
	/// Creates an empty order with `rows` blank line items keyed `0..rows`.
	pub fn blank(rows: usize) -> Self {
		Self {
			herbs: (0..rows as u64)
				.map(|key| LineItem::blank(LineItemKey(key)))
				.collect(),
			..Self::default()
		}
	}

	/// Returns the line item addressed by `key`.
	pub fn line_item(&self, key: LineItemKey) -> Option<&LineItem> {
		self.herbs.iter().find(|item| item.key == key)
	}

	/// Returns the line item addressed by `key` for modification.
	pub fn line_item_mut(&mut self, key: LineItemKey) -> Option<&mut LineItem> {
		self.herbs.iter_mut().find(|item| item.key == key)
	}

	/// Largest key currently in use.
	pub fn max_key(&self) -> Option<LineItemKey> {
		self.herbs.iter().map(|item| item.key).max()
	}
}
