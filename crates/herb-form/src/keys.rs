//! Line item key generation.

use herb_types::{LineItemKey, Order};
use std::time::{SystemTime, UNIX_EPOCH};

/// Issues keys for rows added after the order was created or loaded.
///
/// Keys are millisecond timestamps, bumped past every key already present in
/// the order and every key issued before, so that rapid additions never
/// collide.
pub struct KeyGenerator {
	clock: fn() -> u64,
	last: Option<u64>,
}

impl KeyGenerator {
	pub fn new() -> Self {
		Self::with_clock(now_millis)
	}

	/// Creates a generator reading time from `clock`.
	pub fn with_clock(clock: fn() -> u64) -> Self {
		Self { clock, last: None }
	}

	/// Returns a key not used by any row of `order`.
	pub fn next_key(&mut self, order: &Order) -> LineItemKey {
		let mut candidate = (self.clock)();
		if let Some(last) = self.last {
			candidate = candidate.max(last.saturating_add(1));
		}
		if let Some(max) = order.max_key() {
			candidate = candidate.max(max.0.saturating_add(1));
		}
		self.last = Some(candidate);
		LineItemKey(candidate)
	}
}

impl Default for KeyGenerator {
	fn default() -> Self {
		Self::new()
	}
}

fn now_millis() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_millis() as u64)
		.unwrap_or_default()
}
