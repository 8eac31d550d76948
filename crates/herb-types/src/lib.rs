//! Common types module for the herb pre-order client.
//!
//! This module defines the core data types shared by every crate in the
//! workspace: the editable order model, the reference data loaded from the
//! backend, the JSON payloads exchanged over the wire and the user-facing
//! message catalog.

/// API payloads exchanged with the order backend.
pub mod api;
/// Order batches (ordering windows) and their lifecycle.
pub mod batch;
/// User-facing message catalog and validation failure kinds.
pub mod messages;
/// Editable order model: orders, line items and herbs.
pub mod order;
/// Utility functions for link formatting and string checks.
pub mod utils;
/// Configuration validation types for implementation config tables.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use batch::*;
pub use messages::*;
pub use order::*;
pub use utils::{is_blank, order_link, truncate_id};
pub use validation::*;

/// Base trait for implementation registries.
///
/// Each pluggable backend provides a `Registry` struct implementing this trait
/// so that it can be looked up by the name used in the configuration file.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// e.g. `"http"` for `backend.implementations.http`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
