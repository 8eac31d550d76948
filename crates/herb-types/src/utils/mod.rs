//! Utility functions for string checks and link formatting.

pub mod formatting;

pub use formatting::{is_blank, order_link, truncate_id};
