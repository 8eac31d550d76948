//! Route parsing.
//!
//! Accepts bare paths (`/order/abc`) as well as full links as they appear in
//! confirmation messages (`https://host/order/abc`).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
	#[error("Unknown route: {0}")]
	Unknown(String),
}

/// Page selected by the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
	/// `/`, which only shows a notice.
	Home,
	/// `/order`
	NewOrder,
	/// `/order/{id}`
	ExistingOrder(String),
}

impl Route {
	pub fn parse(input: &str) -> Result<Self, RouteError> {
		let input = input.trim();
		let path = match input.split_once("://") {
			Some((_, rest)) => rest.find('/').map_or("/", |start| &rest[start..]),
			None => input,
		};
		let path = path.split(['?', '#']).next().unwrap_or_default();

		let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
		match segments.as_slice() {
			[] => Ok(Route::Home),
			["order"] => Ok(Route::NewOrder),
			["order", id] => Ok(Route::ExistingOrder(id.to_string())),
			_ => Err(RouteError::Unknown(input.to_string())),
		}
	}

	/// Identifier of the order to update, if any.
	pub fn order_id(&self) -> Option<String> {
		match self {
			Route::ExistingOrder(id) => Some(id.clone()),
			Route::Home | Route::NewOrder => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_paths() {
		assert_eq!(Route::parse("/"), Ok(Route::Home));
		assert_eq!(Route::parse(""), Ok(Route::Home));
		assert_eq!(Route::parse("/order"), Ok(Route::NewOrder));
		assert_eq!(Route::parse("/order/"), Ok(Route::NewOrder));
		assert_eq!(
			Route::parse("/order/abcde"),
			Ok(Route::ExistingOrder("abcde".to_string()))
		);
	}

	#[test]
	fn test_full_links() {
		assert_eq!(
			Route::parse("https://meine-kraeuterbestellung.online/order/abcde?ref=mail"),
			Ok(Route::ExistingOrder("abcde".to_string()))
		);
		assert_eq!(
			Route::parse("http://localhost:3000"),
			Ok(Route::Home)
		);
	}

	#[test]
	fn test_unknown_routes() {
		assert!(Route::parse("/orders").is_err());
		assert_eq!(
			Route::parse("/order/a/b"),
			Err(RouteError::Unknown("/order/a/b".to_string()))
		);
	}

	#[test]
	fn test_order_id() {
		assert_eq!(Route::ExistingOrder("x".to_string()).order_id().as_deref(), Some("x"));
		assert_eq!(Route::NewOrder.order_id(), None);
	}
}
