//! Client-side order validation.
//!
//! Validation works on a cleaned copy of the order: rows the user never
//! touched are dropped first, then the remaining order is checked field by
//! field. The first failing check decides the reported message.

use herb_types::{is_blank, HerbQuantity, LineItem, Order, OrderPayload, ValidationFailure};
use std::collections::HashSet;

/// Parses a typed quantity into a positive count.
///
/// Blank, non-numeric, fractional, zero and negative input yields `None`.
pub fn parse_quantity(raw: &str) -> Option<u32> {
	raw.trim().parse::<u32>().ok().filter(|quantity| *quantity > 0)
}

/// A row is empty when no herb was chosen and the quantity is not a positive
/// number.
///
/// Any positive number keeps the row, including fractions such as `2.5`, so
/// that a started row is reported as incomplete instead of silently dropped.
pub fn is_empty_row(item: &LineItem) -> bool {
	item.herb_id.is_none()
		&& !matches!(item.quantity.trim().parse::<f64>(), Ok(quantity) if quantity > 0.0)
}

/// Returns a copy of `order` without empty rows, preserving row order.
pub fn cleanup(order: &Order) -> Order {
	Order {
		herbs: order
			.herbs
			.iter()
			.filter(|item| !is_empty_row(item))
			.cloned()
			.collect(),
		..order.clone()
	}
}

/// Validates the order and builds the submission payload.
pub fn validate(order: &Order) -> Result<OrderPayload, ValidationFailure> {
	let cleaned = cleanup(order);

	if is_blank(&cleaned.first_name) {
		return Err(ValidationFailure::MissingFirstName);
	}
	if is_blank(&cleaned.last_name) {
		return Err(ValidationFailure::MissingLastName);
	}
	if is_blank(&cleaned.mail) {
		return Err(ValidationFailure::MissingMail);
	}
	if cleaned.herbs.is_empty() {
		return Err(ValidationFailure::NoHerbs);
	}

	let herbs = cleaned
		.herbs
		.iter()
		.map(|item| match (item.herb_id, parse_quantity(&item.quantity)) {
			(Some(herb_id), Some(quantity)) => Ok(HerbQuantity { herb_id, quantity }),
			_ => Err(ValidationFailure::IncompleteHerbRows),
		})
		.collect::<Result<Vec<_>, _>>()?;

	let mut seen = HashSet::new();
	if !herbs.iter().all(|row| seen.insert(row.herb_id)) {
		return Err(ValidationFailure::DuplicateHerbs);
	}

	Ok(OrderPayload {
		first_name: cleaned.first_name,
		last_name: cleaned.last_name,
		mail: cleaned.mail,
		herbs,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use herb_types::{HerbId, LineItemKey};

	fn row(key: u64, herb: Option<u64>, quantity: &str) -> LineItem {
		LineItem {
			key: LineItemKey(key),
			herb_id: herb.map(HerbId),
			quantity: quantity.to_string(),
		}
	}

	fn order(rows: Vec<LineItem>) -> Order {
		Order {
			external_id: None,
			first_name: "Anna".to_string(),
			last_name: "Berg".to_string(),
			mail: "anna@example.org".to_string(),
			herbs: rows,
		}
	}

	#[test]
	fn test_parse_quantity() {
		assert_eq!(parse_quantity("3"), Some(3));
		assert_eq!(parse_quantity(" 12 "), Some(12));
		assert_eq!(parse_quantity(""), None);
		assert_eq!(parse_quantity("0"), None);
		assert_eq!(parse_quantity("-2"), None);
		assert_eq!(parse_quantity("2.5"), None);
		assert_eq!(parse_quantity("viele"), None);
	}

	#[test]
	fn test_cleanup_removes_exactly_empty_rows() {
		let original = order(vec![
			row(0, None, ""),
			row(1, Some(2), ""),
			row(2, None, "0"),
			row(3, None, "4"),
			row(4, Some(1), "1"),
			row(5, None, "abc"),
			row(6, None, "2.5"),
			row(7, None, "-1"),
		]);

		let cleaned = cleanup(&original);
		let keys: Vec<u64> = cleaned.herbs.iter().map(|item| item.key.0).collect();
		assert_eq!(keys, vec![1, 3, 4, 6]);
		assert_eq!(cleaned.first_name, original.first_name);
	}

	#[test]
	fn test_personal_fields_checked_in_order() {
		let mut o = order(vec![row(0, Some(1), "1")]);
		o.first_name = " ".to_string();
		o.last_name = String::new();
		assert_eq!(validate(&o), Err(ValidationFailure::MissingFirstName));

		o.first_name = "Anna".to_string();
		assert_eq!(validate(&o), Err(ValidationFailure::MissingLastName));

		o.last_name = "Berg".to_string();
		o.mail = "\t".to_string();
		assert_eq!(validate(&o), Err(ValidationFailure::MissingMail));
	}

	#[test]
	fn test_no_selected_rows_is_no_herbs() {
		let o = order(vec![row(0, None, ""), row(1, None, "0"), row(2, None, "")]);
		assert_eq!(validate(&o), Err(ValidationFailure::NoHerbs));

		let o = order(vec![]);
		assert_eq!(validate(&o), Err(ValidationFailure::NoHerbs));
	}

	#[test]
	fn test_half_filled_rows_are_incomplete() {
		let o = order(vec![row(0, Some(1), "2"), row(1, Some(2), "")]);
		assert_eq!(validate(&o), Err(ValidationFailure::IncompleteHerbRows));

		let o = order(vec![row(0, None, "2")]);
		assert_eq!(validate(&o), Err(ValidationFailure::IncompleteHerbRows));

		let o = order(vec![row(0, Some(1), "0")]);
		assert_eq!(validate(&o), Err(ValidationFailure::IncompleteHerbRows));
	}

	#[test]
	fn test_fractional_quantity_without_herb_is_incomplete() {
		let o = order(vec![row(0, Some(1), "2"), row(1, None, "2.5")]);
		assert_eq!(validate(&o), Err(ValidationFailure::IncompleteHerbRows));

		let o = order(vec![row(0, Some(1), "2.5")]);
		assert_eq!(validate(&o), Err(ValidationFailure::IncompleteHerbRows));
	}

	#[test]
	fn test_duplicate_herbs_rejected() {
		let o = order(vec![
			row(0, Some(1), "2"),
			row(1, None, ""),
			row(2, Some(3), "1"),
			row(3, Some(1), "5"),
		]);
		assert_eq!(validate(&o), Err(ValidationFailure::DuplicateHerbs));
	}

	#[test]
	fn test_incomplete_rows_win_over_duplicates() {
		let o = order(vec![row(0, Some(1), "2"), row(1, Some(1), "2"), row(2, Some(4), "")]);
		assert_eq!(validate(&o), Err(ValidationFailure::IncompleteHerbRows));
	}

	#[test]
	fn test_valid_order_yields_payload() {
		let o = order(vec![
			row(0, None, ""),
			row(1, Some(7), " 3"),
			row(2, Some(2), "1"),
			row(3, None, ""),
		]);

		let payload = validate(&o).unwrap();
		assert_eq!(payload.first_name, "Anna");
		assert_eq!(
			payload.herbs,
			vec![
				HerbQuantity {
					herb_id: HerbId(7),
					quantity: 3
				},
				HerbQuantity {
					herb_id: HerbId(2),
					quantity: 1
				},
			]
		);
	}
}
