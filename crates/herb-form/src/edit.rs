//! Edit operations on the order being entered.

use crate::{keys::KeyGenerator, FormError};
use herb_types::{Herb, HerbId, LineItem, LineItemKey, Order};

/// How the user picked a herb for a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HerbChoice {
	/// Back to the unselected placeholder.
	Cleared,
	/// Catalog name, matched case-insensitively.
	ByName(String),
	ById(HerbId),
}

/// A single user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
	SetFirstName(String),
	SetLastName(String),
	SetMail(String),
	/// Appends an unselected row with a fresh key.
	AddHerb,
	/// Removes the row with the given key. Unknown keys are ignored.
	RemoveHerb(LineItemKey),
	ChangeHerb {
		key: LineItemKey,
		choice: HerbChoice,
	},
	/// Stores the typed quantity verbatim.
	ChangeQuantity {
		key: LineItemKey,
		raw: String,
	},
}

/// Resolves a choice against the catalog.
fn resolve(choice: HerbChoice, catalog: &[Herb]) -> Result<Option<HerbId>, FormError> {
	match choice {
		HerbChoice::Cleared => Ok(None),
		HerbChoice::ById(id) => catalog
			.iter()
			.find(|herb| herb.id == id)
			.map(|herb| Some(herb.id))
			.ok_or_else(|| FormError::UnknownHerb(id.to_string())),
		HerbChoice::ByName(name) => {
			let wanted = name.trim().to_lowercase();
			catalog
				.iter()
				.find(|herb| herb.name.to_lowercase() == wanted)
				.map(|herb| Some(herb.id))
				.ok_or(FormError::UnknownHerb(name))
		},
	}
}

/// Applies `edit` to `order`. On error the order is left unchanged.
pub fn apply_edit(
	order: &mut Order,
	catalog: &[Herb],
	keys: &mut KeyGenerator,
	edit: FormEdit,
) -> Result<(), FormError> {
	match edit {
		FormEdit::SetFirstName(value) => order.first_name = value,
		FormEdit::SetLastName(value) => order.last_name = value,
		FormEdit::SetMail(value) => order.mail = value,
		FormEdit::AddHerb => {
			let key = keys.next_key(order);
			order.herbs.push(LineItem::blank(key));
		},
		FormEdit::RemoveHerb(key) => order.herbs.retain(|item| item.key != key),
		FormEdit::ChangeHerb { key, choice } => {
			let herb_id = resolve(choice, catalog)?;
			if let Some(item) = order.line_item_mut(key) {
				item.herb_id = herb_id;
			}
		},
		FormEdit::ChangeQuantity { key, raw } => {
			if let Some(item) = order.line_item_mut(key) {
				item.quantity = raw;
			}
		},
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn catalog() -> Vec<Herb> {
		vec![Herb::new(1, "Basilikum"), Herb::new(2, "Thymian"), Herb::new(3, "Salbei")]
	}

	fn apply(order: &mut Order, keys: &mut KeyGenerator, edit: FormEdit) -> Result<(), FormError> {
		apply_edit(order, &catalog(), keys, edit)
	}

	#[test]
	fn test_add_then_remove_restores_rows() {
		let mut order = Order::blank(5);
		let before = order.herbs.clone();
		let mut keys = KeyGenerator::new();

		apply(&mut order, &mut keys, FormEdit::AddHerb).unwrap();
		assert_eq!(order.herbs.len(), 6);
		let added = order.herbs[5].key;
		assert!(before.iter().all(|item| item.key != added));

		apply(&mut order, &mut keys, FormEdit::RemoveHerb(added)).unwrap();
		assert_eq!(order.herbs, before);
	}

	#[test]
	fn test_remove_unknown_key_is_noop() {
		let mut order = Order::blank(2);
		let mut keys = KeyGenerator::new();
		apply(&mut order, &mut keys, FormEdit::RemoveHerb(LineItemKey(42))).unwrap();
		assert_eq!(order.herbs.len(), 2);
	}

	#[test]
	fn test_change_herb_by_name_and_id() {
		let mut order = Order::blank(2);
		let mut keys = KeyGenerator::new();

		apply(
			&mut order,
			&mut keys,
			FormEdit::ChangeHerb {
				key: LineItemKey(0),
				choice: HerbChoice::ByName("thymian".to_string()),
			},
		)
		.unwrap();
		apply(
			&mut order,
			&mut keys,
			FormEdit::ChangeHerb {
				key: LineItemKey(1),
				choice: HerbChoice::ById(HerbId(3)),
			},
		)
		.unwrap();

		assert_eq!(order.herbs[0].herb_id, Some(HerbId(2)));
		assert_eq!(order.herbs[1].herb_id, Some(HerbId(3)));

		apply(
			&mut order,
			&mut keys,
			FormEdit::ChangeHerb {
				key: LineItemKey(1),
				choice: HerbChoice::Cleared,
			},
		)
		.unwrap();
		assert_eq!(order.herbs[1].herb_id, None);
	}

	#[test]
	fn test_unknown_herb_leaves_row_unchanged() {
		let mut order = Order::blank(1);
		order.herbs[0].herb_id = Some(HerbId(1));
		let mut keys = KeyGenerator::new();

		let err = apply(
			&mut order,
			&mut keys,
			FormEdit::ChangeHerb {
				key: LineItemKey(0),
				choice: HerbChoice::ByName("Petersilie".to_string()),
			},
		)
		.unwrap_err();
		assert!(matches!(err, FormError::UnknownHerb(ref name) if name == "Petersilie"));
		assert_eq!(order.herbs[0].herb_id, Some(HerbId(1)));

		assert!(apply(
			&mut order,
			&mut keys,
			FormEdit::ChangeHerb {
				key: LineItemKey(0),
				choice: HerbChoice::ById(HerbId(99)),
			},
		)
		.is_err());
	}

	#[test]
	fn test_quantity_and_personal_fields_stored_verbatim() {
		let mut order = Order::blank(1);
		let mut keys = KeyGenerator::new();

		for edit in [
			FormEdit::SetFirstName("Anna ".to_string()),
			FormEdit::SetLastName("Berg".to_string()),
			FormEdit::SetMail("anna@example.org".to_string()),
			FormEdit::ChangeQuantity {
				key: LineItemKey(0),
				raw: "zwei".to_string(),
			},
		] {
			apply(&mut order, &mut keys, edit).unwrap();
		}

		assert_eq!(order.first_name, "Anna ");
		assert_eq!(order.last_name, "Berg");
		assert_eq!(order.mail, "anna@example.org");
		assert_eq!(order.herbs[0].quantity, "zwei");
	}
}
