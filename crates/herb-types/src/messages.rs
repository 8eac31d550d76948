//! User-facing text.
//!
//! Every string shown to the user comes from [`MessageCatalog`]. The defaults
//! are German; any entry can be overridden from the `[messages]` section of the
//! configuration file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons the validator rejects an order, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationFailure {
	#[error("first name is blank")]
	MissingFirstName,
	#[error("last name is blank")]
	MissingLastName,
	#[error("mail address is blank")]
	MissingMail,
	#[error("order contains no herbs")]
	NoHerbs,
	#[error("a herb row lacks a herb or a positive quantity")]
	IncompleteHerbRows,
	#[error("the same herb appears in more than one row")]
	DuplicateHerbs,
}

/// Placeholder replaced by the order link in [`MessageCatalog::change_hint`].
pub const LINK_PLACEHOLDER: &str = "{link}";

/// Localized texts for messages, notices and control labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
	pub missing_first_name: String,
	pub missing_last_name: String,
	pub missing_mail: String,
	pub no_herbs: String,
	pub incomplete_herb_rows: String,
	pub duplicate_herbs: String,
	/// Shown while a create or update request is in flight.
	pub saving: String,
	pub order_created: String,
	pub order_updated: String,
	/// Follows a success message. `{link}` is replaced by the order link.
	pub change_hint: String,
	pub submit_failed: String,
	pub loading: String,
	pub loading_failed: String,
	pub order_not_found: String,
	pub not_yet_open: String,
	pub closed: String,
	pub closed_contact: String,
	pub under_construction: String,
	pub labels: FormLabels,
}

/// Labels of the form controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormLabels {
	pub personal_heading: String,
	pub herbs_heading: String,
	pub first_name: String,
	pub last_name: String,
	pub mail: String,
	pub herb: String,
	pub quantity: String,
	pub unselected: String,
	pub add: String,
	pub remove: String,
	pub submit: String,
}

impl Default for MessageCatalog {
	fn default() -> Self {
		Self {
			missing_first_name: "Bitte gib deinen Vornamen ein!".into(),
			missing_last_name: "Bitte gib deinen Nachnamen ein!".into(),
			missing_mail: "Bitte gib deine E-Mail-Adresse ein!".into(),
			no_herbs: "Bitte füge Kräuter hinzu!".into(),
			incomplete_herb_rows: "Bitte kontrolliere deine Kräuter. In einzelnen Zeilen fehlen Kräuternamen oder die Anzahl!".into(),
			duplicate_herbs: "Bitte entferne die doppelten Kräuter!".into(),
			saving: "Die Bestellung wird übermittelt ...".into(),
			order_created: "Die Bestellung wurde aufgenommen. Vielen Dank!".into(),
			order_updated: "Die Bestellung wurde aktualisiert!".into(),
			change_hint: "Deine Bestellung kannst du jederzeit ändern. Gehe dazu einfach auf {link}.".into(),
			submit_failed: "Beim Abschicken der Bestellung ist ein Fehler aufgetreten!".into(),
			loading: "Die Kräuterbestellung wird geladen ...".into(),
			loading_failed: "Beim Laden der Kräuterbestellung ist ein Fehler aufgetreten! Bitte versuche es später noch einmal.".into(),
			order_not_found: "Die angegebene Kräuterbestellung wurde nicht gefunden!".into(),
			not_yet_open: "Die Kräuterbestellung wird demnächst geöffnet. Bitte habe noch etwas Geduld und schaue später noch einmal vorbei.".into(),
			closed: "Die Kräuterbestellung ist abgeschlossen. Es kann keine neue Bestellung mehr aufgegeben und keine Bestellung mehr verändert werden.".into(),
			closed_contact: "Bei Fragen zur Bestellung wende dich bitte an Shivam oder Amrut.".into(),
			under_construction: "Diese Seite befindet sich im Aufbau.".into(),
			labels: FormLabels::default(),
		}
	}
}

impl Default for FormLabels {
	fn default() -> Self {
		Self {
			personal_heading: "Persönliche Informationen".into(),
			herbs_heading: "Kräuter".into(),
			first_name: "Vorname".into(),
			last_name: "Nachname".into(),
			mail: "E-Mail-Adresse".into(),
			herb: "Kräuter".into(),
			quantity: "Anzahl".into(),
			unselected: "---Bitte wählen---".into(),
			add: "Hinzufügen".into(),
			remove: "Entfernen".into(),
			submit: "Bestellung Abschicken".into(),
		}
	}
}

impl MessageCatalog {
	/// Text shown for a validation failure.
	pub fn validation(&self, failure: ValidationFailure) -> &str {
		match failure {
			ValidationFailure::MissingFirstName => &self.missing_first_name,
			ValidationFailure::MissingLastName => &self.missing_last_name,
			ValidationFailure::MissingMail => &self.missing_mail,
			ValidationFailure::NoHerbs => &self.no_herbs,
			ValidationFailure::IncompleteHerbRows => &self.incomplete_herb_rows,
			ValidationFailure::DuplicateHerbs => &self.duplicate_herbs,
		}
	}

	/// Hint pointing the user at the link under which the order can be changed.
	pub fn change_hint(&self, link: &str) -> String {
		self.change_hint.replace(LINK_PLACEHOLDER, link)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_every_failure_has_distinct_text() {
		let catalog = MessageCatalog::default();
		let failures = [
			ValidationFailure::MissingFirstName,
			ValidationFailure::MissingLastName,
			ValidationFailure::MissingMail,
			ValidationFailure::NoHerbs,
			ValidationFailure::IncompleteHerbRows,
			ValidationFailure::DuplicateHerbs,
		];

		let texts: std::collections::HashSet<&str> =
			failures.iter().map(|f| catalog.validation(*f)).collect();
		assert_eq!(texts.len(), failures.len());
		assert_eq!(
			catalog.validation(ValidationFailure::NoHerbs),
			"Bitte füge Kräuter hinzu!"
		);
	}

	#[test]
	fn test_change_hint_embeds_link() {
		let catalog = MessageCatalog::default();
		let hint = catalog.change_hint("https://example.org/order/abc");
		assert!(hint.contains("https://example.org/order/abc"));
		assert!(!hint.contains(LINK_PLACEHOLDER));
	}

	#[test]
	fn test_partial_override_keeps_defaults() {
		let catalog: MessageCatalog = toml::from_str(
			r#"
no_herbs = "Please add herbs!"
[labels]
submit = "Send"
"#,
		)
		.unwrap();

		assert_eq!(catalog.no_herbs, "Please add herbs!");
		assert_eq!(catalog.labels.submit, "Send");
		assert_eq!(catalog.labels.add, "Hinzufügen");
		assert_eq!(catalog.missing_mail, MessageCatalog::default().missing_mail);
	}
}
