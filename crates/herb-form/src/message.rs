//! Status messages shown below the form.

use herb_types::{MessageCatalog, ValidationFailure};

/// Visual weight of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
	Info,
	Success,
	Error,
}

/// The message currently attached to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
	Validation(ValidationFailure),
	/// A create or update request is in flight.
	Saving,
	Created { link: String },
	Updated { link: String },
	SubmitFailed,
}

impl Message {
	pub fn kind(&self) -> MessageKind {
		match self {
			Message::Validation(_) | Message::SubmitFailed => MessageKind::Error,
			Message::Saving => MessageKind::Info,
			Message::Created { .. } | Message::Updated { .. } => MessageKind::Success,
		}
	}

	/// Renders the message text from the catalog.
	pub fn render(&self, catalog: &MessageCatalog) -> String {
		match self {
			Message::Validation(failure) => catalog.validation(*failure).to_string(),
			Message::Saving => catalog.saving.clone(),
			Message::Created { link } => {
				format!("{} {}", catalog.order_created, catalog.change_hint(link))
			},
			Message::Updated { link } => {
				format!("{} {}", catalog.order_updated, catalog.change_hint(link))
			},
			Message::SubmitFailed => catalog.submit_failed.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_created_message_contains_link() {
		let catalog = MessageCatalog::default();
		let text = Message::Created {
			link: "https://meine-kraeuterbestellung.online/order/abcde".to_string(),
		}
		.render(&catalog);

		assert!(text.starts_with(&catalog.order_created));
		assert!(text.contains("https://meine-kraeuterbestellung.online/order/abcde"));
		assert!(!text.contains("{link}"));
	}

	#[test]
	fn test_validation_message_uses_catalog() {
		let mut catalog = MessageCatalog::default();
		catalog.duplicate_herbs = "No duplicates please".to_string();

		let message = Message::Validation(ValidationFailure::DuplicateHerbs);
		assert_eq!(message.render(&catalog), "No duplicates please");
		assert_eq!(message.kind(), MessageKind::Error);
		assert_eq!(Message::Saving.kind(), MessageKind::Info);
	}
}
