//! Order form logic for the herb pre-order client.
//!
//! This crate holds everything between the backend clients and a front end:
//! the lifecycle state machine, edit operations on the order, the validator,
//! status messages and the view projection. [`FormController`] ties them
//! together and publishes a fresh [`FormView`] after every change.

use herb_api::ApiError;
use thiserror::Error;

pub mod controller;
pub mod edit;
pub mod keys;
pub mod message;
pub mod state;
pub mod validation;
pub mod view;

pub use controller::{FormController, SubmitOutcome};
pub use edit::{FormEdit, HerbChoice};
pub use message::{Message, MessageKind};
pub use state::FormState;
pub use view::{FormPage, FormView, RowView};

/// Errors returned by form operations.
#[derive(Debug, Error)]
pub enum FormError {
	/// The form does not accept edits or submissions in its current state.
	#[error("Form is locked in state {0}")]
	Locked(FormState),
	/// The chosen herb is not in the catalog.
	#[error("Unknown herb: {0}")]
	UnknownHerb(String),
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition { from: FormState, to: FormState },
	/// A submission reached the backend and failed.
	#[error("Order backend error: {0}")]
	Api(#[from] ApiError),
}
