//! Form lifecycle state machine.
//!
//! The form starts in `Loading`, settles into one of the load outcomes and,
//! when orders can be placed, cycles between `PlaceOrder` and `SaveInProcess`
//! until a submission succeeds.

use crate::FormError;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Lifecycle state of the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormState {
	Loading,
	LoadingTechnicalError,
	NotFound,
	NotYetOpen,
	Closed,
	PlaceOrder,
	SaveInProcess,
	SaveSuccessful,
}

impl FormState {
	/// Whether edit operations and submission are accepted.
	pub fn is_editable(self) -> bool {
		self == FormState::PlaceOrder
	}

	/// Whether no further transition can leave this state.
	pub fn is_terminal(self) -> bool {
		TRANSITIONS.get(&self).is_none_or(|next| next.is_empty())
	}

	/// Checks if a state transition is valid.
	pub fn can_transition_to(self, to: FormState) -> bool {
		TRANSITIONS.get(&self).is_some_and(|set| set.contains(&to))
	}

	/// Returns `to` if the transition is allowed.
	pub fn transition(self, to: FormState) -> Result<FormState, FormError> {
		if self.can_transition_to(to) {
			Ok(to)
		} else {
			Err(FormError::InvalidTransition { from: self, to })
		}
	}
}

impl fmt::Display for FormState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			FormState::Loading => "loading",
			FormState::LoadingTechnicalError => "loading_technical_error",
			FormState::NotFound => "not_found",
			FormState::NotYetOpen => "not_yet_open",
			FormState::Closed => "closed",
			FormState::PlaceOrder => "place_order",
			FormState::SaveInProcess => "save_in_process",
			FormState::SaveSuccessful => "save_successful",
		};
		f.write_str(name)
	}
}

// Static transition table - each state maps to allowed next states
static TRANSITIONS: Lazy<HashMap<FormState, HashSet<FormState>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		FormState::Loading,
		HashSet::from([
			FormState::LoadingTechnicalError,
			FormState::NotFound,
			FormState::NotYetOpen,
			FormState::Closed,
			FormState::PlaceOrder,
		]),
	);
	m.insert(FormState::PlaceOrder, HashSet::from([FormState::SaveInProcess]));
	m.insert(
		FormState::SaveInProcess,
		HashSet::from([FormState::SaveSuccessful, FormState::PlaceOrder]),
	);
	m.insert(FormState::LoadingTechnicalError, HashSet::new()); // terminal
	m.insert(FormState::NotFound, HashSet::new()); // terminal
	m.insert(FormState::NotYetOpen, HashSet::new()); // terminal
	m.insert(FormState::Closed, HashSet::new()); // terminal
	m.insert(FormState::SaveSuccessful, HashSet::new()); // terminal
	m
});
