//! View projection.
//!
//! A [`FormView`] is a complete, self-contained snapshot of what the user
//! sees. It is derived from the controller state alone and carries no
//! references back into it, so front ends can hold on to it freely.

use crate::{message::MessageKind, FormState, Message};
use herb_types::{Herb, HerbId, LineItemKey, MessageCatalog, Order};

/// What the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormView {
	Loading { message: String },
	LoadingFailed { message: String },
	NotFound { message: String },
	NotYetOpen { title: String, notice: String },
	Form(FormPage),
}

/// The order form with all of its controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPage {
	pub title: String,
	/// Lines shown above a form that no longer accepts changes.
	pub closed_notice: Vec<String>,
	pub personal_heading: String,
	pub herbs_heading: String,
	pub first_name: TextField,
	pub last_name: TextField,
	pub mail: TextField,
	pub rows: Vec<RowView>,
	pub add: Control,
	pub submit: Control,
	pub message: Option<MessageView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
	pub label: String,
	pub value: String,
	pub enabled: bool,
}

/// A button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
	pub label: String,
	pub enabled: bool,
}

/// One line item row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
	pub key: LineItemKey,
	pub herb_id: Option<HerbId>,
	/// Catalog name of the selected herb, or the placeholder text.
	pub herb_label: String,
	pub quantity: String,
	/// Herbs selectable in this row: the catalog minus herbs chosen elsewhere.
	pub options: Vec<Herb>,
	pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
	pub kind: MessageKind,
	pub text: String,
}

/// Everything the projection reads.
pub struct ViewContext<'a> {
	pub state: FormState,
	pub order: &'a Order,
	pub herbs: &'a [Herb],
	pub title: &'a str,
	pub message: Option<&'a Message>,
	pub messages: &'a MessageCatalog,
}

/// Projects the controller state into a view.
pub fn project(ctx: &ViewContext<'_>) -> FormView {
	let messages = ctx.messages;
	match ctx.state {
		FormState::Loading => FormView::Loading {
			message: messages.loading.clone(),
		},
		FormState::LoadingTechnicalError => FormView::LoadingFailed {
			message: messages.loading_failed.clone(),
		},
		FormState::NotFound => FormView::NotFound {
			message: messages.order_not_found.clone(),
		},
		FormState::NotYetOpen => FormView::NotYetOpen {
			title: ctx.title.to_string(),
			notice: messages.not_yet_open.clone(),
		},
		FormState::Closed
		| FormState::PlaceOrder
		| FormState::SaveInProcess
		| FormState::SaveSuccessful => FormView::Form(form_page(ctx)),
	}
}

fn form_page(ctx: &ViewContext<'_>) -> FormPage {
	let labels = &ctx.messages.labels;
	let enabled = ctx.state.is_editable();
	let text_field = |label: &str, value: &str| TextField {
		label: label.to_string(),
		value: value.to_string(),
		enabled,
	};

	let closed_notice = if ctx.state == FormState::Closed {
		vec![ctx.messages.closed.clone(), ctx.messages.closed_contact.clone()]
	} else {
		Vec::new()
	};

	FormPage {
		title: ctx.title.to_string(),
		closed_notice,
		personal_heading: labels.personal_heading.clone(),
		herbs_heading: labels.herbs_heading.clone(),
		first_name: text_field(&labels.first_name, &ctx.order.first_name),
		last_name: text_field(&labels.last_name, &ctx.order.last_name),
		mail: text_field(&labels.mail, &ctx.order.mail),
		rows: rows(ctx, enabled),
		add: Control {
			label: labels.add.clone(),
			enabled,
		},
		submit: Control {
			label: labels.submit.clone(),
			enabled,
		},
		message: ctx.message.map(|message| MessageView {
			kind: message.kind(),
			text: message.render(ctx.messages),
		}),
	}
}

fn rows(ctx: &ViewContext<'_>, enabled: bool) -> Vec<RowView> {
	ctx.order
		.herbs
		.iter()
		.map(|item| {
			let taken_elsewhere = |id: HerbId| {
				ctx.order
					.herbs
					.iter()
					.any(|other| other.key != item.key && other.herb_id == Some(id))
			};
			let herb_label = match item.herb_id {
				None => ctx.messages.labels.unselected.clone(),
				Some(id) => ctx
					.herbs
					.iter()
					.find(|herb| herb.id == id)
					.map(|herb| herb.name.clone())
					.unwrap_or_else(|| format!("#{}", id)),
			};

			RowView {
				key: item.key,
				herb_id: item.herb_id,
				herb_label,
				quantity: item.quantity.clone(),
				options: ctx
					.herbs
					.iter()
					.filter(|herb| !taken_elsewhere(herb.id))
					.cloned()
					.collect(),
				enabled,
			}
		})
		.collect()
}
