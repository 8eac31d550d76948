//! Form controller.
//!
//! Owns one form session: the order being edited, the reference data, the
//! lifecycle state and the current message. Loading and submission await the
//! backend inline, so a dropped controller never applies a late response.

use crate::{
	edit::{self, FormEdit},
	keys::KeyGenerator,
	validation,
	view::{self, FormView, ViewContext},
	FormError, FormState, Message,
};
use herb_api::{ApiError, OrderApiService};
use herb_config::{Config, FlowMode, FormConfig};
use herb_types::{
	order_link, truncate_id, Herb, MessageCatalog, Order, OrderBatch, OrderBatchState,
	SubmitReceipt, ValidationFailure,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::instrument;

/// Result of a submission that did not fail at the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// The validator refused the order. Nothing was sent.
	Rejected(ValidationFailure),
	/// The backend stored the order.
	Saved(SubmitReceipt),
}

/// Reference data and order gathered while loading.
struct Loaded {
	state: FormState,
	batch: Option<OrderBatch>,
	herbs: Vec<Herb>,
	order: Option<Order>,
}

/// Drives one order form session.
pub struct FormController {
	api: Arc<OrderApiService>,
	config: FormConfig,
	messages: MessageCatalog,
	default_title: String,
	/// Identifier from the route, present in the update flow.
	order_id: Option<String>,
	state: FormState,
	order: Order,
	herbs: Vec<Herb>,
	batch: Option<OrderBatch>,
	message: Option<Message>,
	keys: KeyGenerator,
	views: watch::Sender<FormView>,
}

impl FormController {
	pub fn new(
		api: Arc<OrderApiService>,
		config: FormConfig,
		messages: MessageCatalog,
		default_title: impl Into<String>,
		order_id: Option<String>,
	) -> Self {
		let (views, _) = watch::channel(FormView::Loading {
			message: messages.loading.clone(),
		});
		Self {
			api,
			order: Order::blank(config.default_rows),
			config,
			messages,
			default_title: default_title.into(),
			order_id,
			state: FormState::Loading,
			herbs: Vec::new(),
			batch: None,
			message: None,
			keys: KeyGenerator::new(),
			views,
		}
	}

	/// Creates a controller using the form settings and texts of `config`.
	pub fn from_config(api: Arc<OrderApiService>, config: &Config, order_id: Option<String>) -> Self {
		Self::new(
			api,
			config.form.clone(),
			config.messages.clone(),
			config.app.title.clone(),
			order_id,
		)
	}

	pub fn state(&self) -> FormState {
		self.state
	}

	pub fn order(&self) -> &Order {
		&self.order
	}

	pub fn herbs(&self) -> &[Herb] {
		&self.herbs
	}

	pub fn message(&self) -> Option<&Message> {
		self.message.as_ref()
	}

	pub fn messages(&self) -> &MessageCatalog {
		&self.messages
	}

	/// Heading of the form: the batch name when known.
	pub fn title(&self) -> &str {
		self.batch
			.as_ref()
			.map(|batch| batch.name.as_str())
			.unwrap_or(&self.default_title)
	}

	/// Receives a fresh view after every change.
	pub fn subscribe(&self) -> watch::Receiver<FormView> {
		self.views.subscribe()
	}

	/// Projects the current state into a view.
	pub fn view(&self) -> FormView {
		view::project(&ViewContext {
			state: self.state,
			order: &self.order,
			herbs: &self.herbs,
			title: self.title(),
			message: self.message.as_ref(),
			messages: &self.messages,
		})
	}

	fn publish(&self) {
		self.views.send_replace(self.view());
	}

	fn set_state(&mut self, to: FormState) -> Result<(), FormError> {
		self.state = self.state.transition(to)?;
		Ok(())
	}

	/// Loads reference data and the order, then settles the form state.
	///
	/// Load failures are not errors: they end in `LoadingTechnicalError` or
	/// `NotFound`. Calling this twice is an invalid transition.
	#[instrument(skip(self), fields(flow = ?self.config.flow))]
	pub async fn initialize(&mut self) -> Result<FormState, FormError> {
		if self.state != FormState::Loading {
			return Err(FormError::InvalidTransition {
				from: self.state,
				to: FormState::Loading,
			});
		}

		let outcome = match self.config.flow {
			FlowMode::BatchAware => self.load_batch_aware().await,
			FlowMode::Simple => self.load_simple().await,
		};

		let next = match outcome {
			Ok(loaded) => {
				self.batch = loaded.batch;
				self.herbs = loaded.herbs;
				if let Some(mut order) = loaded.order {
					if order.external_id.is_none() {
						order.external_id = self.order_id.clone();
					}
					self.order = order;
				}
				loaded.state
			},
			Err(state) => state,
		};

		self.set_state(next)?;
		tracing::info!(state = %next, herbs = self.herbs.len(), "Order form loaded");
		self.publish();
		Ok(next)
	}

	/// Batch, then catalog, then order; each step completes before the next.
	async fn load_batch_aware(&self) -> Result<Loaded, FormState> {
		let batch = self
			.api
			.fetch_order_batch(&self.config.batch_id)
			.await
			.map_err(|_| FormState::LoadingTechnicalError)?;

		let state = match batch.order_state {
			OrderBatchState::Created => {
				return Ok(Loaded {
					state: FormState::NotYetOpen,
					batch: Some(batch),
					herbs: Vec::new(),
					order: None,
				});
			},
			OrderBatchState::OrdersOpen => FormState::PlaceOrder,
			OrderBatchState::Closed | OrderBatchState::Unknown => FormState::Closed,
		};

		let herbs = self
			.api
			.fetch_herbs()
			.await
			.map_err(|_| FormState::LoadingTechnicalError)?;
		let order = self.load_order().await?;

		Ok(Loaded {
			state,
			batch: Some(batch),
			herbs,
			order,
		})
	}

	/// Catalog and order concurrently. A missing catalog is not fatal.
	async fn load_simple(&self) -> Result<Loaded, FormState> {
		let (herbs, order) = tokio::join!(self.api.fetch_herbs(), self.load_order());
		let order = order?;
		let herbs = herbs.unwrap_or_else(|e| {
			tracing::warn!(error = %e, "Continuing without herb catalog");
			Vec::new()
		});

		Ok(Loaded {
			state: FormState::PlaceOrder,
			batch: None,
			herbs,
			order,
		})
	}

	async fn load_order(&self) -> Result<Option<Order>, FormState> {
		let Some(order_id) = &self.order_id else {
			return Ok(None);
		};
		self.api
			.fetch_order(order_id)
			.await
			.map(Some)
			.map_err(|e| match e {
				ApiError::NotFound(_) => FormState::NotFound,
				_ => FormState::LoadingTechnicalError,
			})
	}

	/// Applies a user edit and publishes the new view.
	pub fn apply(&mut self, edit: FormEdit) -> Result<(), FormError> {
		if !self.state.is_editable() {
			return Err(FormError::Locked(self.state));
		}
		edit::apply_edit(&mut self.order, &self.herbs, &mut self.keys, edit)?;
		self.publish();
		Ok(())
	}

	/// Validates the order and sends it to the backend.
	///
	/// Validation failures are reported as [`SubmitOutcome::Rejected`] and
	/// leave the form open. A backend failure sets the failure message, unlocks
	/// the form unless the failure policy says otherwise, and is returned as
	/// [`FormError::Api`].
	#[instrument(skip(self), fields(order_id = ?self.order.external_id.as_deref().map(truncate_id)))]
	pub async fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
		if !self.state.is_editable() {
			return Err(FormError::Locked(self.state));
		}

		let payload = match validation::validate(&self.order) {
			Ok(payload) => payload,
			Err(failure) => {
				tracing::debug!(%failure, "Order rejected by validation");
				self.message = Some(Message::Validation(failure));
				self.publish();
				return Ok(SubmitOutcome::Rejected(failure));
			},
		};

		self.set_state(FormState::SaveInProcess)?;
		self.message = Some(Message::Saving);
		self.publish();

		let existing = self.order.external_id.clone();
		let result = match &existing {
			None => self.api.create_order(&payload).await,
			Some(order_id) => self.api.update_order(order_id, &payload).await,
		};

		match result {
			Ok(receipt) => {
				let link = order_link(&self.config.public_base_url, &receipt.external_id);
				self.message = Some(match existing {
					None => Message::Created { link },
					Some(_) => Message::Updated { link },
				});
				self.order.external_id = Some(receipt.external_id.clone());
				self.set_state(FormState::SaveSuccessful)?;
				self.publish();
				Ok(SubmitOutcome::Saved(receipt))
			},
			Err(e) => {
				let policy = self.config.failure_policy;
				let stay_locked = match existing {
					None => policy.lock_after_failed_create,
					Some(_) => policy.lock_after_failed_update,
				};
				tracing::warn!(error = %e, locked = stay_locked, "Submitting order failed");

				self.message = Some(Message::SubmitFailed);
				if !stay_locked {
					self.set_state(FormState::PlaceOrder)?;
				}
				self.publish();
				Err(FormError::Api(e))
			},
		}
	}
}
