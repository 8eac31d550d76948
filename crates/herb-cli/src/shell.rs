//! Interactive line-oriented front end.
//!
//! Reads one command per line, forwards it to the form controller and prints
//! the view whenever the controller published a new one.

use crate::render::render;
use clap::{Parser, Subcommand};
use herb_form::{FormController, FormEdit, FormState, FormView, HerbChoice};
use herb_types::{HerbId, LineItemKey};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "herb-order", disable_version_flag = true)]
struct ShellLine {
	#[command(subcommand)]
	command: ShellCommand,
}

/// Commands understood by the shell.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
	/// Set the first name
	First {
		#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
		value: Vec<String>,
	},
	/// Set the last name
	Last {
		#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
		value: Vec<String>,
	},
	/// Set the mail address
	Mail {
		#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
		value: Vec<String>,
	},
	/// Append an empty herb row
	Add,
	/// Remove a herb row
	Remove { key: u64 },
	/// Choose the herb of a row by name or catalog id
	Herb {
		key: u64,
		#[arg(required = true, trailing_var_arg = true)]
		herb: Vec<String>,
	},
	/// Reset the herb of a row
	Clear { key: u64 },
	/// Set the quantity of a row
	Qty {
		key: u64,
		#[arg(default_value = "", allow_hyphen_values = true)]
		quantity: String,
	},
	/// Send the order
	Submit,
	/// Print the form
	Show,
	/// Leave
	Quit,
}

impl ShellCommand {
	/// Parses one input line.
	fn parse(line: &str) -> Result<Self, clap::Error> {
		ShellLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
	}

	fn into_edit(self) -> Option<FormEdit> {
		let edit = match self {
			ShellCommand::First { value } => FormEdit::SetFirstName(value.join(" ")),
			ShellCommand::Last { value } => FormEdit::SetLastName(value.join(" ")),
			ShellCommand::Mail { value } => FormEdit::SetMail(value.join(" ")),
			ShellCommand::Add => FormEdit::AddHerb,
			ShellCommand::Remove { key } => FormEdit::RemoveHerb(LineItemKey(key)),
			ShellCommand::Herb { key, herb } => {
				let herb = herb.join(" ");
				let choice = match herb.parse::<u64>() {
					Ok(id) => HerbChoice::ById(HerbId(id)),
					Err(_) => HerbChoice::ByName(herb),
				};
				FormEdit::ChangeHerb {
					key: LineItemKey(key),
					choice,
				}
			},
			ShellCommand::Clear { key } => FormEdit::ChangeHerb {
				key: LineItemKey(key),
				choice: HerbChoice::Cleared,
			},
			ShellCommand::Qty { key, quantity } => FormEdit::ChangeQuantity {
				key: LineItemKey(key),
				raw: quantity,
			},
			ShellCommand::Submit | ShellCommand::Show | ShellCommand::Quit => return None,
		};
		Some(edit)
	}
}

/// Terminal session around one form controller.
pub struct Shell<W: Write> {
	form: FormController,
	views: watch::Receiver<FormView>,
	out: W,
}

impl<W: Write> Shell<W> {
	pub fn new(form: FormController, out: W) -> Self {
		let views = form.subscribe();
		Self { form, views, out }
	}

	/// Runs until `quit`, end of input or a terminal form state.
	pub async fn run<R>(&mut self, input: R) -> io::Result<()>
	where
		R: AsyncBufRead + Unpin,
	{
		self.print_view()?;
		let mut lines = input.lines();

		while !self.form.state().is_terminal() {
			write!(self.out, "> ")?;
			self.out.flush()?;

			let Some(line) = lines.next_line().await? else {
				break;
			};
			if line.trim().is_empty() {
				continue;
			}

			match ShellCommand::parse(&line) {
				Ok(ShellCommand::Quit) => break,
				Ok(command) => self.execute(command).await?,
				Err(e) => write!(self.out, "{}", e)?,
			}
		}
		Ok(())
	}

	async fn execute(&mut self, command: ShellCommand) -> io::Result<()> {
		match command {
			ShellCommand::Show => return self.print_view(),
			ShellCommand::Submit => {
				if let Err(e) = self.form.submit().await {
					tracing::debug!(error = %e, "Submit did not complete");
					if !matches!(e, herb_form::FormError::Api(_)) {
						writeln!(self.out, "!! {}", e)?;
					}
				}
			},
			command => {
				if let Some(edit) = command.into_edit() {
					if let Err(e) = self.form.apply(edit) {
						writeln!(self.out, "!! {}", e)?;
					}
				}
			},
		}
		self.print_if_changed()
	}

	fn print_view(&mut self) -> io::Result<()> {
		let view = self.views.borrow_and_update().clone();
		write!(self.out, "{}", render(&view))
	}

	fn print_if_changed(&mut self) -> io::Result<()> {
		if self.views.has_changed().unwrap_or(false) {
			self.print_view()?;
		}
		Ok(())
	}

	/// Final form state, for reporting after the session ended.
	pub fn state(&self) -> FormState {
		self.form.state()
	}

	#[cfg(test)]
	pub fn into_output(self) -> W {
		self.out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use herb_api::{implementations::memory::MemoryOrderApi, OrderApiService};
	use herb_config::FormConfig;
	use herb_types::{Herb, MessageCatalog, OrderBatch, OrderBatchState};
	use std::sync::Arc;

	fn batch(order_state: OrderBatchState) -> OrderBatch {
		OrderBatch {
			name: "Kräuter 2025".to_string(),
			order_state,
		}
	}

	async fn form(order_state: OrderBatchState) -> FormController {
		let api = MemoryOrderApi::new(
			"abcde",
			batch(order_state),
			vec![Herb::new(1, "Basilikum"), Herb::new(2, "Zitronen Melisse")],
		);
		let mut form = FormController::new(
			Arc::new(OrderApiService::new(Box::new(api))),
			FormConfig {
				default_rows: 2,
				..FormConfig::default()
			},
			MessageCatalog::default(),
			"Kräuterbestellung",
			None,
		);
		form.initialize().await.unwrap();
		form
	}

	async fn session(order_state: OrderBatchState, input: &str) -> (String, FormState) {
		let mut shell = Shell::new(form(order_state).await, Vec::new());
		shell.run(input.as_bytes()).await.unwrap();
		let state = shell.state();
		(String::from_utf8(shell.into_output()).unwrap(), state)
	}

	#[test]
	fn test_parse_commands() {
		assert_eq!(
			ShellCommand::parse("first Anna Maria").unwrap(),
			ShellCommand::First {
				value: vec!["Anna".to_string(), "Maria".to_string()]
			}
		);
		assert_eq!(
			ShellCommand::parse("qty 3 -2").unwrap(),
			ShellCommand::Qty {
				key: 3,
				quantity: "-2".to_string()
			}
		);
		assert_eq!(
			ShellCommand::parse("qty 3").unwrap(),
			ShellCommand::Qty {
				key: 3,
				quantity: String::new()
			}
		);
		assert!(ShellCommand::parse("remove abc").is_err());
		assert!(ShellCommand::parse("herb 1").is_err());
		assert!(ShellCommand::parse("dance").is_err());
	}

	#[test]
	fn test_herb_choice_by_id_or_name() {
		let edit = ShellCommand::parse("herb 0 2").unwrap().into_edit();
		assert_eq!(
			edit,
			Some(FormEdit::ChangeHerb {
				key: LineItemKey(0),
				choice: HerbChoice::ById(HerbId(2)),
			})
		);

		let edit = ShellCommand::parse("herb 1 Zitronen Melisse").unwrap().into_edit();
		assert_eq!(
			edit,
			Some(FormEdit::ChangeHerb {
				key: LineItemKey(1),
				choice: HerbChoice::ByName("Zitronen Melisse".to_string()),
			})
		);
		assert_eq!(ShellCommand::Show.into_edit(), None);
	}

	#[tokio::test]
	async fn test_place_order_session() {
		let input = "first Anna\nlast Berg\nmail anna@example.org\nherb 0 Zitronen Melisse\nqty 0 3\nsubmit\n";
		let (output, state) = session(OrderBatchState::OrdersOpen, input).await;

		assert_eq!(state, FormState::SaveSuccessful);
		assert!(output.contains("[0] Zitronen Melisse x 3"));
		assert!(output.contains("https://meine-kraeuterbestellung.online/order/"));
	}

	#[tokio::test]
	async fn test_validation_message_shown() {
		let (output, state) = session(OrderBatchState::OrdersOpen, "submit\nquit\n").await;

		assert_eq!(state, FormState::PlaceOrder);
		assert!(output.contains("!! Bitte gib deinen Vornamen ein!"));
	}

	#[tokio::test]
	async fn test_unknown_herb_reported() {
		let (output, _) = session(OrderBatchState::OrdersOpen, "herb 0 Petersilie\n").await;
		assert!(output.contains("!! Unknown herb: Petersilie"));
	}

	#[tokio::test]
	async fn test_closed_form_ends_session() {
		let (output, state) = session(OrderBatchState::Closed, "add\n").await;

		assert_eq!(state, FormState::Closed);
		assert!(output.contains("Shivam oder Amrut"));
		assert!(!output.contains("> "));
	}
}
