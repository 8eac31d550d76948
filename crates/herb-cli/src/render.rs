//! Plain-text rendering of form views.

use herb_form::{FormPage, FormView, MessageKind, RowView};
use std::fmt::Write;

/// Renders a view as terminal text, one line per element.
pub fn render(view: &FormView) -> String {
	let mut out = String::new();
	match view {
		FormView::Loading { message }
		| FormView::LoadingFailed { message }
		| FormView::NotFound { message } => {
			out.push_str(message);
			out.push('\n');
		},
		FormView::NotYetOpen { title, notice } => {
			let _ = writeln!(out, "== {} ==", title);
			let _ = writeln!(out, "{}", notice);
		},
		FormView::Form(page) => render_page(&mut out, page),
	}
	out
}

fn render_page(out: &mut String, page: &FormPage) {
	let _ = writeln!(out, "== {} ==", page.title);
	for line in &page.closed_notice {
		let _ = writeln!(out, "{}", line);
	}

	let _ = writeln!(out, "-- {} --", page.personal_heading);
	for field in [&page.first_name, &page.last_name, &page.mail] {
		let _ = writeln!(out, "{}: {}{}", field.label, field.value, locked(field.enabled));
	}

	let _ = writeln!(out, "-- {} --", page.herbs_heading);
	for row in &page.rows {
		render_row(out, row);
	}

	let _ = writeln!(
		out,
		"[{}]{} [{}]{}",
		page.add.label,
		locked(page.add.enabled),
		page.submit.label,
		locked(page.submit.enabled)
	);

	if let Some(message) = &page.message {
		let prefix = match message.kind {
			MessageKind::Info => "..",
			MessageKind::Success => "OK",
			MessageKind::Error => "!!",
		};
		let _ = writeln!(out, "{} {}", prefix, message.text);
	}
}

fn render_row(out: &mut String, row: &RowView) {
	let _ = write!(out, "  [{}] {} x {}", row.key, row.herb_label, row.quantity);
	if row.enabled {
		let options: Vec<&str> = row.options.iter().map(|herb| herb.name.as_str()).collect();
		let _ = write!(out, "  ({})", options.join(", "));
	}
	out.push('\n');
}

fn locked(enabled: bool) -> &'static str {
	if enabled {
		""
	} else {
		" (gesperrt)"
	}
}
