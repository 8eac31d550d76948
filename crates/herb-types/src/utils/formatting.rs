//! String formatting utilities.
//!
//! Provides the link under which a persisted order can be reopened, a
//! blankness check shared by the validator, and id truncation for log output.

/// Builds the shareable link of an order, `{base}/order/{external_id}`.
///
/// A trailing slash on `public_base_url` is ignored.
pub fn order_link(public_base_url: &str, external_id: &str) -> String {
	format!(
		"{}/order/{}",
		public_base_url.trim_end_matches('/'),
		external_id
	)
}

/// Returns true when the text is empty or consists of whitespace only.
pub fn is_blank(text: &str) -> bool {
	text.trim().is_empty()
}

/// Shortens an identifier for log output.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(8) {
		Some((end, _)) => format!("{}..", &id[..end]),
		None => id.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_order_link() {
		assert_eq!(
			order_link("https://meine-kraeuterbestellung.online", "abcde"),
			"https://meine-kraeuterbestellung.online/order/abcde"
		);
		assert_eq!(
			order_link("https://meine-kraeuterbestellung.online/", "abcde"),
			"https://meine-kraeuterbestellung.online/order/abcde"
		);
	}

	#[test]
	fn test_is_blank() {
		assert!(is_blank(""));
		assert!(is_blank("  \t"));
		assert!(!is_blank(" a "));
	}

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("abcde"), "abcde");
		assert_eq!(truncate_id("abcdefgh"), "abcdefgh");
		assert_eq!(truncate_id("abcdefghijkl"), "abcdefgh..");
		assert_eq!(truncate_id("äöüäöüäöüä"), "äöüäöüäö..");
	}
}
