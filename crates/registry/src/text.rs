//! Rich display text.
//!
//! Names are stored as authored, including `<tag>` style markup. Formatting is the
//! host's business; this module only knows how to strip markup for logs and plain
//! text output.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[a-zA-Z!#_][^<>]*>").unwrap_or_else(|e| panic!("markup pattern: {e}")));

/// Display text with optional markup tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
	pub fn new(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	/// Returns the text as authored, markup included.
	pub fn raw(&self) -> &str {
		&self.0
	}

	/// Returns the text with every markup tag removed.
	pub fn plain(&self) -> String {
		MARKUP_TAG.replace_all(&self.0, "").into_owned()
	}
}

impl fmt::Display for DisplayName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.plain())
	}
}

impl From<&str> for DisplayName {
	fn from(raw: &str) -> Self {
		Self::new(raw)
	}
}
