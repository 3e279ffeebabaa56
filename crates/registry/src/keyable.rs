use std::sync::LazyLock;

use regex::Regex;

use crate::text::DisplayName;

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9_.-]+$").unwrap_or_else(|e| panic!("key pattern: {e}")));

/// An object with a stable unique key, a group tag and a display name.
///
/// Typical tags are `"gun"`, `"ammo"` or `"rarity"`: a group of objects sharing a
/// schema, neither too generic (`"item"`) nor too specific (`"smoke_grenade"`).
pub trait Keyable {
	/// Returns the unique key. Assigned once at construction, never mutated.
	fn key(&self) -> &str;

	/// Returns the type tag of the group this object belongs to.
	fn kind(&self) -> &str;

	/// Returns the display name. Does not have to be unique.
	fn name(&self) -> &DisplayName;
}

/// Returns true if `key` only contains `[a-z0-9_.-]` and is not empty.
pub fn is_valid_key(key: &str) -> bool {
	KEY_PATTERN.is_match(key)
}
