//! Construction-time error taxonomy.
//!
//! Every error raised while building a registry is fatal to the registration
//! call that triggered it. Lookup misses are not errors; they surface as `None`.

/// Result alias for registry construction.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

/// Fatal errors raised while building or publishing registries.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	/// A descriptor child key does not match `^[a-z0-9_.-]+$`.
	#[error("invalid {kind} key {key:?}: keys may only contain [a-z0-9_.-]")]
	InvalidKey { kind: String, key: String },

	/// A required descriptor field is absent or has the wrong shape.
	#[error("missing field {path:?} in {kind} {key:?}")]
	MissingField { path: String, kind: String, key: String },

	/// A descriptor field is present but its value is rejected by the kind.
	#[error("invalid field {path:?} in {kind} {key:?}: {reason}")]
	InvalidField {
		path: String,
		kind: String,
		key: String,
		reason: String,
	},

	/// A `rarity` field names a rarity that is not in the rarity table.
	#[error("unknown rarity {rarity:?} in {kind} {key:?}")]
	UnknownRarity { rarity: String, kind: String, key: String },

	/// A field references another content instance that is not registered.
	#[error("unknown {target} {reference:?} referenced by {kind} {key:?}")]
	UnknownReference {
		target: String,
		reference: String,
		kind: String,
		key: String,
	},

	/// The named descriptor group does not exist.
	#[error("descriptor group {0:?} not found")]
	MissingDescriptorGroup(String),

	/// A second registry reported a type tag that is already published.
	#[error("item type {0:?} is already registered")]
	DuplicateType(String),

	/// Instances of one registry disagree on their type tag.
	#[error("{group:?} instances are not of the same type: expected {expected:?}, {key:?} reports {found:?}")]
	TypeMismatch {
		group: String,
		expected: String,
		found: String,
		key: String,
	},

	/// Two descriptors in one group share a key.
	#[error("duplicate {kind} key {key:?} in group {group:?}")]
	DuplicateKey { kind: String, key: String, group: String },

	/// A kind's parent chain loops back on itself.
	#[error("kind chain of {0:?} is cyclic")]
	CyclicKindChain(String),

	/// The concrete kind's build step failed for a reason not covered above.
	#[error("unable to construct {kind} {key:?}: {source}")]
	ConstructionFailure {
		kind: String,
		key: String,
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
}

impl RegistryError {
	/// Creates a missing-field error for the descriptor at `path`.
	pub fn missing_field(path: impl Into<String>, kind: impl Into<String>, key: impl Into<String>) -> Self {
		Self::MissingField {
			path: path.into(),
			kind: kind.into(),
			key: key.into(),
		}
	}

	/// Wraps an arbitrary build failure of `kind` instance `key`.
	pub fn construction(
		kind: impl Into<String>,
		key: impl Into<String>,
		source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
	) -> Self {
		Self::ConstructionFailure {
			kind: kind.into(),
			key: key.into(),
			source: source.into(),
		}
	}
}

/// Attribute slot declaration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
	/// The slot key was already claimed somewhere in this process.
	#[error("attribute slot {0:?} is already declared")]
	DuplicateSlotName(String),

	/// The slot name contains characters outside `[a-z0-9_.-]`.
	#[error("invalid attribute slot name {0:?}")]
	InvalidSlotName(String),
}
