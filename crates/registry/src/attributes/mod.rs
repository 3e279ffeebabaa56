//! Typed attribute slots.
//!
//! An [`AttributeSlot`] is a globally unique, strongly typed accessor that stamps a
//! logical value `V` onto any [`AttributeCarrier`]. On the carrier the value lives
//! as a primitive `K` (see [`PrimitiveType`]) under the slot's [`NamespacedKey`];
//! the slot's [`SlotCodec`] converts between the two so callers never see `K`.
//!
//! # Invariants
//!
//! - Claimed keys are unique across the process. Claiming a `namespace:name`
//!   pair that any [`SlotNamespace`] already holds fails with
//!   [`SlotError::DuplicateSlotName`]. Outside this crate the only namespace is
//!   [`SlotNamespace::global`].
//! - `read(write(carrier, v)) == Some(v)` for every codec whose decode inverts
//!   its encode.
//! - Writes to an [`ItemStack`](crate::carrier::ItemStack) go through a copied
//!   meta that is written back; see [`crate::carrier`].

pub mod codec;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::LazyLock;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

pub use self::codec::{PrimitiveType, SlotCodec};
use crate::carrier::AttributeCarrier;
use crate::error::SlotError;
use crate::keyable::is_valid_key;

/// Namespace of the process-wide slot table.
pub const DEFAULT_NAMESPACE: &str = "fuze";

static GLOBAL: LazyLock<SlotNamespace> = LazyLock::new(|| SlotNamespace::new(DEFAULT_NAMESPACE));

/// Every key claimed by any namespace in this process.
static CLAIMED: LazyLock<Mutex<FxHashSet<Box<str>>>> = LazyLock::new(Mutex::default);

/// A `namespace:key` pair identifying a value inside an attribute container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespacedKey {
	full: Box<str>,
	split: usize,
}

impl NamespacedKey {
	pub fn new(namespace: &str, key: &str) -> Self {
		Self {
			full: format!("{namespace}:{key}").into_boxed_str(),
			split: namespace.len(),
		}
	}

	pub fn namespace(&self) -> &str {
		&self.full[..self.split]
	}

	pub fn key(&self) -> &str {
		&self.full[self.split + 1..]
	}

	pub fn as_str(&self) -> &str {
		&self.full
	}
}

impl fmt::Display for NamespacedKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.full)
	}
}

/// Names one namespace has claimed in the process-wide key table.
pub struct SlotNamespace {
	namespace: Box<str>,
	names: Mutex<FxHashSet<Box<str>>>,
}

impl SlotNamespace {
	pub(crate) fn new(namespace: &str) -> Self {
		Self {
			namespace: namespace.into(),
			names: Mutex::new(FxHashSet::default()),
		}
	}

	/// Returns the process-wide namespace backing `static` slots.
	pub fn global() -> &'static SlotNamespace {
		&GLOBAL
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Claims `name`, returning the key the slot will be stored under.
	pub fn claim(&self, name: &str) -> Result<NamespacedKey, SlotError> {
		if !is_valid_key(name) {
			return Err(SlotError::InvalidSlotName(name.to_owned()));
		}
		let key = NamespacedKey::new(&self.namespace, name);
		if !CLAIMED.lock().insert(key.as_str().into()) {
			return Err(SlotError::DuplicateSlotName(name.to_owned()));
		}
		self.names.lock().insert(name.into());
		Ok(key)
	}

	pub fn is_declared(&self, name: &str) -> bool {
		self.names.lock().contains(name)
	}

	/// Returns every claimed name, sorted.
	pub fn declared(&self) -> Vec<String> {
		let mut names: Vec<String> = self.names.lock().iter().map(|n| n.to_string()).collect();
		names.sort_unstable();
		names
	}
}

impl fmt::Debug for SlotNamespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SlotNamespace")
			.field("namespace", &self.namespace)
			.field("declared", &self.names.lock().len())
			.finish()
	}
}

/// Strongly typed read/write accessor for one named value on a carrier.
pub struct AttributeSlot<K, V> {
	key: NamespacedKey,
	codec: SlotCodec<K, V>,
}

impl<K: PrimitiveType, V> AttributeSlot<K, V> {
	/// Declares a slot in `namespace`.
	pub fn new(namespace: &SlotNamespace, name: &str, codec: SlotCodec<K, V>) -> Result<Self, SlotError> {
		let key = namespace.claim(name)?;
		Ok(Self { key, codec })
	}

	/// Declares a slot in the process-wide namespace.
	pub fn declare(name: &str, codec: SlotCodec<K, V>) -> Result<Self, SlotError> {
		Self::new(SlotNamespace::global(), name, codec)
	}

	/// Declares a process-wide slot for a `static` initializer.
	///
	/// # Panics
	///
	/// Panics if the name is invalid or already declared. Static slot names are
	/// fixed at compile time, so a clash is a programming error.
	pub fn declare_static(name: &str, codec: SlotCodec<K, V>) -> Self {
		Self::declare(name, codec).unwrap_or_else(|e| panic!("static attribute slot: {e}"))
	}

	pub fn name(&self) -> &str {
		self.key.key()
	}

	pub fn namespaced_key(&self) -> &NamespacedKey {
		&self.key
	}

	/// Returns true if the carrier holds a value of this slot's primitive type.
	pub fn has<C: AttributeCarrier>(&self, carrier: &C) -> bool {
		carrier
			.read_container(|c| c.get(&self.key).is_some_and(|v| K::from_value(v).is_some()))
			.unwrap_or(false)
	}

	/// Reads and decodes the value, or `None` if it was never written.
	pub fn read<C: AttributeCarrier>(&self, carrier: &C) -> Option<V> {
		let primitive = carrier.read_container(|c| c.get(&self.key).and_then(K::from_value)).flatten()?;
		self.codec.decode(primitive)
	}

	/// Encodes and stores `value`, replacing any previous value.
	pub fn write<C: AttributeCarrier>(&self, carrier: &mut C, value: V) {
		let primitive = self.codec.encode(value).into_value();
		carrier.write_container(|c| c.set(&self.key, primitive));
	}

	/// Removes the value. Returns true if one was present.
	pub fn remove<C: AttributeCarrier>(&self, carrier: &mut C) -> bool {
		if carrier.read_container(|c| c.contains(&self.key)) != Some(true) {
			return false;
		}
		carrier.write_container(|c| {
			c.remove(&self.key);
		});
		true
	}
}

impl<K: PrimitiveType, V> fmt::Debug for AttributeSlot<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AttributeSlot")
			.field("key", &self.key.as_str())
			.field("primitive", &K::TYPE_NAME)
			.finish()
	}
}
