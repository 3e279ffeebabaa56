//! Host carrier model.
//!
//! Carriers are the "physical" forms content instances take inside the host: item
//! stacks in inventories and entities in the world. The core never looks inside a
//! carrier beyond its display name and its [`AttributeContainer`].
//!
//! Three carrier shapes are supported by [`AttributeCarrier`]:
//!
//! | Shape | Type | Container access |
//! |-------|------|------------------|
//! | raw container | [`AttributeContainer`] | in place |
//! | holder | [`Entity`], [`ItemMeta`] | in place through [`AttributeHolder`] |
//! | item wrapper | [`ItemStack`] | copy-out, mutate, copy-in |

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attributes::NamespacedKey;
use crate::text::DisplayName;

/// Primitive wire value stored in an [`AttributeContainer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
	Byte(i8),
	Int(i32),
	Long(i64),
	Double(f64),
	String(String),
	Bytes(Vec<u8>),
}

impl AttributeValue {
	/// Returns the wire type name, for diagnostics.
	pub fn type_name(&self) -> &'static str {
		match self {
			AttributeValue::Byte(_) => "byte",
			AttributeValue::Int(_) => "int",
			AttributeValue::Long(_) => "long",
			AttributeValue::Double(_) => "double",
			AttributeValue::String(_) => "string",
			AttributeValue::Bytes(_) => "bytes",
		}
	}
}

/// Flat map from namespaced slot keys to primitive values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeContainer {
	entries: BTreeMap<String, AttributeValue>,
}

impl AttributeContainer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &NamespacedKey) -> Option<&AttributeValue> {
		self.entries.get(key.as_str())
	}

	pub fn contains(&self, key: &NamespacedKey) -> bool {
		self.entries.contains_key(key.as_str())
	}

	pub fn set(&mut self, key: &NamespacedKey, value: AttributeValue) {
		self.entries.insert(key.as_str().to_owned(), value);
	}

	pub fn remove(&mut self, key: &NamespacedKey) -> Option<AttributeValue> {
		self.entries.remove(key.as_str())
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
		self.entries.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// The host does not know the requested material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaterialError {
	#[error("{0:?} is not a material id")]
	InvalidId(String),
}

/// Host material identifier, e.g. `crossbow`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Material(Cow<'static, str>);

impl Material {
	pub const ARROW: Material = Material::from_static("arrow");
	pub const CROSSBOW: Material = Material::from_static("crossbow");
	pub const IRON_NUGGET: Material = Material::from_static("iron_nugget");

	pub const fn from_static(id: &'static str) -> Self {
		Self(Cow::Borrowed(id))
	}

	pub fn new(id: impl Into<String>) -> Self {
		Self(Cow::Owned(id.into()))
	}

	/// Parses a host material id. Ids are non-empty `[a-z0-9_]`.
	pub fn parse(id: &str) -> Result<Self, MaterialError> {
		let valid = !id.is_empty() && id.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
		if !valid {
			return Err(MaterialError::InvalidId(id.to_owned()));
		}
		Ok(Self::new(id))
	}

	pub fn id(&self) -> &str {
		&self.0
	}
}

/// Anything that owns an [`AttributeContainer`] directly.
pub trait AttributeHolder {
	fn attributes(&self) -> &AttributeContainer;
	fn attributes_mut(&mut self) -> &mut AttributeContainer;
}

/// Item metadata: display name plus attribute container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	display_name: Option<DisplayName>,
	#[serde(default, skip_serializing_if = "AttributeContainer::is_empty")]
	attributes: AttributeContainer,
}

impl ItemMeta {
	pub fn display_name(&self) -> Option<&DisplayName> {
		self.display_name.as_ref()
	}

	pub fn set_display_name(&mut self, name: Option<DisplayName>) {
		self.display_name = name;
	}
}

impl AttributeHolder for ItemMeta {
	fn attributes(&self) -> &AttributeContainer {
		&self.attributes
	}

	fn attributes_mut(&mut self) -> &mut AttributeContainer {
		&mut self.attributes
	}
}

/// A stack of items in an inventory.
///
/// The stack hands out copies of its [`ItemMeta`]; mutations only become visible
/// after the copy is written back with [`ItemStack::set_meta`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
	material: Material,
	amount: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	meta: Option<ItemMeta>,
}

impl ItemStack {
	/// Largest amount a single stack holds.
	pub const MAX_STACK: u32 = 64;

	pub fn new(material: Material) -> Self {
		Self {
			material,
			amount: 1,
			meta: None,
		}
	}

	pub fn with_amount(mut self, amount: u32) -> Self {
		self.amount = amount;
		self
	}

	pub fn material(&self) -> &Material {
		&self.material
	}

	pub fn amount(&self) -> u32 {
		self.amount
	}

	pub fn set_amount(&mut self, amount: u32) {
		self.amount = amount;
	}

	/// Returns a copy of the stack's meta, if it has any.
	pub fn meta(&self) -> Option<ItemMeta> {
		self.meta.clone()
	}

	/// Returns a copy of the stack's meta, or a fresh one for its material.
	pub fn meta_or_default(&self) -> ItemMeta {
		self.meta.clone().unwrap_or_default()
	}

	/// Replaces the stack's meta.
	pub fn set_meta(&mut self, meta: ItemMeta) {
		self.meta = Some(meta);
	}

	pub fn has_meta(&self) -> bool {
		self.meta.is_some()
	}

	pub fn display_name(&self) -> Option<DisplayName> {
		self.meta.as_ref()?.display_name().cloned()
	}

	pub fn set_display_name(&mut self, name: Option<DisplayName>) {
		let mut meta = self.meta_or_default();
		meta.set_display_name(name);
		self.set_meta(meta);
	}

	/// Returns an independent copy of this stack.
	pub fn duplicate(&self) -> Self {
		self.clone()
	}

	/// Returns true if both stacks would merge: same material and same meta.
	pub fn is_similar(&self, other: &ItemStack) -> bool {
		self.material == other.material && self.meta == other.meta
	}
}

/// An in-world entity, e.g. a projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
	kind: Material,
	velocity: f64,
	#[serde(default, skip_serializing_if = "AttributeContainer::is_empty")]
	attributes: AttributeContainer,
}

impl Entity {
	pub fn new(kind: Material) -> Self {
		Self {
			kind,
			velocity: 0.0,
			attributes: AttributeContainer::new(),
		}
	}

	pub fn kind(&self) -> &Material {
		&self.kind
	}

	pub fn velocity(&self) -> f64 {
		self.velocity
	}

	pub fn set_velocity(&mut self, velocity: f64) {
		self.velocity = velocity;
	}
}

impl AttributeHolder for Entity {
	fn attributes(&self) -> &AttributeContainer {
		&self.attributes
	}

	fn attributes_mut(&mut self) -> &mut AttributeContainer {
		&mut self.attributes
	}
}

/// Uniform container access over every carrier shape.
pub trait AttributeCarrier {
	/// Runs `f` against the carrier's container, or returns `None` if it has none.
	fn read_container<R>(&self, f: impl FnOnce(&AttributeContainer) -> R) -> Option<R>;

	/// Runs `f` against the carrier's container, creating an empty one if needed.
	fn write_container(&mut self, f: impl FnOnce(&mut AttributeContainer));
}

impl AttributeCarrier for AttributeContainer {
	fn read_container<R>(&self, f: impl FnOnce(&AttributeContainer) -> R) -> Option<R> {
		Some(f(self))
	}

	fn write_container(&mut self, f: impl FnOnce(&mut AttributeContainer)) {
		f(self);
	}
}

impl AttributeCarrier for Entity {
	fn read_container<R>(&self, f: impl FnOnce(&AttributeContainer) -> R) -> Option<R> {
		Some(f(self.attributes()))
	}

	fn write_container(&mut self, f: impl FnOnce(&mut AttributeContainer)) {
		f(self.attributes_mut());
	}
}

impl AttributeCarrier for ItemMeta {
	fn read_container<R>(&self, f: impl FnOnce(&AttributeContainer) -> R) -> Option<R> {
		Some(f(self.attributes()))
	}

	fn write_container(&mut self, f: impl FnOnce(&mut AttributeContainer)) {
		f(self.attributes_mut());
	}
}

impl AttributeCarrier for ItemStack {
	fn read_container<R>(&self, f: impl FnOnce(&AttributeContainer) -> R) -> Option<R> {
		self.meta.as_ref().map(|meta| f(meta.attributes()))
	}

	fn write_container(&mut self, f: impl FnOnce(&mut AttributeContainer)) {
		let mut meta = self.meta_or_default();
		f(meta.attributes_mut());
		self.set_meta(meta);
	}
}
