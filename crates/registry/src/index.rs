//! Typed registries and the manager that publishes them under type tags.
//!
//! [`ItemRegistry<T>`] holds every instance of one concrete kind, keyed by
//! instance key. [`ItemManager`] owns one registry per kind, indexed both by
//! Rust type and by the registry's type tag.
//!
//! # Invariants
//!
//! - All instances of one registry report the same type tag.
//! - Keys are unique within a registry; a repeated key is rejected.
//! - A type tag maps to exactly one registry.
//! - A registry is published only once every descriptor of its group built and
//!   every instance's handler chain was registered.

use std::any::{Any, TypeId};
use std::collections::BTreeSet;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::carrier::ItemStack;
use crate::descriptor::{DescriptorGroup, DescriptorSource, NodeReader};
use crate::error::{RegistryError, Result};
use crate::events::EventManager;
use crate::item::{ITEM_KEY, ITEM_TYPE, Item, ItemBase, ItemKind};
use crate::keyable::Keyable;
use crate::rarity::RarityTable;

/// What a kind's `build` step may consult.
pub struct BuildContext<'a> {
	pub rarities: &'a RarityTable,
	/// Registries published earlier in the same pass.
	pub items: &'a ItemManager,
}

impl BuildContext<'_> {
	/// Reads the required reference field `path` and resolves it to a published instance.
	pub fn reference<T: ItemKind>(&self, node: &NodeReader<'_>, path: &str) -> Result<Arc<T>> {
		let reference = node.require_str(path)?;
		self.resolve(reference, node.kind(), node.key())
	}

	/// Resolves `reference` among the published instances of `T`.
	pub fn resolve<T: ItemKind>(&self, reference: &str, kind: &str, key: &str) -> Result<Arc<T>> {
		self.items.lookup::<T>(reference).ok_or_else(|| RegistryError::UnknownReference {
			target: T::KIND.tag.into(),
			reference: reference.into(),
			kind: kind.into(),
			key: key.into(),
		})
	}
}

/// All instances of one concrete kind.
pub struct ItemRegistry<T> {
	group: String,
	items: FxHashMap<String, Arc<T>>,
	/// Instances in insertion order.
	order: Vec<Arc<T>>,
	item_type: Option<String>,
}

impl<T: ItemKind> ItemRegistry<T> {
	pub fn new(group: impl Into<String>) -> Self {
		Self {
			group: group.into(),
			items: FxHashMap::default(),
			order: Vec::new(),
			item_type: None,
		}
	}

	/// Builds one instance per child of `group`, failing on the first error.
	pub fn build(group: &DescriptorGroup, ctx: &BuildContext<'_>) -> Result<Self> {
		let mut registry = Self::new(&group.name);
		for node in &group.nodes {
			let reader = NodeReader::new(node, T::KIND.tag);
			let base = ItemBase::from_descriptor::<T>(&reader, ctx.rarities)?;
			let item = T::build(base, &reader, ctx)?;
			debug!(kind = T::KIND.tag, key = item.key(), "Instance built");
			registry.insert(item)?;
		}
		Ok(registry)
	}

	/// Inserts an instance, enforcing type consistency and key uniqueness.
	pub fn insert(&mut self, item: T) -> Result<Arc<T>> {
		let found = item.kind();
		match &self.item_type {
			Some(expected) if expected != found => {
				return Err(RegistryError::TypeMismatch {
					group: self.group.clone(),
					expected: expected.clone(),
					found: found.to_owned(),
					key: item.key().to_owned(),
				});
			}
			Some(_) => {}
			None => self.item_type = Some(found.to_owned()),
		}
		if self.items.contains_key(item.key()) {
			return Err(RegistryError::DuplicateKey {
				kind: found.to_owned(),
				key: item.key().to_owned(),
				group: self.group.clone(),
			});
		}
		let item = Arc::new(item);
		self.items.insert(item.key().to_owned(), Arc::clone(&item));
		self.order.push(Arc::clone(&item));
		Ok(item)
	}

	/// Type tag of the registry. An empty registry reports its kind's tag.
	pub fn item_type(&self) -> &str {
		self.item_type.as_deref().unwrap_or(T::KIND.tag)
	}

	pub fn group(&self) -> &str {
		&self.group
	}

	pub fn get(&self, key: &str) -> Option<Arc<T>> {
		self.items.get(key).cloned()
	}

	pub fn contains(&self, key: &str) -> bool {
		self.items.contains_key(key)
	}

	pub fn keys(&self) -> BTreeSet<String> {
		self.items.keys().cloned().collect()
	}

	/// Returns every instance, ordered by key.
	pub fn items(&self) -> Vec<Arc<T>> {
		let mut items: Vec<_> = self.items.values().cloned().collect();
		items.sort_by(|a, b| a.key().cmp(b.key()));
		items
	}

	/// Returns every instance in the order it was inserted, which for a built
	/// registry is descriptor order.
	pub fn in_insertion_order(&self) -> &[Arc<T>] {
		&self.order
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

/// Type-erased registry access for tag-based lookups.
trait ErasedRegistry: Any + Send + Sync {
	fn get_dyn(&self, key: &str) -> Option<Arc<dyn Item>>;
	fn keys(&self) -> BTreeSet<String>;
	fn items_dyn(&self) -> Vec<Arc<dyn Item>>;
}

impl<T: ItemKind> ErasedRegistry for ItemRegistry<T> {
	fn get_dyn(&self, key: &str) -> Option<Arc<dyn Item>> {
		self.get(key).map(|item| item as Arc<dyn Item>)
	}

	fn keys(&self) -> BTreeSet<String> {
		ItemRegistry::keys(self)
	}

	fn items_dyn(&self) -> Vec<Arc<dyn Item>> {
		self.items().into_iter().map(|item| item as Arc<dyn Item>).collect()
	}
}

/// Every published registry of one generation.
#[derive(Default)]
pub struct ItemManager {
	registries: FxHashMap<TypeId, Box<dyn ErasedRegistry>>,
	types: FxHashMap<String, TypeId>,
}

impl ItemManager {
	pub fn new() -> Self {
		Self::default()
	}

	/// Drops every registry and type tag.
	pub fn reset(&mut self) {
		let types = self.types.len();
		self.registries.clear();
		self.types.clear();
		info!(types, "Item manager reset");
	}

	/// Builds the registry of `T` from `group` and publishes it under its type tag.
	///
	/// Every instance gets its handler chain registered with `events` before the
	/// registry is published, in descriptor order: a kind not yet subscribed
	/// binds its handlers to the first instance built from `group`. On error
	/// nothing is published.
	pub fn register_type<T: ItemKind>(
		&mut self,
		group: &str,
		source: &DescriptorSource,
		rarities: &RarityTable,
		events: &EventManager,
	) -> Result<String> {
		let descriptors = source
			.group(group)
			.ok_or_else(|| RegistryError::MissingDescriptorGroup(group.to_owned()))?;

		let registry = ItemRegistry::<T>::build(descriptors, &BuildContext { rarities, items: self })?;

		let tag = registry.item_type().to_owned();
		if self.types.contains_key(&tag) || self.registries.contains_key(&TypeId::of::<T>()) {
			return Err(RegistryError::DuplicateType(tag));
		}

		let instances = registry.in_insertion_order();
		for instance in instances {
			instance.kind_def().chain()?;
		}
		let mut subscribed = 0;
		for instance in instances {
			subscribed += events.register_handler_chain(Arc::clone(instance) as Arc<dyn Item>, false)?;
		}

		info!(
			item_type = %tag,
			group,
			instances = registry.len(),
			kinds_subscribed = subscribed,
			"Item type registered"
		);
		self.types.insert(tag.clone(), TypeId::of::<T>());
		self.registries.insert(TypeId::of::<T>(), Box::new(registry));
		Ok(tag)
	}

	/// Returns the typed registry of `T`, if published.
	pub fn registry<T: ItemKind>(&self) -> Option<&ItemRegistry<T>> {
		let erased: &dyn ErasedRegistry = &**self.registries.get(&TypeId::of::<T>())?;
		let any: &dyn Any = erased;
		any.downcast_ref::<ItemRegistry<T>>()
	}

	pub fn lookup<T: ItemKind>(&self, key: &str) -> Option<Arc<T>> {
		self.registry::<T>()?.get(key)
	}

	pub fn contains<T: ItemKind>(&self, key: &str) -> bool {
		self.registry::<T>().is_some_and(|r| r.contains(key))
	}

	/// Resolves the registry from `item_type` first, then the key.
	pub fn lookup_by_type(&self, key: &str, item_type: &str) -> Option<Arc<dyn Item>> {
		self.erased(item_type)?.get_dyn(key)
	}

	pub fn all_keys<T: ItemKind>(&self) -> BTreeSet<String> {
		self.registry::<T>().map(ItemRegistry::keys).unwrap_or_default()
	}

	pub fn all_instances<T: ItemKind>(&self) -> Vec<Arc<T>> {
		self.registry::<T>().map(ItemRegistry::items).unwrap_or_default()
	}

	pub fn all_type_tags(&self) -> BTreeSet<String> {
		self.types.keys().cloned().collect()
	}

	/// Keys of the registry published under `item_type`, or `None` if there is none.
	pub fn keys_by_type(&self, item_type: &str) -> Option<BTreeSet<String>> {
		Some(self.erased(item_type)?.keys())
	}

	pub fn instances_by_type(&self, item_type: &str) -> Option<Vec<Arc<dyn Item>>> {
		Some(self.erased(item_type)?.items_dyn())
	}

	/// Resolves the instance a carrier was stamped by, if it is a `T`.
	pub fn resolve_carrier<T: ItemKind>(&self, carrier: &ItemStack) -> Option<Arc<T>> {
		let registry = self.registry::<T>()?;
		if ITEM_TYPE.read(carrier)? != registry.item_type() {
			return None;
		}
		registry.get(&ITEM_KEY.read(carrier)?)
	}

	/// Resolves the instance a carrier was stamped by, of any kind.
	pub fn resolve_carrier_dyn(&self, carrier: &ItemStack) -> Option<Arc<dyn Item>> {
		let item_type = ITEM_TYPE.read(carrier)?;
		self.lookup_by_type(&ITEM_KEY.read(carrier)?, &item_type)
	}

	pub fn type_count(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	fn erased(&self, item_type: &str) -> Option<&dyn ErasedRegistry> {
		let id = self.types.get(item_type)?;
		self.registries.get(id).map(|registry| &**registry)
	}
}
