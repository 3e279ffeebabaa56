//! Runtime context: the owned replacement for process-wide registries.
//!
//! A [`Runtime`] holds the currently published [`Generation`]. Reloading builds a
//! complete new generation off to the side and swaps it in only on success, so
//! readers always see either the old or the new data, never a mix.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Settings;
use crate::descriptor::DescriptorSource;
use crate::error::{RegistryError, Result};
use crate::events::{DispatchError, Event, EventManager};
use crate::index::ItemManager;
use crate::item::{ItemKind, KindDef};
use crate::rarity::RarityTable;

/// Everything one reload produced.
#[derive(Default)]
pub struct Generation {
	number: u64,
	rarities: RarityTable,
	items: ItemManager,
	events: EventManager,
}

impl Generation {
	/// Generation 0: nothing loaded yet.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn number(&self) -> u64 {
		self.number
	}

	pub fn rarities(&self) -> &RarityTable {
		&self.rarities
	}

	pub fn items(&self) -> &ItemManager {
		&self.items
	}

	pub fn events(&self) -> &EventManager {
		&self.events
	}

	pub fn dispatch<E: Event>(&self, event: &mut E) -> std::result::Result<usize, DispatchError> {
		self.events.dispatch(event, &self.items)
	}
}

type RegisterFn = fn(&mut ItemManager, &str, &DescriptorSource, &RarityTable, &EventManager) -> Result<String>;

/// One entry of the kind table: which kind is built from which group.
#[derive(Clone)]
pub struct KindRegistration {
	pub kind: &'static KindDef,
	pub group: String,
	register: RegisterFn,
}

impl KindRegistration {
	pub fn of<T: ItemKind>(group: impl Into<String>) -> Self {
		Self {
			kind: T::KIND,
			group: group.into(),
			register: ItemManager::register_type::<T>,
		}
	}
}

/// Kinds in registration order. A kind must come after every kind it references.
#[derive(Clone, Default)]
pub struct KindTable {
	kinds: Vec<KindRegistration>,
}

impl KindTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with<T: ItemKind>(mut self, group: impl Into<String>) -> Self {
		self.kinds.push(KindRegistration::of::<T>(group));
		self
	}

	pub fn iter(&self) -> impl Iterator<Item = &KindRegistration> + '_ {
		self.kinds.iter()
	}

	pub fn len(&self) -> usize {
		self.kinds.len()
	}

	pub fn is_empty(&self) -> bool {
		self.kinds.is_empty()
	}
}

/// What a successful reload published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadSummary {
	pub generation: u64,
	pub rarities: usize,
	pub types: Vec<TypeSummary>,
	pub subscriptions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
	pub item_type: String,
	pub group: String,
	pub instances: usize,
}

/// Owned registry context with atomic generation swaps.
pub struct Runtime {
	kinds: KindTable,
	rarity_group: String,
	current: ArcSwap<Generation>,
	reload_lock: Mutex<()>,
}

impl Runtime {
	pub fn new(kinds: KindTable, settings: &Settings) -> Self {
		Self {
			kinds,
			rarity_group: settings.rarity_group.clone(),
			current: ArcSwap::from_pointee(Generation::empty()),
			reload_lock: Mutex::new(()),
		}
	}

	/// Rebuilds every registry from `source` and publishes the result.
	///
	/// On failure the previous generation stays published.
	pub fn reload(&self, source: &DescriptorSource) -> Result<ReloadSummary> {
		let _guard = self.reload_lock.lock();
		let number = self.current.load().number + 1;

		let (generation, summary) = match self.build(number, source) {
			Ok(built) => built,
			Err(error) => {
				warn!(
					generation = number,
					kept = number - 1,
					%error,
					"Reload failed; keeping previous generation"
				);
				return Err(error);
			}
		};

		self.current.store(Arc::new(generation));
		info!(
			generation = number,
			types = summary.types.len(),
			subscriptions = summary.subscriptions,
			"Generation published"
		);
		Ok(summary)
	}

	fn build(&self, number: u64, source: &DescriptorSource) -> Result<(Generation, ReloadSummary)> {
		let rarity_group = source
			.group(&self.rarity_group)
			.ok_or_else(|| RegistryError::MissingDescriptorGroup(self.rarity_group.clone()))?;
		let rarities = RarityTable::from_group(rarity_group)?;

		let mut items = ItemManager::new();
		let events = EventManager::new();
		let mut types = Vec::with_capacity(self.kinds.len());
		for kind in self.kinds.iter() {
			let item_type = (kind.register)(&mut items, &kind.group, source, &rarities, &events)?;
			let instances = items.keys_by_type(&item_type).map_or(0, |keys| keys.len());
			types.push(TypeSummary {
				item_type,
				group: kind.group.clone(),
				instances,
			});
		}

		let summary = ReloadSummary {
			generation: number,
			rarities: rarities.len(),
			types,
			subscriptions: events.subscription_count(),
		};
		let generation = Generation {
			number,
			rarities,
			items,
			events,
		};
		Ok((generation, summary))
	}

	/// Returns the published generation. Holding it keeps it alive across reloads.
	pub fn generation(&self) -> Arc<Generation> {
		self.current.load_full()
	}

	pub fn kinds(&self) -> &KindTable {
		&self.kinds
	}

	pub fn lookup<T: ItemKind>(&self, key: &str) -> Option<Arc<T>> {
		self.current.load().items.lookup::<T>(key)
	}

	/// Delivers a host event against the published generation.
	pub fn dispatch<E: Event>(&self, event: &mut E) -> std::result::Result<usize, DispatchError> {
		self.generation().dispatch(event)
	}
}
