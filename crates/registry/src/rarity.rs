//! Rarity table.
//!
//! Every content instance names a rarity; the table is built first on each
//! reload so instance construction can resolve it.

use std::collections::BTreeSet;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::descriptor::{DescriptorGroup, NodeReader};
use crate::error::{RegistryError, Result};
use crate::keyable::{Keyable, is_valid_key};
use crate::text::DisplayName;

/// Type tag reported by every rarity.
pub const RARITY_KIND: &str = "rarity";

/// A named rarity tier with a relative drop chance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rarity {
	key: String,
	name: DisplayName,
	chance: u32,
}

impl Rarity {
	/// Creates a rarity. `chance` must be positive.
	pub fn new(key: impl Into<String>, name: impl Into<DisplayName>, chance: u32) -> Result<Self> {
		let key = key.into();
		if !is_valid_key(&key) {
			return Err(RegistryError::InvalidKey {
				kind: RARITY_KIND.into(),
				key,
			});
		}
		if chance == 0 {
			return Err(RegistryError::InvalidField {
				path: "chance".into(),
				kind: RARITY_KIND.into(),
				key,
				reason: "chance must be positive".into(),
			});
		}
		Ok(Self {
			key,
			name: name.into(),
			chance,
		})
	}

	fn from_node(reader: &NodeReader<'_>) -> Result<Self> {
		if !is_valid_key(reader.key()) {
			return Err(RegistryError::InvalidKey {
				kind: RARITY_KIND.into(),
				key: reader.key().into(),
			});
		}
		let name = reader.require_str("name")?;
		let chance = reader.require_u32("chance")?;
		Self::new(reader.key(), DisplayName::new(name), chance)
	}

	pub fn chance(&self) -> u32 {
		self.chance
	}
}

impl Keyable for Rarity {
	fn key(&self) -> &str {
		&self.key
	}

	fn kind(&self) -> &str {
		RARITY_KIND
	}

	fn name(&self) -> &DisplayName {
		&self.name
	}
}

/// Rarities of one generation, keyed by rarity key.
#[derive(Debug, Clone, Default)]
pub struct RarityTable {
	rarities: FxHashMap<String, Arc<Rarity>>,
}

impl RarityTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds the table from a descriptor group. Duplicate keys are rejected.
	pub fn from_group(group: &DescriptorGroup) -> Result<Self> {
		let mut table = Self::new();
		for node in &group.nodes {
			let rarity = Rarity::from_node(&NodeReader::new(node, RARITY_KIND))?;
			debug!(key = %rarity.key, chance = rarity.chance, "Rarity built");
			table.insert(rarity, &group.name)?;
		}
		Ok(table)
	}

	/// Adds a rarity, failing if its key is taken.
	pub fn insert(&mut self, rarity: Rarity, group: &str) -> Result<()> {
		if self.rarities.contains_key(&rarity.key) {
			return Err(RegistryError::DuplicateKey {
				kind: RARITY_KIND.into(),
				key: rarity.key,
				group: group.into(),
			});
		}
		self.rarities.insert(rarity.key.clone(), Arc::new(rarity));
		Ok(())
	}

	pub fn lookup(&self, key: &str) -> Option<Arc<Rarity>> {
		self.rarities.get(key).cloned()
	}

	/// Resolves the rarity named by instance `key` of `kind`.
	pub fn resolve(&self, rarity: &str, kind: &str, key: &str) -> Result<Arc<Rarity>> {
		self.lookup(rarity).ok_or_else(|| RegistryError::UnknownRarity {
			rarity: rarity.into(),
			kind: kind.into(),
			key: key.into(),
		})
	}

	pub fn keys(&self) -> BTreeSet<String> {
		self.rarities.keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.rarities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rarities.is_empty()
	}
}
