//! Host events the built-in kinds subscribe to.

use fuze_registry::{DisplayName, Entity, Event, Inventory, ItemStack};

/// A player used (right-clicked) the stack they are holding.
///
/// The host owns `held` and `inventory` for the duration of the dispatch and
/// writes both back afterwards.
#[derive(Debug, Clone)]
pub struct ItemUse {
	pub held: ItemStack,
	pub inventory: Inventory,
	/// Host clock, in milliseconds.
	pub now_ms: u64,
	/// Set to suppress the host's default behavior for the held material.
	pub cancelled: bool,
	pub outcome: Option<UseOutcome>,
	/// Entities the host should spawn.
	pub spawned: Vec<Entity>,
}

impl ItemUse {
	pub fn new(held: ItemStack, inventory: Inventory, now_ms: u64) -> Self {
		Self {
			held,
			inventory,
			now_ms,
			cancelled: false,
			outcome: None,
			spawned: Vec::new(),
		}
	}
}

impl Event for ItemUse {}

/// What a gun did when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
	Fired,
	CoolingDown { remaining_ms: u64 },
	OutOfAmmo,
}

/// A projectile hit a living target.
#[derive(Debug, Clone)]
pub struct ProjectileHit {
	pub projectile: Entity,
	pub target_health: f64,
	/// Damage applied by a handler, if any.
	pub damage_dealt: Option<f64>,
}

impl ProjectileHit {
	pub fn new(projectile: Entity, target_health: f64) -> Self {
		Self {
			projectile,
			target_health,
			damage_dealt: None,
		}
	}
}

impl Event for ProjectileHit {}

/// A player tries to rename a stack, e.g. in an anvil.
#[derive(Debug, Clone)]
pub struct ItemRename {
	pub item: ItemStack,
	pub new_name: DisplayName,
	pub cancelled: bool,
}

impl ItemRename {
	pub fn new(item: ItemStack, new_name: impl Into<DisplayName>) -> Self {
		Self {
			item,
			new_name: new_name.into(),
			cancelled: false,
		}
	}
}

impl Event for ItemRename {}
