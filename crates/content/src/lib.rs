//! Built-in content kinds for the Fuze registry.
//!
//! | Kind | Group | Parent | Material |
//! |------|-------|--------|----------|
//! | `equipment` | - | `item` | - |
//! | `ammo` | `ammo` | `equipment` | iron nugget |
//! | `gun` | `guns` | `equipment` | crossbow |
//!
//! [`kinds`] lists them in dependency order; [`DEFAULT_CONFIG`] is a descriptor
//! document that exercises all of them.

pub mod ammo;
pub mod bullet;
pub mod equipment;
pub mod events;
pub mod gun;

pub use ammo::Ammo;
pub use events::{ItemRename, ItemUse, ProjectileHit, UseOutcome};
pub use gun::Gun;

use fuze_registry::{Config, ConfigError, KindTable, Runtime, Settings, parse_config_str};

/// Descriptor document shipped with the crate.
pub const DEFAULT_CONFIG: &str = include_str!("../assets/default.toml");

/// Built-in kinds: ammo before the guns that reference it.
pub fn kinds() -> KindTable {
	KindTable::new().with::<Ammo>("ammo").with::<Gun>("guns")
}

/// Creates an empty runtime for the built-in kinds.
pub fn runtime(settings: &Settings) -> Runtime {
	Runtime::new(kinds(), settings)
}

/// Parses [`DEFAULT_CONFIG`].
pub fn default_config() -> Result<Config, ConfigError> {
	parse_config_str(DEFAULT_CONFIG)
}
