//! Bullets: arrow entities stamped with the gun that fired them.

use std::sync::{Arc, LazyLock};

use fuze_registry::attributes::codec;
use fuze_registry::{AttributeSlot, Entity, ItemManager, Keyable, Material};

use crate::gun::Gun;

/// Key of the gun that fired the projectile.
pub static BULLET_GUN_KEY: LazyLock<AttributeSlot<String, String>> =
	LazyLock::new(|| AttributeSlot::declare_static("bullet_gun_key", codec::STRING));

/// Damage of the gun at the time it fired.
pub static BULLET_GUN_DAMAGE: LazyLock<AttributeSlot<f64, f64>> =
	LazyLock::new(|| AttributeSlot::declare_static("bullet_gun_damage", codec::DOUBLE));

/// Creates the projectile `gun` fires.
pub fn spawn(gun: &Gun) -> Entity {
	let mut bullet = Entity::new(Material::ARROW);
	bullet.set_velocity(gun.velocity());
	BULLET_GUN_KEY.write(&mut bullet, gun.key().to_owned());
	BULLET_GUN_DAMAGE.write(&mut bullet, gun.damage());
	bullet
}

/// Returns true if the entity was fired by a gun.
pub fn is_bullet(entity: &Entity) -> bool {
	BULLET_GUN_KEY.has(entity)
}

/// Resolves the gun that fired `projectile`, if it is still registered.
pub fn source_gun(projectile: &Entity, items: &ItemManager) -> Option<Arc<Gun>> {
	items.lookup::<Gun>(&BULLET_GUN_KEY.read(projectile)?)
}
