//! Guns: crossbows that fire bullets and consume ammo.
//!
//! Descriptor fields, besides `name` and `rarity`:
//!
//! | Field | Type | Required |
//! |-------|------|----------|
//! | `ammo` | ammo key | yes |
//! | `shoot-cooldown` | milliseconds | yes |
//! | `damage` | float | yes |
//! | `velocity` | float > 0 | no, defaults to [`DEFAULT_VELOCITY`] |

use std::sync::{Arc, LazyLock};

use fuze_registry::attributes::codec;
use fuze_registry::{
	AttributeSlot, BuildContext, Handler, HandlerResult, Item, ItemBase, ItemKind, ItemManager, Keyable, KindDef, Material, NodeReader, Result,
};
use tracing::debug;

use crate::ammo::Ammo;
use crate::bullet;
use crate::equipment::EQUIPMENT_KIND;
use crate::events::{ItemUse, ProjectileHit, UseOutcome};

/// Bullet speed used when a gun omits `velocity`.
pub const DEFAULT_VELOCITY: f64 = 3.0;

/// Cooldown between shots, stamped on every gun carrier.
pub static GUN_SHOOT_COOLDOWN: LazyLock<AttributeSlot<i32, u32>> =
	LazyLock::new(|| AttributeSlot::declare_static("gun_shoot_cooldown", codec::U32));

/// Host time of the last shot, written to the held carrier on every shot.
pub static GUN_LAST_SHOT: LazyLock<AttributeSlot<i64, u64>> =
	LazyLock::new(|| AttributeSlot::declare_static("gun_last_shot", codec::U64));

pub static GUN_KIND: KindDef = KindDef {
	tag: "gun",
	parent: Some(&EQUIPMENT_KIND),
	handlers: gun_handlers,
};

fn gun_handlers() -> Vec<Handler> {
	vec![
		Handler::for_item::<ItemUse>("fire", fire),
		Handler::for_item::<ProjectileHit>("apply_bullet_damage", apply_bullet_damage),
	]
}

#[derive(Debug)]
pub struct Gun {
	base: ItemBase,
	ammo: Arc<Ammo>,
	shoot_cooldown: u32,
	damage: f64,
	velocity: f64,
}

impl Gun {
	pub fn ammo(&self) -> &Arc<Ammo> {
		&self.ammo
	}

	pub fn shoot_cooldown(&self) -> u32 {
		self.shoot_cooldown
	}

	pub fn damage(&self) -> f64 {
		self.damage
	}

	pub fn velocity(&self) -> f64 {
		self.velocity
	}
}

impl ItemKind for Gun {
	const KIND: &'static KindDef = &GUN_KIND;

	fn material(_node: &NodeReader<'_>) -> Result<Material> {
		Ok(Material::CROSSBOW)
	}

	fn build(mut base: ItemBase, node: &NodeReader<'_>, ctx: &BuildContext<'_>) -> Result<Self> {
		let ammo = ctx.reference::<Ammo>(node, "ammo")?;
		let shoot_cooldown = node.require_u32("shoot-cooldown")?;
		let damage = node.require_f64("damage")?;
		let velocity = node.optional_f64("velocity")?.unwrap_or(DEFAULT_VELOCITY);
		if velocity <= 0.0 {
			return Err(node.invalid("velocity", format!("{velocity} is not positive")));
		}

		GUN_SHOOT_COOLDOWN.write(base.carrier_mut(), shoot_cooldown);
		Ok(Self {
			base,
			ammo,
			shoot_cooldown,
			damage,
			velocity,
		})
	}
}

fuze_registry::impl_item!(Gun);

/// Fires the held gun: checks the cooldown, consumes one ammo and spawns a bullet.
fn fire(_: &dyn Item, event: &mut ItemUse, items: &ItemManager) -> HandlerResult {
	let Some(gun) = items.resolve_carrier::<Gun>(&event.held) else {
		return Ok(());
	};
	event.cancelled = true;

	let cooldown = u64::from(GUN_SHOOT_COOLDOWN.read(&event.held).unwrap_or(gun.shoot_cooldown));
	if let Some(last) = GUN_LAST_SHOT.read(&event.held) {
		let elapsed = event.now_ms.saturating_sub(last);
		if elapsed < cooldown {
			event.outcome = Some(UseOutcome::CoolingDown {
				remaining_ms: cooldown - elapsed,
			});
			return Ok(());
		}
	}

	let ammo_key = gun.ammo.key();
	let consumed = event.inventory.remove_matching(
		|stack| items.resolve_carrier::<Ammo>(stack).is_some_and(|ammo| ammo.key() == ammo_key),
		1,
	);
	if consumed == 0 {
		event.outcome = Some(UseOutcome::OutOfAmmo);
		return Ok(());
	}

	GUN_LAST_SHOT.write(&mut event.held, event.now_ms);
	event.spawned.push(bullet::spawn(&gun));
	event.outcome = Some(UseOutcome::Fired);
	debug!(gun = gun.key(), ammo = ammo_key, now_ms = event.now_ms, "Gun fired");
	Ok(())
}

/// Applies the damage stamped on a bullet to the target.
fn apply_bullet_damage(_: &dyn Item, event: &mut ProjectileHit, items: &ItemManager) -> HandlerResult {
	if bullet::source_gun(&event.projectile, items).is_none() {
		return Ok(());
	}
	let Some(damage) = bullet::BULLET_GUN_DAMAGE.read(&event.projectile) else {
		return Ok(());
	};
	event.target_health = (event.target_health - damage).max(0.0);
	event.damage_dealt = Some(damage);
	Ok(())
}
