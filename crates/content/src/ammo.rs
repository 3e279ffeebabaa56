use fuze_registry::{BuildContext, ItemBase, ItemKind, KindDef, Material, NodeReader, Result};

use crate::equipment::EQUIPMENT_KIND;

pub static AMMO_KIND: KindDef = KindDef {
	tag: "ammo",
	parent: Some(&EQUIPMENT_KIND),
	handlers: KindDef::no_handlers,
};

/// Ammunition consumed by guns. Carries nothing beyond its identity.
#[derive(Debug)]
pub struct Ammo {
	base: ItemBase,
}

impl ItemKind for Ammo {
	const KIND: &'static KindDef = &AMMO_KIND;

	/// `material` is optional and defaults to an iron nugget.
	fn material(node: &NodeReader<'_>) -> Result<Material> {
		match node.optional_str("material")? {
			Some(id) => Material::parse(id).map_err(|e| node.construction(e)),
			None => Ok(Material::IRON_NUGGET),
		}
	}

	fn build(base: ItemBase, _node: &NodeReader<'_>, _ctx: &BuildContext<'_>) -> Result<Self> {
		Ok(Self { base })
	}
}

fuze_registry::impl_item!(Ammo);
