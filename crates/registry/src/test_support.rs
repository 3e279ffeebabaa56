//! Small kinds and events shared by the crate's unit tests.

use std::sync::Arc;

use crate::carrier::Material;
use crate::descriptor::{DescriptorGroup, DescriptorNode, DescriptorSource, NodeReader};
use crate::error::Result;
use crate::events::{Event, Handler, HandlerError};
use crate::index::{BuildContext, ItemManager};
use crate::item::{Item, ItemBase, ItemKind, KindDef, ROOT_KIND};
use crate::keyable::Keyable;
use crate::rarity::RarityTable;
use crate::text::DisplayName;

/// Records every handler invocation as `handler@bound`.
#[derive(Debug, Default)]
pub struct Ping {
	pub seen: Vec<String>,
}

impl Event for Ping {}

/// Unrelated event that wraps a [`Ping`]; never reaches `Ping` handlers.
#[derive(Debug, Default)]
pub struct LoudPing {
	pub inner: Ping,
}

impl Event for LoudPing {}

/// Event whose only handler fails.
#[derive(Debug, Default)]
pub struct Jam {
	pub reached: usize,
}

impl Event for Jam {}

fn widget_handlers() -> Vec<Handler> {
	vec![Handler::for_item::<Ping>("widget_ping", |item, ping, _| {
		ping.seen.push(format!("widget_ping@{}", item.key()));
		Ok(())
	})]
}

/// Abstract base of the test kinds.
pub static WIDGET_KIND: KindDef = KindDef {
	tag: "widget",
	parent: Some(&ROOT_KIND),
	handlers: widget_handlers,
};

pub static BOLT_KIND: KindDef = KindDef {
	tag: "bolt",
	parent: Some(&WIDGET_KIND),
	handlers: KindDef::no_handlers,
};

#[derive(Debug)]
pub struct Bolt {
	pub base: ItemBase,
}

impl ItemKind for Bolt {
	const KIND: &'static KindDef = &BOLT_KIND;

	fn material(_node: &NodeReader<'_>) -> Result<Material> {
		Ok(Material::ARROW)
	}

	fn build(base: ItemBase, _node: &NodeReader<'_>, _ctx: &BuildContext<'_>) -> Result<Self> {
		Ok(Self { base })
	}
}

crate::impl_item!(Bolt);

fn launcher_handlers() -> Vec<Handler> {
	vec![
		Handler::for_kind::<Launcher, Ping>("launcher_ping", |launcher, ping, items| {
			let loaded = items.contains::<Bolt>(launcher.bolt.key());
			ping.seen.push(format!("launcher_ping@{}:{loaded}", launcher.key()));
			Ok(())
		}),
		Handler::for_kind::<Launcher, Jam>("launcher_jam", |_, jam, _| {
			jam.reached += 1;
			Err(HandlerError::failed("jammed"))
		}),
		Handler::for_kind::<Launcher, Jam>("launcher_after_jam", |_, jam, _| {
			jam.reached += 1;
			Ok(())
		}),
	]
}

pub static LAUNCHER_KIND: KindDef = KindDef {
	tag: "launcher",
	parent: Some(&WIDGET_KIND),
	handlers: launcher_handlers,
};

#[derive(Debug)]
pub struct Launcher {
	pub base: ItemBase,
	pub bolt: Arc<Bolt>,
	pub power: f64,
}

impl ItemKind for Launcher {
	const KIND: &'static KindDef = &LAUNCHER_KIND;

	fn material(_node: &NodeReader<'_>) -> Result<Material> {
		Ok(Material::CROSSBOW)
	}

	fn build(base: ItemBase, node: &NodeReader<'_>, ctx: &BuildContext<'_>) -> Result<Self> {
		let bolt = ctx.reference::<Bolt>(node, "bolt")?;
		let power = node.require_f64("power")?;
		Ok(Self { base, bolt, power })
	}
}

crate::impl_item!(Launcher);

pub static SHIFTY_KIND: KindDef = KindDef {
	tag: "shifty",
	parent: Some(&ROOT_KIND),
	handlers: KindDef::no_handlers,
};

/// Kind that reports a per-descriptor type tag, for type consistency checks.
pub struct Shifty {
	pub base: ItemBase,
	pub tag: String,
}

impl ItemKind for Shifty {
	const KIND: &'static KindDef = &SHIFTY_KIND;

	fn material(node: &NodeReader<'_>) -> Result<Material> {
		let id = node.optional_str("material")?.unwrap_or("stone");
		Material::parse(id).map_err(|e| node.construction(e))
	}

	fn build(base: ItemBase, node: &NodeReader<'_>, _ctx: &BuildContext<'_>) -> Result<Self> {
		let tag = node.require_str("tag")?.to_owned();
		Ok(Self { base, tag })
	}
}

impl Keyable for Shifty {
	fn key(&self) -> &str {
		self.base.key()
	}

	fn kind(&self) -> &str {
		&self.tag
	}

	fn name(&self) -> &DisplayName {
		self.base.name()
	}
}

impl Item for Shifty {
	fn base(&self) -> &ItemBase {
		&self.base
	}

	fn kind_def(&self) -> &'static KindDef {
		&SHIFTY_KIND
	}
}

pub fn node(key: &str, src: &str) -> DescriptorNode {
	DescriptorNode::new(key, src.parse().expect("valid toml"))
}

pub fn rarities() -> RarityTable {
	let group = DescriptorGroup::new("rarities").with(node("common", "name = \"Common\"\nchance = 100"));
	RarityTable::from_group(&group).expect("valid rarities")
}

/// `bolts` with `steel`, `launchers` with `crossbow` referencing it.
pub fn source() -> DescriptorSource {
	DescriptorSource::new()
		.with_group(DescriptorGroup::new("bolts").with(node("steel", "name = \"Steel Bolt\"\nrarity = \"common\"")))
		.with_group(DescriptorGroup::new("launchers").with(node(
			"crossbow",
			"name = \"Crossbow\"\nrarity = \"common\"\nbolt = \"steel\"\npower = 2.5",
		)))
}

/// Registers `bolts` then `launchers` from [`source`].
pub fn populated(events: &crate::events::EventManager) -> ItemManager {
	let source = source();
	let rarities = rarities();
	let mut items = ItemManager::new();
	items
		.register_type::<Bolt>("bolts", &source, &rarities, events)
		.expect("bolts register");
	items
		.register_type::<Launcher>("launchers", &source, &rarities, events)
		.expect("launchers register");
	items
}
