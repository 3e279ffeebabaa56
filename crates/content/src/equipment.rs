//! Equipment: the abstract base of every kind a player can hold.

use fuze_registry::{Handler, HandlerResult, Item, ItemManager, Keyable, KindDef, ROOT_KIND};
use tracing::debug;

use crate::events::ItemRename;

pub static EQUIPMENT_KIND: KindDef = KindDef {
	tag: "equipment",
	parent: Some(&ROOT_KIND),
	handlers: equipment_handlers,
};

fn equipment_handlers() -> Vec<Handler> {
	vec![Handler::for_item::<ItemRename>("guard_rename", guard_rename)]
}

/// Content carriers keep their configured names.
fn guard_rename(_: &dyn Item, event: &mut ItemRename, items: &ItemManager) -> HandlerResult {
	if let Some(item) = items.resolve_carrier_dyn(&event.item) {
		debug!(item_type = item.kind(), key = item.key(), "Rename of content item cancelled");
		event.cancelled = true;
	}
	Ok(())
}
