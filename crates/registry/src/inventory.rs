//! Slot-based inventory, the host side of a grant.

use serde::{Deserialize, Serialize};

use crate::carrier::ItemStack;

/// Fixed number of slots holding item stacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
	slots: Vec<Option<ItemStack>>,
}

impl Default for Inventory {
	fn default() -> Self {
		Self::new(Self::PLAYER_SLOTS)
	}
}

impl Inventory {
	/// Slots of a player inventory.
	pub const PLAYER_SLOTS: usize = 36;

	pub fn new(capacity: usize) -> Self {
		Self {
			slots: vec![None; capacity],
		}
	}

	pub fn capacity(&self) -> usize {
		self.slots.len()
	}

	pub fn slot(&self, index: usize) -> Option<&ItemStack> {
		self.slots.get(index)?.as_ref()
	}

	/// Puts `stack` into slot `index`, returning what was there.
	pub fn set_slot(&mut self, index: usize, stack: Option<ItemStack>) -> Option<ItemStack> {
		let slot = self.slots.get_mut(index)?;
		std::mem::replace(slot, stack.filter(|s| s.amount() > 0))
	}

	/// Adds `stack`, topping up similar stacks before filling empty slots.
	///
	/// Returns whatever did not fit.
	pub fn add_item(&mut self, stack: ItemStack) -> Option<ItemStack> {
		let mut remaining = stack.amount();

		for held in self.slots.iter_mut().flatten() {
			if remaining == 0 {
				break;
			}
			if held.is_similar(&stack) && held.amount() < ItemStack::MAX_STACK {
				let moved = remaining.min(ItemStack::MAX_STACK - held.amount());
				held.set_amount(held.amount() + moved);
				remaining -= moved;
			}
		}

		for slot in self.slots.iter_mut().filter(|slot| slot.is_none()) {
			if remaining == 0 {
				break;
			}
			let moved = remaining.min(ItemStack::MAX_STACK);
			*slot = Some(stack.duplicate().with_amount(moved));
			remaining -= moved;
		}

		(remaining > 0).then(|| stack.with_amount(remaining))
	}

	/// Removes up to `amount` items from stacks matching `pred`. Returns how many were removed.
	pub fn remove_matching(&mut self, mut pred: impl FnMut(&ItemStack) -> bool, amount: u32) -> u32 {
		let mut removed = 0;
		for slot in &mut self.slots {
			if removed == amount {
				break;
			}
			let Some(held) = slot else { continue };
			if !pred(held) {
				continue;
			}
			let taken = (amount - removed).min(held.amount());
			removed += taken;
			if taken == held.amount() {
				*slot = None;
			} else {
				held.set_amount(held.amount() - taken);
			}
		}
		removed
	}

	/// Total amount across stacks matching `pred`.
	pub fn count(&self, mut pred: impl FnMut(&ItemStack) -> bool) -> u32 {
		self.iter().filter(|s| pred(s)).map(ItemStack::amount).sum()
	}

	pub fn iter(&self) -> impl Iterator<Item = &ItemStack> + '_ {
		self.slots.iter().flatten()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.iter().all(Option::is_none)
	}
}
