//! Content instance base.
//!
//! A concrete kind is a struct holding an [`ItemBase`] in a field named `base`
//! plus its own fields. It implements [`ItemKind`] and invokes [`impl_item!`]
//! for the [`Keyable`] and [`Item`] plumbing.

use std::any::Any;
use std::sync::{Arc, LazyLock};

use crate::attributes::{AttributeSlot, codec};
use crate::carrier::{ItemStack, Material};
use crate::descriptor::NodeReader;
use crate::error::{RegistryError, Result};
use crate::events::Handler;
use crate::index::BuildContext;
use crate::keyable::{Keyable, is_valid_key};
use crate::rarity::{Rarity, RarityTable};
use crate::text::DisplayName;

/// Identity slot: the key of the instance a carrier belongs to.
pub static ITEM_KEY: LazyLock<AttributeSlot<String, String>> =
	LazyLock::new(|| AttributeSlot::declare_static("item_key", codec::STRING));

/// Identity slot: the type tag of the instance a carrier belongs to.
pub static ITEM_TYPE: LazyLock<AttributeSlot<String, String>> =
	LazyLock::new(|| AttributeSlot::declare_static("item_type", codec::STRING));

/// Root of every kind chain. Declares no handlers.
pub static ROOT_KIND: KindDef = KindDef {
	tag: "item",
	parent: None,
	handlers: KindDef::no_handlers,
};

/// A declared content kind: its tag, its parent kind and its event handlers.
///
/// Abstract kinds (shared bases such as equipment) are declared the same way;
/// they just never get a registry of their own.
#[derive(Debug)]
pub struct KindDef {
	pub tag: &'static str,
	pub parent: Option<&'static KindDef>,
	pub handlers: fn() -> Vec<Handler>,
}

impl KindDef {
	pub fn no_handlers() -> Vec<Handler> {
		Vec::new()
	}

	/// Returns this kind followed by every ancestor, ending at the root.
	pub fn chain(&'static self) -> Result<Vec<&'static KindDef>> {
		let mut chain: Vec<&'static KindDef> = Vec::new();
		let mut next = Some(self);
		while let Some(kind) = next {
			if chain.iter().any(|seen| std::ptr::eq(*seen, kind)) {
				return Err(RegistryError::CyclicKindChain(self.tag.to_owned()));
			}
			chain.push(kind);
			next = kind.parent;
		}
		Ok(chain)
	}

	/// Returns true if `ancestor` is this kind or one of its parents.
	pub fn is_a(&'static self, ancestor: &'static KindDef) -> bool {
		self.chain()
			.map(|chain| chain.iter().any(|k| std::ptr::eq(*k, ancestor)))
			.unwrap_or(false)
	}
}

/// Object-safe view of a content instance.
pub trait Item: Keyable + Any + Send + Sync {
	fn base(&self) -> &ItemBase;

	fn kind_def(&self) -> &'static KindDef;

	fn rarity(&self) -> &Arc<Rarity> {
		&self.base().rarity
	}

	/// Returns a fresh copy of the instance's carrier.
	fn carrier(&self) -> ItemStack {
		self.base().carrier.duplicate()
	}
}

/// Construction contract of a concrete kind.
pub trait ItemKind: Item + Sized {
	const KIND: &'static KindDef;

	/// Physical form of an instance built from `node`.
	fn material(node: &NodeReader<'_>) -> Result<Material>;

	/// Pulls the kind's own fields from `node` and finishes the instance.
	fn build(base: ItemBase, node: &NodeReader<'_>, ctx: &BuildContext<'_>) -> Result<Self>;
}

/// Identity, rarity and carrier shared by every instance.
#[derive(Debug, Clone)]
pub struct ItemBase {
	key: String,
	name: DisplayName,
	rarity: Arc<Rarity>,
	carrier: ItemStack,
}

impl ItemBase {
	/// Validates the key, reads `name` and `rarity`, and builds the stamped carrier.
	pub fn from_descriptor<T: ItemKind>(node: &NodeReader<'_>, rarities: &RarityTable) -> Result<Self> {
		let tag = T::KIND.tag;
		let key = node.key();
		if !is_valid_key(key) {
			return Err(RegistryError::InvalidKey {
				kind: tag.into(),
				key: key.into(),
			});
		}

		let name = DisplayName::new(node.require_str("name")?);
		let rarity = rarities.resolve(node.require_str("rarity")?, tag, key)?;
		let material = T::material(node)?;

		let mut carrier = ItemStack::new(material);
		ITEM_KEY.write(&mut carrier, key.to_owned());
		ITEM_TYPE.write(&mut carrier, tag.to_owned());
		carrier.set_display_name(Some(name.clone()));

		Ok(Self {
			key: key.to_owned(),
			name,
			rarity,
			carrier,
		})
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn name(&self) -> &DisplayName {
		&self.name
	}

	pub fn rarity(&self) -> &Arc<Rarity> {
		&self.rarity
	}

	pub fn carrier(&self) -> &ItemStack {
		&self.carrier
	}

	/// Mutable access for kinds stamping their own slots during `build`.
	pub fn carrier_mut(&mut self) -> &mut ItemStack {
		&mut self.carrier
	}
}

/// Implements [`Keyable`] and [`Item`] for a kind with a `base: ItemBase` field.
#[macro_export]
macro_rules! impl_item {
	($type:ty) => {
		impl $crate::Keyable for $type {
			fn key(&self) -> &str {
				self.base.key()
			}
			fn kind(&self) -> &str {
				<$type as $crate::ItemKind>::KIND.tag
			}
			fn name(&self) -> &$crate::DisplayName {
				self.base.name()
			}
		}

		impl $crate::Item for $type {
			fn base(&self) -> &$crate::ItemBase {
				&self.base
			}
			fn kind_def(&self) -> &'static $crate::KindDef {
				<$type as $crate::ItemKind>::KIND
			}
		}
	};
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::{DescriptorGroup, DescriptorNode};

	static CYCLE_A: KindDef = KindDef {
		tag: "cycle_a",
		parent: Some(&CYCLE_B),
		handlers: KindDef::no_handlers,
	};

	static CYCLE_B: KindDef = KindDef {
		tag: "cycle_b",
		parent: Some(&CYCLE_A),
		handlers: KindDef::no_handlers,
	};

	static TRINKET_KIND: KindDef = KindDef {
		tag: "trinket",
		parent: Some(&ROOT_KIND),
		handlers: KindDef::no_handlers,
	};

	struct Trinket {
		base: ItemBase,
	}

	impl ItemKind for Trinket {
		const KIND: &'static KindDef = &TRINKET_KIND;

		fn material(_node: &NodeReader<'_>) -> Result<Material> {
			Ok(Material::from_static("emerald"))
		}

		fn build(base: ItemBase, _node: &NodeReader<'_>, _ctx: &BuildContext<'_>) -> Result<Self> {
			Ok(Self { base })
		}
	}

	crate::impl_item!(Trinket);

	fn rarities() -> RarityTable {
		let group = DescriptorGroup::new("rarities")
			.with(DescriptorNode::new("common", "name = \"Common\"\nchance = 100".parse().expect("toml")));
		RarityTable::from_group(&group).expect("rarities")
	}

	#[test]
	fn chain_ends_at_root() {
		let chain = TRINKET_KIND.chain().expect("acyclic");
		let tags: Vec<_> = chain.iter().map(|k| k.tag).collect();
		assert_eq!(tags, vec!["trinket", "item"]);
		assert!(TRINKET_KIND.is_a(&ROOT_KIND));
		assert!(!ROOT_KIND.is_a(&TRINKET_KIND));
	}

	#[test]
	fn cyclic_chain_is_rejected() {
		assert!(matches!(CYCLE_A.chain(), Err(RegistryError::CyclicKindChain(tag)) if tag == "cycle_a"));
	}

	#[test]
	fn base_stamps_identity_and_name() {
		let node = DescriptorNode::new("lucky_coin", "name = \"<gold>Lucky Coin\"\nrarity = \"common\"".parse().expect("toml"));
		let base = ItemBase::from_descriptor::<Trinket>(&NodeReader::new(&node, "trinket"), &rarities()).expect("valid descriptor");
		let trinket = Trinket { base };

		let carrier = trinket.carrier();
		assert_eq!(ITEM_KEY.read(&carrier).as_deref(), Some("lucky_coin"));
		assert_eq!(ITEM_TYPE.read(&carrier).as_deref(), Some("trinket"));
		assert_eq!(carrier.display_name().map(|n| n.plain()).as_deref(), Some("Lucky Coin"));
		assert_eq!(carrier.material().id(), "emerald");
		assert_eq!(trinket.kind(), "trinket");
		assert_eq!(trinket.rarity().key(), "common");
	}

	#[test]
	fn carrier_is_handed_out_as_copy() {
		let node = DescriptorNode::new("coin", "name = \"Coin\"\nrarity = \"common\"".parse().expect("toml"));
		let base = ItemBase::from_descriptor::<Trinket>(&NodeReader::new(&node, "trinket"), &rarities()).expect("valid descriptor");
		let trinket = Trinket { base };

		let mut copy = trinket.carrier();
		ITEM_KEY.write(&mut copy, "forged".into());
		assert_eq!(ITEM_KEY.read(&trinket.carrier()).as_deref(), Some("coin"));
	}

	#[test]
	fn base_validation_order() {
		let rarities = rarities();
		let build = |key: &str, src: &str| {
			let node = DescriptorNode::new(key, src.parse().expect("toml"));
			ItemBase::from_descriptor::<Trinket>(&NodeReader::new(&node, "trinket"), &rarities)
		};

		assert!(matches!(build("Bad Key", ""), Err(RegistryError::InvalidKey { .. })));
		assert!(matches!(
			build("coin", "rarity = \"common\""),
			Err(RegistryError::MissingField { path, .. }) if path == "name"
		));
		assert!(matches!(
			build("coin", "name = \"Coin\""),
			Err(RegistryError::MissingField { path, .. }) if path == "rarity"
		));
		assert!(matches!(
			build("coin", "name = \"Coin\"\nrarity = \"mythic\""),
			Err(RegistryError::UnknownRarity { rarity, .. }) if rarity == "mythic"
		));
	}
}
