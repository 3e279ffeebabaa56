//! Typed content registry for the Fuze game server runtime.
//!
//! This crate owns the three tightly coupled pieces every content instance
//! participates in:
//!
//! - [`index`] - per-kind registries built from descriptor groups, keyed by
//!   instance key and published under a type tag.
//! - [`attributes`] - globally named, strongly typed slots that stamp values onto
//!   opaque carriers ([`carrier::ItemStack`], [`carrier::Entity`], raw containers).
//! - [`events`] - handler subscriptions discovered along a kind's parent chain and
//!   dispatched by exact event type.
//!
//! The [`runtime::Runtime`] ties them together: it rebuilds a complete
//! [`runtime::Generation`] from a [`descriptor::DescriptorSource`] and publishes it
//! atomically, so a failed reload never leaves a half-populated registry behind.
//!
//! # Adding a New Kind
//!
//! 1. Declare a `static` [`item::KindDef`] with its tag, parent and handler list.
//! 2. Implement [`item::ItemKind`] (material + `build`) and invoke [`impl_item!`].
//! 3. Add the kind to the [`runtime::KindTable`] after every kind it references.

pub mod attributes;
pub mod carrier;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod index;
pub mod inventory;
pub mod item;
pub mod keyable;
pub mod rarity;
pub mod runtime;
pub mod text;

#[cfg(test)]
mod test_support;

pub use attributes::{AttributeSlot, NamespacedKey, PrimitiveType, SlotCodec, SlotNamespace};
pub use carrier::{AttributeCarrier, AttributeContainer, AttributeHolder, AttributeValue, Entity, ItemMeta, ItemStack, Material, MaterialError};
pub use config::{Config, ConfigError, ConfigWarning, Settings, load_config, parse_config_str};
pub use descriptor::{DescriptorError, DescriptorGroup, DescriptorNode, DescriptorSource, NodeReader};
pub use error::{RegistryError, Result, SlotError};
pub use events::{DispatchError, Event, EventManager, Handler, HandlerError, HandlerResult, Subscription};
pub use index::{BuildContext, ItemManager, ItemRegistry};
pub use inventory::Inventory;
pub use item::{ITEM_KEY, ITEM_TYPE, Item, ItemBase, ItemKind, KindDef, ROOT_KIND};
pub use keyable::{Keyable, is_valid_key};
pub use rarity::{Rarity, RarityTable};
pub use runtime::{Generation, KindRegistration, KindTable, ReloadSummary, Runtime, TypeSummary};
pub use text::DisplayName;
