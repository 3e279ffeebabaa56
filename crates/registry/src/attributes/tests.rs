use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;

use super::codec::{BOOL, DOUBLE, INT, STRING, U32, U64};
use super::{AttributeSlot, DEFAULT_NAMESPACE, NamespacedKey, SlotNamespace};
use crate::carrier::{AttributeCarrier, AttributeContainer, AttributeValue, Entity, ItemMeta, ItemStack, Material};
use crate::error::SlotError;
use crate::item::{ITEM_KEY, ITEM_TYPE};

/// Fresh namespace per call; claimed keys are process-wide.
fn namespace() -> SlotNamespace {
	static NEXT: AtomicUsize = AtomicUsize::new(0);
	SlotNamespace::new(&format!("test{}", NEXT.fetch_add(1, Ordering::Relaxed)))
}

#[test]
fn namespaced_key_parts() {
	let key = NamespacedKey::new("fuze", "bullet_gun_key");
	assert_eq!(key.namespace(), "fuze");
	assert_eq!(key.key(), "bullet_gun_key");
	assert_eq!(key.as_str(), "fuze:bullet_gun_key");
	assert_eq!(key.to_string(), "fuze:bullet_gun_key");
}

#[test]
fn duplicate_slot_name_is_rejected() {
	let ns = namespace();
	let _first = AttributeSlot::new(&ns, "gun_key", STRING).expect("first declaration");
	let err = AttributeSlot::new(&ns, "gun_key", INT).expect_err("second declaration");
	assert_eq!(err, SlotError::DuplicateSlotName("gun_key".into()));
}

#[test]
fn invalid_slot_name_is_rejected() {
	let ns = namespace();
	let err = AttributeSlot::new(&ns, "Gun Key", STRING).expect_err("uppercase and space");
	assert_eq!(err, SlotError::InvalidSlotName("Gun Key".into()));
	assert!(!ns.is_declared("Gun Key"));
}

#[test]
fn distinct_namespaces_share_names() {
	let a = namespace();
	let b = namespace();
	let in_a = AttributeSlot::new(&a, "shared", INT).expect("declared in a");
	let in_b = AttributeSlot::new(&b, "shared", INT).expect("declared in b");
	assert_ne!(in_a.namespaced_key(), in_b.namespaced_key());
	assert_eq!(a.declared(), vec!["shared".to_string()]);
}

#[test]
fn identity_slots_cannot_be_redeclared() {
	// Both statics claim their keys on first use.
	assert_eq!(ITEM_KEY.namespaced_key().as_str(), "fuze:item_key");
	assert_eq!(ITEM_TYPE.namespaced_key().as_str(), "fuze:item_type");

	let err = AttributeSlot::declare("item_key", INT).expect_err("global redeclaration");
	assert_eq!(err, SlotError::DuplicateSlotName("item_key".into()));

	let shadow = SlotNamespace::new(DEFAULT_NAMESPACE);
	let err = AttributeSlot::new(&shadow, "item_key", INT).expect_err("same key through another namespace");
	assert_eq!(err, SlotError::DuplicateSlotName("item_key".into()));
	let err = AttributeSlot::new(&shadow, "item_type", STRING).expect_err("same key through another namespace");
	assert_eq!(err, SlotError::DuplicateSlotName("item_type".into()));
	assert!(shadow.declared().is_empty());

	let mut stack = ItemStack::new(Material::CROSSBOW);
	ITEM_KEY.write(&mut stack, "rifle".to_string());
	assert_eq!(ITEM_KEY.read(&stack).as_deref(), Some("rifle"));
}

#[test]
fn unwritten_slot_reads_none() {
	let ns = namespace();
	let slot = AttributeSlot::new(&ns, "damage", DOUBLE).expect("declared");
	let stack = ItemStack::new(Material::CROSSBOW);
	assert!(!slot.has(&stack));
	assert_eq!(slot.read(&stack), None);
	assert!(!stack.has_meta(), "reading must not create meta");
}

#[test]
fn write_on_item_stack_copies_meta_back() {
	let ns = namespace();
	let slot = AttributeSlot::new(&ns, "cooldown", U32).expect("declared");
	let mut stack = ItemStack::new(Material::CROSSBOW);

	slot.write(&mut stack, 500);

	assert!(slot.has(&stack));
	assert_eq!(slot.read(&stack), Some(500));
	let meta = stack.meta().expect("write creates meta");
	assert_eq!(slot.read(&meta), Some(500));
}

#[test]
fn write_on_detached_meta_does_not_touch_stack() {
	let ns = namespace();
	let slot = AttributeSlot::new(&ns, "flag", BOOL).expect("declared");
	let mut stack = ItemStack::new(Material::ARROW);
	slot.write(&mut stack, false);

	let mut meta: ItemMeta = stack.meta().expect("meta");
	slot.write(&mut meta, true);

	assert_eq!(slot.read(&stack), Some(false));
	stack.set_meta(meta);
	assert_eq!(slot.read(&stack), Some(true));
}

#[test]
fn entity_and_container_shapes() {
	let ns = namespace();
	let slot = AttributeSlot::new(&ns, "owner", STRING).expect("declared");

	let mut entity = Entity::new(Material::ARROW);
	slot.write(&mut entity, "rifle".to_string());
	assert_eq!(slot.read(&entity).as_deref(), Some("rifle"));

	let mut container = AttributeContainer::new();
	slot.write(&mut container, "pistol".to_string());
	assert_eq!(slot.read(&container).as_deref(), Some("pistol"));
}

#[test]
fn primitive_type_mismatch_reads_none() {
	let ns = namespace();
	let slot = AttributeSlot::new(&ns, "count", INT).expect("declared");
	let mut container = AttributeContainer::new();
	container.set(slot.namespaced_key(), AttributeValue::String("three".into()));

	assert!(!slot.has(&container));
	assert_eq!(slot.read(&container), None);
}

#[test]
fn invalid_bool_byte_does_not_decode() {
	let ns = namespace();
	let slot = AttributeSlot::new(&ns, "armed", BOOL).expect("declared");
	let mut container = AttributeContainer::new();
	container.set(slot.namespaced_key(), AttributeValue::Byte(7));

	assert!(slot.has(&container));
	assert_eq!(slot.read(&container), None);
}

#[test]
fn remove_reports_presence() {
	let ns = namespace();
	let slot = AttributeSlot::new(&ns, "last_shot", U64).expect("declared");
	let mut stack = ItemStack::new(Material::CROSSBOW);

	assert!(!slot.remove(&mut stack));
	assert!(!stack.has_meta());

	slot.write(&mut stack, 1_700_000_000_000);
	assert!(slot.remove(&mut stack));
	assert_eq!(slot.read(&stack), None);
	assert_eq!(stack.read_container(|c| c.len()), Some(0));
}

proptest! {
	/// `read(write(carrier, v)) == v` for signed ints on an item stack.
	#[test]
	fn prop_int_round_trip(value in any::<i32>()) {
		let ns = namespace();
		let slot = AttributeSlot::new(&ns, "value", INT).expect("declared");
		let mut stack = ItemStack::new(Material::ARROW);
		slot.write(&mut stack, value);
		prop_assert_eq!(slot.read(&stack), Some(value));
	}

	/// Unsigned values survive the signed wire representation unchanged.
	#[test]
	fn prop_unsigned_round_trip(small in any::<u32>(), large in any::<u64>()) {
		let ns = namespace();
		let small_slot = AttributeSlot::new(&ns, "small", U32).expect("declared");
		let large_slot = AttributeSlot::new(&ns, "large", U64).expect("declared");
		let mut entity = Entity::new(Material::ARROW);
		small_slot.write(&mut entity, small);
		large_slot.write(&mut entity, large);
		prop_assert_eq!(small_slot.read(&entity), Some(small));
		prop_assert_eq!(large_slot.read(&entity), Some(large));
	}

	/// Doubles round-trip bit for bit, NaN payloads included.
	#[test]
	fn prop_double_round_trip(value in any::<f64>()) {
		let ns = namespace();
		let slot = AttributeSlot::new(&ns, "value", DOUBLE).expect("declared");
		let mut meta = ItemMeta::default();
		slot.write(&mut meta, value);
		prop_assert_eq!(slot.read(&meta).map(f64::to_bits), Some(value.to_bits()));
	}

	/// Strings round-trip through a raw container.
	#[test]
	fn prop_string_round_trip(value in ".*") {
		let ns = namespace();
		let slot = AttributeSlot::new(&ns, "value", STRING).expect("declared");
		let mut container = AttributeContainer::new();
		slot.write(&mut container, value.clone());
		prop_assert_eq!(slot.read(&container), Some(value));
	}
}
