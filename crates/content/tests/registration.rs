//! Registration scenarios for the built-in kinds.

use fuze_content::gun::GUN_SHOOT_COOLDOWN;
use fuze_content::{Ammo, Gun, default_config, kinds, runtime};
use fuze_registry::{
	DescriptorSource, EventManager, Item, ItemManager, Keyable, RarityTable, RegistryError, Settings, parse_config_str,
};
use pretty_assertions::assert_eq;

const RARITIES: &str = r#"
[registry.rarities.common]
name = "Common"
chance = 100

[registry.ammo.iron]
name = "Iron Round"
rarity = "common"
"#;

const RIFLE: &str = r#"
[registry.guns.rifle]
name = "Rifle"
rarity = "common"
ammo = "iron"
shoot-cooldown = 500
damage = 4.0
"#;

const RIFLE_WITHOUT_DAMAGE: &str = r#"
[registry.guns.rifle]
name = "Rifle"
rarity = "common"
ammo = "iron"
shoot-cooldown = 500
"#;

fn source(guns: &str) -> (DescriptorSource, RarityTable) {
	let config = parse_config_str(&format!("{RARITIES}{guns}")).expect("valid config");
	let rarities = RarityTable::from_group(config.registry.group("rarities").expect("rarities")).expect("valid rarities");
	(config.registry, rarities)
}

#[test]
fn rifle_references_iron_and_stamps_cooldown() {
	let (source, rarities) = source(RIFLE);
	let events = EventManager::new();
	let mut items = ItemManager::new();
	items
		.register_type::<Ammo>("ammo", &source, &rarities, &events)
		.expect("ammo");
	items
		.register_type::<Gun>("guns", &source, &rarities, &events)
		.expect("guns");

	let rifle = items.lookup::<Gun>("rifle").expect("rifle registered");
	assert_eq!(rifle.ammo().key(), "iron");
	assert_eq!(GUN_SHOOT_COOLDOWN.read(&rifle.carrier()), Some(500));
	assert_eq!(rifle.velocity(), fuze_content::gun::DEFAULT_VELOCITY);
	assert_eq!(rifle.kind(), "gun");
}

#[test]
fn missing_damage_is_reported_and_not_inserted() {
	let (source, rarities) = source(RIFLE_WITHOUT_DAMAGE);
	let events = EventManager::new();
	let mut items = ItemManager::new();
	items
		.register_type::<Ammo>("ammo", &source, &rarities, &events)
		.expect("ammo");

	let err = items
		.register_type::<Gun>("guns", &source, &rarities, &events)
		.expect_err("damage is required");
	assert!(
		matches!(
			err,
			RegistryError::MissingField { ref path, ref kind, ref key }
				if path == "damage" && kind == "gun" && key == "rifle"
		),
		"unexpected error: {err}"
	);
	assert!(items.lookup::<Gun>("rifle").is_none());
	assert!(!items.all_type_tags().contains("gun"));
}

#[test]
fn guns_before_ammo_fail_on_the_reference() {
	let (source, rarities) = source(RIFLE);
	let events = EventManager::new();
	let mut items = ItemManager::new();

	let err = items
		.register_type::<Gun>("guns", &source, &rarities, &events)
		.expect_err("ammo not registered yet");
	assert!(matches!(err, RegistryError::UnknownReference { ref reference, .. } if reference == "iron"));

	items
		.register_type::<Ammo>("ammo", &source, &rarities, &events)
		.expect("ammo");
	items
		.register_type::<Gun>("guns", &source, &rarities, &events)
		.expect("guns after ammo");
}

#[test]
fn non_positive_velocity_is_invalid() {
	let (source, rarities) = source(&format!("{RIFLE}velocity = 0\n"));
	let events = EventManager::new();
	let mut items = ItemManager::new();
	items
		.register_type::<Ammo>("ammo", &source, &rarities, &events)
		.expect("ammo");
	let err = items
		.register_type::<Gun>("guns", &source, &rarities, &events)
		.expect_err("zero velocity");
	assert!(matches!(err, RegistryError::InvalidField { ref path, .. } if path == "velocity"));
}

#[test]
fn default_config_loads() {
	let config = default_config().expect("embedded config parses");
	assert!(config.warnings.is_empty());

	let runtime = runtime(&config.settings);
	let summary = runtime.reload(&config.registry).expect("embedded config is valid");

	assert_eq!(summary.rarities, 4);
	assert_eq!(
		summary.types.iter().map(|t| (t.item_type.as_str(), t.instances)).collect::<Vec<_>>(),
		vec![("ammo", 2), ("gun", 4)]
	);
	let marksman = runtime.lookup::<Gun>("marksman").expect("marksman");
	assert_eq!(marksman.ammo().key(), "copper");
	assert_eq!(marksman.rarity().key(), "legendary");
	assert_eq!(marksman.name().plain(), "Marksman");
}

#[test]
fn kind_table_orders_dependencies_first() {
	let tags: Vec<_> = kinds().iter().map(|k| k.kind.tag).collect();
	assert_eq!(tags, vec!["ammo", "gun"]);
	assert_eq!(Settings::default().rarity_group, "rarities");
}

#[test]
fn ammo_material_is_configurable() {
	let config = parse_config_str(
		r#"
[registry.rarities.common]
name = "Common"
chance = 100

[registry.ammo.shell]
name = "Shell"
rarity = "common"
material = "gold_nugget"

[registry.ammo.dud]
name = "Dud"
rarity = "common"
material = "Gold Nugget"
"#,
	)
	.expect("valid config");
	let rarities = RarityTable::from_group(config.registry.group("rarities").expect("rarities")).expect("valid rarities");
	let events = EventManager::new();
	let mut items = ItemManager::new();

	let err = items
		.register_type::<Ammo>("ammo", &config.registry, &rarities, &events)
		.expect_err("bad material id");
	assert!(matches!(err, RegistryError::ConstructionFailure { ref kind, ref key, .. } if kind == "ammo" && key == "dud"));
	assert!(items.is_empty());
}
