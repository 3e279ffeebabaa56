//! Command implementations. Each returns the JSON document to print.

use anyhow::{Context, bail, ensure};
use fuze_registry::{Config, Inventory, Item, ItemManager, Keyable, ReloadSummary, Runtime, load_config};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::cli::{Cli, Command};

/// Loads the config named on the command line and publishes one generation.
pub fn load(cli: &Cli) -> anyhow::Result<(Runtime, ReloadSummary)> {
	let config = match &cli.config {
		Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
		None => fuze_content::default_config().context("parsing the built-in config")?,
	};
	load_from(config)
}

fn load_from(config: Config) -> anyhow::Result<(Runtime, ReloadSummary)> {
	for warning in &config.warnings {
		warn!(%warning, "Config warning");
	}
	let runtime = fuze_content::runtime(&config.settings);
	let summary = runtime.reload(&config.registry).context("reload failed")?;
	info!(generation = summary.generation, "Content loaded");
	Ok((runtime, summary))
}

pub fn run(cli: &Cli) -> anyhow::Result<String> {
	let (runtime, summary) = load(cli)?;
	let output = execute(&cli.command, &runtime, summary)?;
	Ok(serde_json::to_string_pretty(&output)?)
}

fn execute(command: &Command, runtime: &Runtime, summary: ReloadSummary) -> anyhow::Result<Value> {
	let generation = runtime.generation();
	let items = generation.items();
	match command {
		Command::Reload => Ok(serde_json::to_value(summary)?),
		Command::List { item_type: None } => {
			let types: serde_json::Map<String, Value> = items
				.all_type_tags()
				.into_iter()
				.map(|tag| {
					let keys = items.keys_by_type(&tag).unwrap_or_default();
					(tag, json!(keys))
				})
				.collect();
			Ok(Value::Object(types))
		}
		Command::List { item_type: Some(item_type) } => {
			let Some(keys) = items.keys_by_type(item_type) else {
				bail!("unknown item type {item_type:?}");
			};
			Ok(json!(keys))
		}
		Command::Give { item_type, key, amount } => give(items, item_type, key, *amount),
		Command::Inspect { item_type, key } => {
			let item = find(items, item_type, key)?;
			Ok(describe(item.as_ref())?)
		}
	}
}

fn find(items: &ItemManager, item_type: &str, key: &str) -> anyhow::Result<std::sync::Arc<dyn Item>> {
	ensure!(
		items.all_type_tags().contains(item_type),
		"unknown item type {item_type:?}"
	);
	items
		.lookup_by_type(key, item_type)
		.with_context(|| format!("no {item_type} with key {key:?}"))
}

/// Grants `amount` carriers of one item to a fresh player inventory.
fn give(items: &ItemManager, item_type: &str, key: &str, amount: u32) -> anyhow::Result<Value> {
	ensure!(amount > 0, "amount must be positive");
	let item = find(items, item_type, key)?;

	let mut inventory = Inventory::default();
	let overflow = inventory.add_item(item.carrier().with_amount(amount));
	let dropped = overflow.as_ref().map_or(0, |stack| stack.amount());
	if dropped > 0 {
		warn!(item_type, key, dropped, "Inventory full; overflow dropped");
	}

	Ok(json!({
		"item_type": item.kind(),
		"key": item.key(),
		"given": amount - dropped,
		"dropped": dropped,
		"inventory": inventory,
	}))
}

fn describe(item: &dyn Item) -> anyhow::Result<Value> {
	Ok(json!({
		"item_type": item.kind(),
		"key": item.key(),
		"name": item.name().plain(),
		"rarity": item.rarity().key(),
		"carrier": serde_json::to_value(item.carrier())?,
	}))
}
