use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fuze")]
#[command(about = "Load, inspect and grant Fuze content")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Config file to load (the built-in default config if omitted)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// Build every registry from the config and report what was published
	Reload,
	/// List registered type tags, or the keys of one type
	List {
		/// Type tag to list (e.g. gun, ammo)
		item_type: Option<String>,
	},
	/// Put content items into a fresh player inventory
	Give {
		/// Type tag of the item
		item_type: String,
		/// Key of the item
		key: String,
		/// How many to give
		#[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
		amount: u32,
	},
	/// Show an item and its stamped carrier
	Inspect {
		/// Type tag of the item
		item_type: String,
		/// Key of the item
		key: String,
	},
}
