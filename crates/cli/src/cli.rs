use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pickwise")]
#[command(about = "Resolve queries against specialization rule families")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// TOML rule file to load
	#[arg(long, global = true, value_name = "FILE")]
	pub rules: Option<PathBuf>,

	/// Also load the builtin families (implied without --rules)
	#[arg(long, global = true)]
	pub builtins: bool,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the handle of the most specific matching candidate
	Resolve {
		/// Rule family
		family: String,
		/// Concrete query descriptor, e.g. "int*" or "(int, char) {has_to_string}"
		query: String,
	},
	/// Report why each candidate of a family was kept or rejected
	Explain {
		/// Rule family
		family: String,
		/// Concrete query descriptor
		query: String,
	},
	/// Load and validate the rules, then report counts
	Check,
	/// List families and their candidates
	List {
		/// Only list this family
		family: Option<String>,
	},
}
