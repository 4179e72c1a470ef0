//! `pickwise` binary.
//!
//! Registers rules once at startup, installs the registry process-wide, then answers
//! one command. Exit code 1 means the query did not resolve to a single candidate, or
//! that `check` found malformed patterns.

mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use pickwise_descriptor::Descriptor;
use pickwise_engine::{RuleRegistry, global};

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let registry = pickwise_cli::load_registry(cli.rules.as_deref(), cli.builtins).with_context(|| match &cli.rules {
		Some(path) => format!("failed to load rules from {}", path.display()),
		None => "failed to register builtin rules".to_string(),
	})?;
	let registry = global::install(registry)?;

	match cli.command {
		Command::Resolve { family, query } => resolve(registry, &family, &query),
		Command::Explain { family, query } => explain(registry, &family, &query),
		Command::Check => Ok(check(registry)),
		Command::List { family } => {
			list(registry, family.as_deref());
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn parse_query(query: &str) -> anyhow::Result<Descriptor> {
	query
		.parse()
		.with_context(|| format!("invalid query `{query}`"))
}

fn resolve(registry: &RuleRegistry<global::Handle>, family: &str, query: &str) -> anyhow::Result<ExitCode> {
	let query = parse_query(query)?;
	match registry.resolve(family, &query) {
		Ok(handle) => {
			println!("{handle}");
			Ok(ExitCode::SUCCESS)
		}
		Err(err) => {
			eprintln!("{err}");
			for handle in err.tied() {
				eprintln!("  {handle}");
			}
			Ok(ExitCode::FAILURE)
		}
	}
}

fn explain(registry: &RuleRegistry<global::Handle>, family: &str, query: &str) -> anyhow::Result<ExitCode> {
	let query = parse_query(query)?;
	let explanation = registry.explain(family, &query);
	println!("{explanation}");
	Ok(if explanation.outcome.is_ok() {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	})
}

fn check(registry: &RuleRegistry<global::Handle>) -> ExitCode {
	let snap = registry.snapshot();
	let malformed = snap.malformed();
	for (candidate, reason) in &malformed {
		eprintln!(
			"malformed: candidate {} in family `{}` ({}): {reason}",
			candidate.id(),
			candidate.family(),
			candidate.pattern()
		);
	}
	if !malformed.is_empty() {
		eprintln!("check failed: {} malformed patterns", malformed.len());
		return ExitCode::FAILURE;
	}

	println!(
		"ok: {} families, {} candidates, {} capabilities",
		snap.family_names().len(),
		snap.len(),
		snap.capabilities().len()
	);
	let tags = snap.capabilities().tags();
	if !tags.is_empty() {
		let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
		println!("capabilities: {}", tags.join(", "));
	}
	ExitCode::SUCCESS
}

fn list(registry: &RuleRegistry<global::Handle>, only: Option<&str>) {
	let snap = registry.snapshot();
	for family in snap.family_names() {
		if only.is_some_and(|f| f != family) {
			continue;
		}
		println!("{family}");
		for candidate in snap.family(family) {
			println!(
				"  {:<4} {:<8} {:<24} {}",
				candidate.id().to_string(),
				candidate.class().to_string(),
				candidate.pattern().to_string(),
				candidate.handle()
			);
		}
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("pickwise_engine=trace,pickwise_cli=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
