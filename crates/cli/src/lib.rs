//! Rule loading for the `pickwise` binary.
//!
//! Registration happens once at startup: builtin families and/or a TOML rule file are
//! registered into a [`RegistryBuilder`], frozen, and installed process-wide.

use std::path::Path;

use pickwise_engine::global::Handle;
use pickwise_engine::{RegistryBuilder, RuleRegistry};

pub mod builtins;
pub mod config;

pub use config::{ConfigError, RuleFile};

/// Builds a registry from a rule file and/or the builtin families.
///
/// Builtins are registered when `with_builtins` is set or no rule file is given.
pub fn load_registry(rules: Option<&Path>, with_builtins: bool) -> Result<RuleRegistry<Handle>, ConfigError> {
	let mut builder = RegistryBuilder::new("pickwise");
	if with_builtins || rules.is_none() {
		builtins::register_all(&mut builder)?;
	}
	if let Some(path) = rules {
		RuleFile::load(path)?.apply(&mut builder)?;
	}
	Ok(RuleRegistry::from_builder(builder))
}
