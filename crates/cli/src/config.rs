//! TOML rule files.
//!
//! ```toml
//! [[capability]]
//! tag = "has_to_string"
//! kind = "declared"
//!
//! [facts]
//! A = ["foo", "bar"]
//!
//! [[candidate]]
//! family = "container_ops"
//! pattern = "$T*"
//! class = "partial"
//! handle = "pointer"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pickwise_descriptor::{Descriptor, ParseError};
use pickwise_engine::global::Handle;
use pickwise_engine::{Predicate, PriorityClass, RegistrationError, RegistryBuilder, StaticTypeFacts};
use serde::Deserialize;

/// Errors raised while loading a rule file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("invalid rule file: {0}")]
	Toml(#[from] toml::de::Error),
	#[error("candidate {pattern} in family `{family}` has unknown class `{class}`")]
	UnknownClass {
		family: String,
		pattern: Descriptor,
		class: String,
	},
	#[error("pattern `{pattern}` in family `{family}` does not parse: {source}")]
	Pattern {
		family: String,
		pattern: String,
		source: ParseError,
	},
	#[error(transparent)]
	Registration(#[from] RegistrationError),
}

/// How a declared capability is proven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
	/// Only tags listed on the query count.
	#[default]
	Declared,
	/// Consults the file's `[facts]` table.
	Structural,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CapabilitySpec {
	pub tag: String,
	#[serde(default)]
	pub kind: CapabilityKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CandidateSpec {
	pub family: String,
	pub pattern: Descriptor,
	/// `primary`, `partial`, `full` or `explicit`.
	pub class: String,
	pub handle: String,
}

/// Parsed contents of a rule file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuleFile {
	#[serde(default, rename = "capability")]
	pub capabilities: Vec<CapabilitySpec>,
	/// Type name to the operations it exposes.
	#[serde(default)]
	pub facts: BTreeMap<String, Vec<String>>,
	#[serde(default, rename = "candidate")]
	pub candidates: Vec<CandidateSpec>,
}

impl RuleFile {
	pub fn parse(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let file = Self::parse(&text)?;
		tracing::debug!(
			path = %path.display(),
			capabilities = file.capabilities.len(),
			candidates = file.candidates.len(),
			"loaded rule file"
		);
		Ok(file)
	}

	/// Registers capabilities, then candidates, into `builder`.
	///
	/// Returns the number of candidates registered.
	pub fn apply(&self, builder: &mut RegistryBuilder<Handle>) -> Result<usize, ConfigError> {
		let facts = self
			.facts
			.iter()
			.fold(StaticTypeFacts::new(), |facts, (ty, ops)| {
				facts.with_type(ty.as_str(), ops.iter().map(String::as_str))
			});

		for spec in &self.capabilities {
			let predicate = match spec.kind {
				CapabilityKind::Declared => Predicate::Declared,
				CapabilityKind::Structural => Predicate::structural(facts.clone()),
			};
			builder.register_capability(spec.tag.as_str(), predicate)?;
		}

		for spec in &self.candidates {
			let class = PriorityClass::from_str(&spec.class).map_err(|_| ConfigError::UnknownClass {
				family: spec.family.clone(),
				pattern: spec.pattern.clone(),
				class: spec.class.clone(),
			})?;
			builder.register_candidate(
				spec.family.as_str(),
				spec.pattern.clone(),
				class,
				Handle::from(spec.handle.as_str()),
			)?;
		}
		Ok(self.candidates.len())
	}
}
