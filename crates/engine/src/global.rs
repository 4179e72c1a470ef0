//! Process-wide registry.
//!
//! Installed once after the initialization phase; later changes go through
//! [`RuleRegistry::reconfigure`] on the installed instance.

use std::sync::{Arc, OnceLock};

use pickwise_descriptor::Descriptor;

use crate::candidate::Family;
use crate::error::{RegistrationError, ResolutionError};
use crate::index::RuleRegistry;

/// Handle type of the process-wide registry.
pub type Handle = Arc<str>;

static GLOBAL: OnceLock<RuleRegistry<Handle>> = OnceLock::new();

/// Installs the process-wide registry. A second call fails with
/// [`RegistrationError::AlreadyInstalled`] and leaves the first in place.
pub fn install(registry: RuleRegistry<Handle>) -> Result<&'static RuleRegistry<Handle>, RegistrationError> {
	let mut installed_now = false;
	let registry = GLOBAL.get_or_init(|| {
		installed_now = true;
		registry
	});
	if !installed_now {
		return Err(RegistrationError::AlreadyInstalled);
	}
	tracing::info!(
		registry = registry.label(),
		candidates = registry.snapshot().len(),
		"installed process-wide registry"
	);
	Ok(registry)
}

/// Returns the installed registry, if any.
pub fn registry() -> Option<&'static RuleRegistry<Handle>> {
	GLOBAL.get()
}

/// Resolves against the installed registry; nothing installed resolves as unmatched.
pub fn resolve(family: &str, query: &Descriptor) -> Result<Handle, ResolutionError<Handle>> {
	match registry() {
		Some(registry) => registry.resolve(family, query),
		None => Err(ResolutionError::Unmatched {
			family: Family::from(family),
			query: query.clone(),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::candidate::PriorityClass;
	use crate::index::RegistryBuilder;

	/// Single test: the global is process-wide and test order is unspecified.
	#[test]
	fn test_install_once() {
		let query: Descriptor = "int".parse().unwrap();
		assert!(matches!(
			resolve("foo", &query),
			Err(ResolutionError::Unmatched { .. })
		));

		let mut builder = RegistryBuilder::new("global");
		builder
			.register_candidate("foo", "$T".parse().unwrap(), PriorityClass::Primary, Handle::from("generic"))
			.unwrap();
		let installed = install(RuleRegistry::from_builder(builder)).unwrap();
		assert_eq!(installed.generation(), 0);
		assert_eq!(resolve("foo", &query), Ok(Handle::from("generic")));

		let again = install(RuleRegistry::new("again", Default::default()));
		assert_eq!(again.err(), Some(RegistrationError::AlreadyInstalled));
		assert!(registry().is_some_and(|r| r.label() == "global"));
	}
}
