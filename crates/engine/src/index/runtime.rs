//! Registry container with atomic publication.
//!
//! # Role
//!
//! Thread-safe entrypoint for resolving against and reconfiguring a candidate table.
//! Owns the CAS-based publication loop.
//!
//! # Invariants
//!
//! - Concurrent reconfigurations must be linearizable (see
//!   `tests::test_concurrent_reconfigure_no_lost_updates`).
//! - A resolution observes exactly one generation.

use std::sync::Arc;

use arc_swap::ArcSwap;
use pickwise_descriptor::Descriptor;

use super::builder::RegistryBuilder;
use super::snapshot::Snapshot;
use crate::error::{RegistrationError, ResolutionError};
use crate::resolve::explain::Explanation;

/// Publishes the current [`Snapshot`] of a candidate table.
pub struct RuleRegistry<H> {
	label: &'static str,
	snap: ArcSwap<Snapshot<H>>,
}

impl<H> RuleRegistry<H> {
	/// Publishes `snap` as the initial generation.
	pub fn new(label: &'static str, snap: Snapshot<H>) -> Self {
		Self {
			label,
			snap: ArcSwap::from_pointee(snap),
		}
	}

	/// Freezes `builder` and publishes it.
	pub fn from_builder(builder: RegistryBuilder<H>) -> Self {
		let label = builder.label();
		Self::new(label, builder.build())
	}

	/// Returns the current snapshot, pinned for the caller's use.
	#[inline]
	pub fn snapshot(&self) -> Arc<Snapshot<H>> {
		self.snap.load_full()
	}

	#[inline]
	pub fn generation(&self) -> u64 {
		self.snap.load().generation()
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Copies the current snapshot, applies `edit` and publishes the result.
	///
	/// `edit` may run more than once if another reconfiguration wins the race; it must
	/// not have side effects beyond the builder. An error from `edit` leaves the
	/// published snapshot untouched. Returns the published generation.
	pub fn reconfigure<F>(&self, mut edit: F) -> Result<u64, RegistrationError>
	where
		F: FnMut(&mut RegistryBuilder<H>) -> Result<(), RegistrationError>,
	{
		loop {
			let old = self.snap.load_full();
			let mut builder = RegistryBuilder::from_snapshot(self.label, &old);
			edit(&mut builder)?;
			let next = Arc::new(builder.build());
			let generation = next.generation();
			let candidates = next.len();

			let prev = self.snap.compare_and_swap(&old, next);
			if Arc::ptr_eq(&prev, &old) {
				tracing::info!(
					registry = self.label,
					generation,
					candidates,
					"published registry generation"
				);
				return Ok(generation);
			}
			tracing::debug!(registry = self.label, "reconfigure lost CAS race; retrying");
		}
	}
}

impl<H: Clone> RuleRegistry<H> {
	/// Resolves `query` in `family` against the current generation.
	pub fn resolve(&self, family: &str, query: &Descriptor) -> Result<H, ResolutionError<H>> {
		self.snap.load().resolve(family, query)
	}

	/// Explains a resolution against the current generation.
	pub fn explain(&self, family: &str, query: &Descriptor) -> Explanation<H> {
		self.snap.load().explain(family, query)
	}
}
