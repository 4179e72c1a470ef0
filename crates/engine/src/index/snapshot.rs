//! Immutable published state.
//!
//! # Role
//!
//! Pure view type searched by the resolver. Contains no mutation logic.

use std::sync::Arc;

use pickwise_descriptor::{Descriptor, MalformedPattern};
use rustc_hash::FxHashMap;

use crate::candidate::{Candidate, CandidateId, Family};
use crate::capability::CapabilityTable;
use crate::error::ResolutionError;
use crate::resolve;
use crate::resolve::explain::Explanation;

/// Single source of truth for one registry generation.
#[derive(Debug)]
pub struct Snapshot<H> {
	pub(crate) families: FxHashMap<Family, Arc<[Arc<Candidate<H>>]>>,
	pub(crate) capabilities: CapabilityTable,
	pub(crate) generation: u64,
	/// Next id for monotonic assignment across reconfigurations.
	pub(crate) next_id: u32,
}

impl<H> Clone for Snapshot<H> {
	fn clone(&self) -> Self {
		Self {
			families: self.families.clone(),
			capabilities: self.capabilities.clone(),
			generation: self.generation,
			next_id: self.next_id,
		}
	}
}

impl<H> Default for Snapshot<H> {
	fn default() -> Self {
		Self {
			families: FxHashMap::default(),
			capabilities: CapabilityTable::new(),
			generation: 0,
			next_id: 0,
		}
	}
}

impl<H> Snapshot<H> {
	/// Returns the candidates of `family` in registration order (empty if unknown).
	pub fn family(&self, family: &str) -> &[Arc<Candidate<H>>] {
		self.families.get(family).map_or(&[], |c| c)
	}

	/// Returns family names in sorted order.
	pub fn family_names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.families.keys().map(|f| f.as_ref()).collect();
		names.sort_unstable();
		names
	}

	/// Looks up a candidate by id.
	pub fn get(&self, id: CandidateId) -> Option<&Arc<Candidate<H>>> {
		self.families
			.values()
			.flat_map(|candidates| candidates.iter())
			.find(|c| c.id == id)
	}

	#[inline]
	pub fn capabilities(&self) -> &CapabilityTable {
		&self.capabilities
	}

	/// Monotonic publication counter; 0 for the initial snapshot.
	#[inline]
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns the total number of candidates.
	pub fn len(&self) -> usize {
		self.families.values().map(|c| c.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.families.values().all(|c| c.is_empty())
	}

	/// Checks every pattern up front, in family-name then registration order.
	///
	/// Resolution reports the same defects lazily, one family at a time.
	pub fn malformed(&self) -> Vec<(&Arc<Candidate<H>>, MalformedPattern)> {
		self.family_names()
			.into_iter()
			.flat_map(|family| self.family(family))
			.filter_map(|c| c.pattern().validate_pattern().err().map(|reason| (c, reason)))
			.collect()
	}
}

impl<H: Clone> Snapshot<H> {
	/// Resolves `query` against `family`. See [`crate::resolve`].
	pub fn resolve(&self, family: &str, query: &Descriptor) -> Result<H, ResolutionError<H>> {
		resolve::resolve(self, family, query).map(|c| c.handle.clone())
	}

	/// Resolves and returns the winning candidate itself.
	pub fn resolve_candidate(
		&self,
		family: &str,
		query: &Descriptor,
	) -> Result<&Arc<Candidate<H>>, ResolutionError<H>> {
		resolve::resolve(self, family, query)
	}

	/// Reports why each candidate of `family` was kept or rejected.
	pub fn explain(&self, family: &str, query: &Descriptor) -> Explanation<H> {
		resolve::explain::explain(self, family, query)
	}
}
