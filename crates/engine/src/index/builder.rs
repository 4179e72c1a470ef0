use std::sync::Arc;

use pickwise_descriptor::Descriptor;
use rustc_hash::FxHashMap;

use super::snapshot::Snapshot;
use crate::candidate::{Candidate, CandidateId, Family, PriorityClass};
use crate::capability::{CapabilityTable, Predicate};
use crate::error::RegistrationError;

/// Per-family staging area.
struct FamilyBuild<H> {
	candidates: Vec<Arc<Candidate<H>>>,
	by_pattern: FxHashMap<Descriptor, CandidateId>,
}

impl<H> Default for FamilyBuild<H> {
	fn default() -> Self {
		Self {
			candidates: Vec::new(),
			by_pattern: FxHashMap::default(),
		}
	}
}

/// Initialization-phase registration for a [`Snapshot`].
pub struct RegistryBuilder<H> {
	label: &'static str,
	families: FxHashMap<Family, FamilyBuild<H>>,
	capabilities: CapabilityTable,
	next_id: u32,
	generation: u64,
}

impl<H> RegistryBuilder<H> {
	/// Creates an empty builder; `label` names the registry in diagnostics.
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			families: FxHashMap::default(),
			capabilities: CapabilityTable::new(),
			next_id: 0,
			generation: 0,
		}
	}

	/// Starts from the contents of an existing snapshot.
	///
	/// Ids continue from the snapshot's counter and the built snapshot gets the next
	/// generation.
	pub fn from_snapshot(label: &'static str, snap: &Snapshot<H>) -> Self {
		let families = snap
			.families
			.iter()
			.map(|(name, candidates)| {
				let by_pattern = candidates
					.iter()
					.map(|c| (c.pattern.clone(), c.id))
					.collect();
				let build = FamilyBuild {
					candidates: candidates.to_vec(),
					by_pattern,
				};
				(name.clone(), build)
			})
			.collect();
		Self {
			label,
			families,
			capabilities: snap.capabilities.clone(),
			next_id: snap.next_id,
			generation: snap.generation + 1,
		}
	}

	/// Registers a capability predicate.
	pub fn register_capability(
		&mut self,
		tag: impl Into<pickwise_descriptor::CapabilityTag>,
		predicate: Predicate,
	) -> Result<(), RegistrationError> {
		self.capabilities.register(tag, predicate)
	}

	/// Registers a candidate rule in `family`.
	///
	/// The pattern's capability tags must already be registered. Pattern structure is
	/// not validated here; a malformed pattern only fails resolutions of its own family.
	pub fn register_candidate(
		&mut self,
		family: impl Into<Family>,
		pattern: Descriptor,
		class: PriorityClass,
		handle: H,
	) -> Result<CandidateId, RegistrationError> {
		let family = family.into();

		if let Some(tag) = pattern.caps().iter().find(|t| !self.capabilities.contains(t.as_str())) {
			return Err(RegistrationError::UnknownCapability {
				family,
				tag: tag.clone(),
				pattern,
			});
		}

		let slot = self.families.entry(family.clone()).or_default();
		if let Some(&existing) = slot.by_pattern.get(&pattern) {
			return Err(RegistrationError::DuplicatePattern {
				family,
				pattern,
				existing,
			});
		}

		let id = CandidateId(self.next_id);
		self.next_id += 1;
		tracing::trace!(
			registry = self.label,
			family = %family,
			pattern = %pattern,
			%class,
			%id,
			"registered candidate"
		);
		slot.by_pattern.insert(pattern.clone(), id);
		slot.candidates.push(Arc::new(Candidate {
			id,
			family,
			pattern,
			class,
			handle,
		}));
		Ok(id)
	}

	/// Returns the number of candidates registered so far.
	pub fn len(&self) -> usize {
		self.families.values().map(|f| f.candidates.len()).sum()
	}

	/// Returns true if no candidates have been registered so far.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Freezes the builder into an immutable snapshot.
	pub fn build(self) -> Snapshot<H> {
		let families = self
			.families
			.into_iter()
			.map(|(name, build)| (name, Arc::from(build.candidates)))
			.collect();
		Snapshot {
			families,
			capabilities: self.capabilities,
			generation: self.generation,
			next_id: self.next_id,
		}
	}
}
