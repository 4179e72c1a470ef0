use pickwise_descriptor::{CapabilityTag, Descriptor, MalformedPattern};

use crate::candidate::{CandidateId, Family};

/// Configuration errors, detected while registering.
///
/// Initialization must not proceed past any of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
	/// The exact pattern already exists in the family.
	#[error("duplicate pattern {pattern} in family `{family}` (already registered as {existing})")]
	DuplicatePattern {
		family: Family,
		pattern: Descriptor,
		existing: CandidateId,
	},
	/// A pattern requires a capability tag that was never registered.
	#[error("pattern {pattern} in family `{family}` requires unknown capability `{tag}`")]
	UnknownCapability {
		family: Family,
		pattern: Descriptor,
		tag: CapabilityTag,
	},
	/// A capability tag was registered twice.
	#[error("capability `{tag}` is already registered")]
	DuplicateCapability { tag: CapabilityTag },
	/// The process-wide registry was installed twice.
	#[error("process-wide registry is already installed")]
	AlreadyInstalled,
}

/// Expected, recoverable outcomes of a lookup that did not produce a winner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError<H> {
	/// No candidate matched (including an unknown family).
	#[error("no candidate in family `{family}` matches {query}")]
	Unmatched { family: Family, query: Descriptor },
	/// Several maximal candidates tie; handles are in registration order.
	#[error("{} candidates in family `{family}` tie for {query}", .candidates.len())]
	Ambiguous {
		family: Family,
		query: Descriptor,
		candidates: Vec<H>,
	},
	/// A candidate of the family has a structurally invalid pattern.
	#[error("candidate {candidate} in family `{family}` is malformed: {reason}")]
	MalformedPattern {
		family: Family,
		candidate: CandidateId,
		reason: MalformedPattern,
	},
	/// The query contains a wildcard, variable, pack or placeholder.
	#[error("query {query} is not concrete (found `{found}`)")]
	NonConcreteQuery { query: Descriptor, found: String },
}

impl<H> ResolutionError<H> {
	/// Returns the handles carried by an ambiguity, empty for other variants.
	pub fn tied(&self) -> &[H] {
		match self {
			Self::Ambiguous { candidates, .. } => candidates,
			_ => &[],
		}
	}
}
