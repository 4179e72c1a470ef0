//! Resolution state machine.
//!
//! # Role
//!
//! Selects the single most specific candidate of a family for a concrete query.
//!
//! # Mental Model
//!
//! ```text
//! Filtering ──► Ranking ──► Resolved
//!     │             └─────► Ambiguous
//!     └───────────────────► Unmatched
//! ```
//!
//! 1. **Filtering:** keep candidates whose pattern binds to the query and whose
//!    required capabilities the query satisfies. A malformed pattern aborts with
//!    [`ResolutionError::MalformedPattern`].
//! 2. **Ranking:** keep the maximal candidates under [`specificity::compare`].
//!
//! # Invariants
//!
//! - A winner matches the query and no other filtered candidate is strictly more specific.
//!   - Tested by: `tests::prop_winner_is_undominated`.
//! - Ambiguous handles are reported in registration order.
//!   - Tested by: `tests::test_incomparable_partials_are_ambiguous`.
//! - Results depend only on the snapshot and the query.
//!   - Tested by: `tests::prop_resolution_is_deterministic`.

use std::sync::Arc;

use pickwise_descriptor::{Bindings, CapabilityTag, Descriptor, MalformedPattern, match_bindings};

use crate::candidate::{Candidate, Family};
use crate::capability::CapabilityTable;
use crate::error::ResolutionError;
use crate::index::Snapshot;

pub mod explain;
pub mod specificity;

#[cfg(test)]
mod tests;

use specificity::{InvalidCandidate, Specificity};

/// Filtering outcome for one candidate.
pub(crate) enum Screen {
	Eligible(Bindings),
	Mismatch,
	Missing(CapabilityTag),
	Malformed(MalformedPattern),
}

pub(crate) fn screen<H>(caps: &CapabilityTable, candidate: &Candidate<H>, query: &Descriptor) -> Screen {
	match match_bindings(&candidate.pattern, query) {
		Err(reason) => Screen::Malformed(reason),
		Ok(None) => Screen::Mismatch,
		Ok(Some(bindings)) => match caps.first_unsatisfied(query, candidate.pattern.caps()) {
			Some(tag) => Screen::Missing(tag.clone()),
			None => Screen::Eligible(bindings),
		},
	}
}

/// Returns the first other candidate strictly more specific than `candidate`.
pub(crate) fn dominator<'a, H>(
	candidate: &Candidate<H>,
	eligible: &[&'a Arc<Candidate<H>>],
) -> Result<Option<&'a Arc<Candidate<H>>>, InvalidCandidate> {
	for &other in eligible {
		if other.id == candidate.id {
			continue;
		}
		if specificity::compare(other, candidate)? == Specificity::MoreSpecific {
			return Ok(Some(other));
		}
	}
	Ok(None)
}

/// Returns the undominated candidates in registration order.
fn maximal<'a, H>(
	eligible: &[&'a Arc<Candidate<H>>],
) -> Result<Vec<&'a Arc<Candidate<H>>>, InvalidCandidate> {
	let mut out = Vec::new();
	for &candidate in eligible {
		if dominator(candidate, eligible)?.is_none() {
			out.push(candidate);
		}
	}
	Ok(out)
}

pub(crate) fn resolve<'s, H: Clone>(
	snap: &'s Snapshot<H>,
	family: &str,
	query: &Descriptor,
) -> Result<&'s Arc<Candidate<H>>, ResolutionError<H>> {
	let _span = tracing::trace_span!("resolve", family, %query).entered();

	if let Some(open) = query.first_open_param() {
		return Err(ResolutionError::NonConcreteQuery {
			query: query.clone(),
			found: open.to_string(),
		});
	}

	let mut eligible = Vec::new();
	for candidate in snap.family(family) {
		match screen(snap.capabilities(), candidate, query) {
			Screen::Eligible(_) => eligible.push(candidate),
			Screen::Malformed(reason) => {
				tracing::warn!(candidate = %candidate.id, %reason, "malformed candidate pattern");
				return Err(ResolutionError::MalformedPattern {
					family: candidate.family.clone(),
					candidate: candidate.id,
					reason,
				});
			}
			Screen::Mismatch | Screen::Missing(_) => {}
		}
	}
	tracing::trace!(eligible = eligible.len(), "filtered");

	if eligible.is_empty() {
		tracing::debug!("unmatched");
		return Err(ResolutionError::Unmatched {
			family: Family::from(family),
			query: query.clone(),
		});
	}

	let mut best = maximal(&eligible).map_err(|e| ResolutionError::MalformedPattern {
		family: Family::from(family),
		candidate: e.candidate,
		reason: e.reason,
	})?;
	// A cycle in the order leaves nothing maximal; report every filtered candidate.
	if best.is_empty() {
		best = eligible;
	}
	tracing::trace!(maximal = best.len(), "ranked");

	match best.as_slice() {
		[winner] => {
			tracing::debug!(winner = %winner.id, pattern = %winner.pattern, "resolved");
			Ok(*winner)
		}
		tied => {
			tracing::warn!(tied = tied.len(), "ambiguous resolution");
			Err(ResolutionError::Ambiguous {
				family: Family::from(family),
				query: query.clone(),
				candidates: tied.iter().map(|c| c.handle.clone()).collect(),
			})
		}
	}
}
