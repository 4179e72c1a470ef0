//! Specificity partial order.
//!
//! Priority class is compared first. Within one class, `a` is at least as specific
//! as `b` when `b` accepts the synthetic instantiation of `a` and every capability
//! `b` requires is also required by `a`. Wildcards, variables and packs therefore
//! never add specificity; only concrete structure and extra constraints do.

use pickwise_descriptor::{Descriptor, MalformedPattern, instantiate, matches};

use crate::candidate::{Candidate, CandidateId};

/// Outcome of comparing `a` against `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Specificity {
	/// `a` is strictly more specific than `b`.
	MoreSpecific,
	/// `b` is strictly more specific than `a`.
	LessSpecific,
	/// Each accepts everything the other accepts.
	Equivalent,
	/// Neither contains the other.
	Incomparable,
}

impl Specificity {
	#[inline]
	pub fn reverse(self) -> Self {
		match self {
			Self::MoreSpecific => Self::LessSpecific,
			Self::LessSpecific => Self::MoreSpecific,
			other => other,
		}
	}
}

/// A compared candidate has a malformed pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("candidate {candidate} is malformed: {reason}")]
pub struct InvalidCandidate {
	pub candidate: CandidateId,
	pub reason: MalformedPattern,
}

/// Compares two patterns structurally, ignoring priority class.
pub fn compare_patterns(a: &Descriptor, b: &Descriptor) -> Result<Specificity, MalformedPattern> {
	let a_within_b = covers(b, a)?;
	let b_within_a = covers(a, b)?;
	Ok(match (a_within_b, b_within_a) {
		(true, false) => Specificity::MoreSpecific,
		(false, true) => Specificity::LessSpecific,
		(true, true) => Specificity::Equivalent,
		(false, false) => Specificity::Incomparable,
	})
}

/// Compares two candidates: priority class first, then structure.
pub fn compare<H>(a: &Candidate<H>, b: &Candidate<H>) -> Result<Specificity, InvalidCandidate> {
	let (ra, rb) = (a.class.rank(), b.class.rank());
	if ra != rb {
		return Ok(if ra > rb {
			Specificity::MoreSpecific
		} else {
			Specificity::LessSpecific
		});
	}
	a.pattern.validate_pattern().map_err(|reason| InvalidCandidate {
		candidate: a.id,
		reason,
	})?;
	b.pattern.validate_pattern().map_err(|reason| InvalidCandidate {
		candidate: b.id,
		reason,
	})?;
	compare_patterns(&a.pattern, &b.pattern).map_err(|reason| InvalidCandidate {
		candidate: a.id,
		reason,
	})
}

/// Returns true if every query accepted by `narrow` is accepted by `wide`.
fn covers(wide: &Descriptor, narrow: &Descriptor) -> Result<bool, MalformedPattern> {
	narrow.validate_pattern()?;
	let accepted = matches(wide, &instantiate(narrow))?;
	Ok(accepted && wide.caps().is_subset(narrow.caps()))
}
