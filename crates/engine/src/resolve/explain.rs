//! Per-candidate diagnostics for one resolution.

use std::fmt;
use std::sync::Arc;

use pickwise_descriptor::{Bindings, CapabilityTag, Descriptor, MalformedPattern};

use super::{Screen, dominator, screen};
use crate::candidate::{Candidate, CandidateId, Family, PriorityClass};
use crate::error::ResolutionError;
use crate::index::Snapshot;

/// Why a candidate was kept or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
	/// The pattern does not bind to the query.
	PatternMismatch,
	/// The query does not satisfy a required capability.
	MissingCapability(CapabilityTag),
	/// The pattern is structurally invalid.
	Malformed(MalformedPattern),
	/// A strictly more specific candidate also matched.
	Dominated { by: CandidateId },
	/// The single maximal candidate.
	Selected,
	/// One of several maximal candidates.
	Tied,
}

impl fmt::Display for Verdict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::PatternMismatch => f.write_str("pattern mismatch"),
			Self::MissingCapability(tag) => write!(f, "missing capability `{tag}`"),
			Self::Malformed(reason) => write!(f, "malformed: {reason}"),
			Self::Dominated { by } => write!(f, "dominated by {by}"),
			Self::Selected => f.write_str("selected"),
			Self::Tied => f.write_str("tied"),
		}
	}
}

#[derive(Debug, Clone)]
pub struct CandidateReport<H> {
	pub id: CandidateId,
	pub handle: H,
	pub pattern: Descriptor,
	pub class: PriorityClass,
	/// Variable bindings, present when the pattern matched.
	pub bindings: Option<Bindings>,
	pub verdict: Verdict,
}

/// Diagnostic view of a resolution: every candidate of the family plus the outcome.
#[derive(Debug, Clone)]
pub struct Explanation<H> {
	pub family: Family,
	pub query: Descriptor,
	/// Reports in registration order. Empty when the query is not concrete.
	pub candidates: Vec<CandidateReport<H>>,
	pub outcome: Result<H, ResolutionError<H>>,
}

impl<H> Explanation<H> {
	/// Returns the report with the given verdict, if any.
	pub fn selected(&self) -> Option<&CandidateReport<H>> {
		self.candidates.iter().find(|r| r.verdict == Verdict::Selected)
	}
}

pub(crate) fn explain<H: Clone>(snap: &Snapshot<H>, family: &str, query: &Descriptor) -> Explanation<H> {
	let outcome = super::resolve(snap, family, query).map(|c| c.handle.clone());
	let mut candidates = Vec::new();

	if query.is_concrete() {
		let all = snap.family(family);
		let screens: Vec<Screen> = all
			.iter()
			.map(|c| screen(snap.capabilities(), c, query))
			.collect();
		let eligible: Vec<&Arc<Candidate<H>>> = all
			.iter()
			.zip(&screens)
			.filter(|(_, s)| matches!(s, Screen::Eligible(_)))
			.map(|(c, _)| c)
			.collect();
		let dominators: Vec<Option<CandidateId>> = eligible
			.iter()
			.map(|c| dominator(c, &eligible).ok().flatten().map(|d| d.id))
			.collect();
		let undominated = dominators.iter().filter(|d| d.is_none()).count();

		let mut rank = dominators.into_iter();
		for (candidate, screen) in all.iter().zip(screens) {
			let (bindings, verdict) = match screen {
				Screen::Mismatch => (None, Verdict::PatternMismatch),
				Screen::Malformed(reason) => (None, Verdict::Malformed(reason)),
				Screen::Missing(tag) => (None, Verdict::MissingCapability(tag)),
				Screen::Eligible(bindings) => {
					let verdict = match rank.next().flatten() {
						Some(by) => Verdict::Dominated { by },
						None if undominated == 1 => Verdict::Selected,
						None => Verdict::Tied,
					};
					(Some(bindings), verdict)
				}
			};
			candidates.push(CandidateReport {
				id: candidate.id,
				handle: candidate.handle.clone(),
				pattern: candidate.pattern.clone(),
				class: candidate.class,
				bindings,
				verdict,
			});
		}
	}

	Explanation {
		family: Family::from(family),
		query: query.clone(),
		candidates,
		outcome,
	}
}

impl<H: fmt::Display> fmt::Display for Explanation<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "family `{}` for {}", self.family, self.query)?;
		for report in &self.candidates {
			write!(
				f,
				"  {:<4} {:<8} {:<24} {:<16} {}",
				report.id.to_string(),
				report.class.to_string(),
				report.pattern.to_string(),
				report.handle.to_string(),
				report.verdict
			)?;
			if let Some(bindings) = report.bindings.as_ref().filter(|b| !b.is_empty()) {
				write!(f, " [{bindings}]")?;
			}
			writeln!(f)?;
		}
		match &self.outcome {
			Ok(handle) => write!(f, "=> {handle}"),
			Err(ResolutionError::Ambiguous { candidates, .. }) => {
				f.write_str("=> ambiguous:")?;
				for handle in candidates {
					write!(f, " {handle}")?;
				}
				Ok(())
			}
			Err(ResolutionError::Unmatched { .. }) => f.write_str("=> unmatched"),
			Err(ResolutionError::MalformedPattern { candidate, reason, .. }) => {
				write!(f, "=> candidate {candidate} is malformed: {reason}")
			}
			Err(ResolutionError::NonConcreteQuery { found, .. }) => {
				write!(f, "=> query is not concrete (found `{found}`)")
			}
		}
	}
}
