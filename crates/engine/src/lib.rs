//! Type-directed rule selection.
//!
//! Candidate rules are registered per family during an initialization phase, frozen
//! into an immutable [`Snapshot`], and published through a [`RuleRegistry`]. A query
//! descriptor is resolved to the single most specific matching candidate, or to a
//! typed [`ResolutionError`].
//!
//! # Mental Model
//!
//! 1. **Build Phase:** [`RegistryBuilder`] registers capability predicates and candidate
//!    rules. Duplicate patterns and unknown capability tags are rejected here.
//! 2. **Publication:** The builder freezes into a [`Snapshot`] held by a [`RuleRegistry`].
//! 3. **Resolution:** [`RuleRegistry::resolve`] loads the current snapshot and runs
//!    `Filtering → Ranking → Resolved | Ambiguous | Unmatched` without locks.
//! 4. **Reconfiguration:** [`RuleRegistry::reconfigure`] copies the current snapshot,
//!    applies an edit, and swaps the result in atomically.
//!
//! # Precedence Contract
//!
//! 1. **Priority class:** `Full`/`Explicit` > `Partial` > `Primary`.
//! 2. **Structure:** within one class, `a` beats `b` when every query matching `a`
//!    also matches `b` but not the reverse (see [`resolve::specificity`]).
//! 3. **No tie-breaker:** remaining ties are reported as [`ResolutionError::Ambiguous`].
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`RuleRegistry`] | Atomic container publishing the current snapshot. |
//! | [`Snapshot`] | Immutable family table plus capability predicates. |
//! | [`RegistryBuilder`] | Initialization-phase registration with eager validation. |
//! | [`Candidate`] | Pattern, priority class and implementation handle. |
//! | [`CapabilityTable`] | Registered capability predicates (constraint evaluator). |
//! | [`MemoResolver`] | Per-generation cache over a registry. |

pub mod candidate;
pub mod capability;
pub mod error;
pub mod global;
pub mod index;
pub mod memo;
pub mod resolve;

pub use candidate::{Candidate, CandidateId, Family, PriorityClass};
pub use capability::{CapabilityTable, Predicate, StaticTypeFacts, TypeFacts};
pub use error::{RegistrationError, ResolutionError};
pub use index::{RegistryBuilder, RuleRegistry, Snapshot};
pub use memo::{MemoResolver, MemoStats};
pub use pickwise_descriptor::{CapabilityTag, Descriptor, Kind};
pub use resolve::explain::{CandidateReport, Explanation, Verdict};
pub use resolve::specificity::{Specificity, compare, compare_patterns};
