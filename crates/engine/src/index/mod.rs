#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! Candidate table infrastructure.
//!
//! # Purpose
//!
//! Builds, freezes and publishes the family-keyed candidate table.
//!
//! # Mental Model
//!
//! 1. **Build Phase:** [`RegistryBuilder`] ingests capability predicates and candidates,
//!    assigning monotonic [`crate::CandidateId`]s and rejecting duplicate patterns.
//! 2. **Freeze:** [`RegistryBuilder::build`] produces an immutable [`Snapshot`].
//! 3. **Publication:** [`RuleRegistry`] holds the current snapshot in an `ArcSwap`.
//! 4. **Extension:** [`RuleRegistry::reconfigure`] copies the current snapshot into a
//!    builder, applies an edit and publishes with CAS.
//!
//! # Concurrency
//!
//! - **Reads:** Wait-free (atomic load of current snapshot).
//! - **Writes:** Lock-free with linearizability (CAS retry loop on reconfiguration).
//!
//! # Invariants
//!
//! - Must reject an exact pattern registered twice within one family.
//!   - Enforced in: [`builder::RegistryBuilder::register_candidate`].
//!   - Tested by: `tests::test_duplicate_pattern_rejected`.
//! - Must reject patterns that require unregistered capability tags.
//!   - Enforced in: [`builder::RegistryBuilder::register_candidate`].
//!   - Tested by: `tests::test_unknown_capability_rejected`.
//! - Must keep family order equal to registration order.
//!   - Enforced in: [`builder::RegistryBuilder::build`].
//!   - Tested by: `tests::test_family_order_is_registration_order`.
//! - Must publish without lost updates.
//!   - Enforced in: [`runtime::RuleRegistry::reconfigure`] (CAS loop).
//!   - Tested by: `tests::test_concurrent_reconfigure_no_lost_updates`.

mod builder;
mod runtime;
mod snapshot;

pub use builder::RegistryBuilder;
pub use runtime::RuleRegistry;
pub use snapshot::Snapshot;
