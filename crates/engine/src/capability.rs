//! Constraint evaluator.
//!
//! # Role
//!
//! Holds the registered capability predicates and answers "does this concrete
//! descriptor satisfy tag X". A descriptor satisfies a tag if it declares it, or if
//! the tag's predicate proves it.
//!
//! # Invariants
//!
//! - Descriptors are never mutated.
//! - Unknown tags are rejected when a pattern is registered, so resolution never
//!   consults an unregistered predicate.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use pickwise_descriptor::{CapabilityTag, Descriptor};
use rustc_hash::FxHashMap;

use crate::error::RegistrationError;

/// External source of structural facts about types.
pub trait TypeFacts: Send + Sync {
	/// Returns true if `descriptor` exposes the operation named by `tag`.
	fn provides(&self, descriptor: &Descriptor, tag: &CapabilityTag) -> bool;
}

/// How a capability tag is proven.
#[derive(Clone)]
pub enum Predicate {
	/// Only the descriptor's declared tags count.
	Declared,
	/// Asks a type-facts oracle.
	Structural(Arc<dyn TypeFacts>),
	/// Arbitrary check over the descriptor.
	Custom(Arc<dyn Fn(&Descriptor) -> bool + Send + Sync>),
}

impl Predicate {
	pub fn structural(facts: impl TypeFacts + 'static) -> Self {
		Self::Structural(Arc::new(facts))
	}

	pub fn custom(check: impl Fn(&Descriptor) -> bool + Send + Sync + 'static) -> Self {
		Self::Custom(Arc::new(check))
	}

	fn proves(&self, descriptor: &Descriptor, tag: &CapabilityTag) -> bool {
		match self {
			Self::Declared => false,
			Self::Structural(facts) => facts.provides(descriptor, tag),
			Self::Custom(check) => check(descriptor),
		}
	}
}

impl fmt::Debug for Predicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Declared => f.write_str("Declared"),
			Self::Structural(_) => f.write_str("Structural(..)"),
			Self::Custom(_) => f.write_str("Custom(..)"),
		}
	}
}

/// Error returned when a tag has no registered predicate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability `{0}`")]
pub struct UnknownCapability(pub CapabilityTag);

/// Registered capability predicates.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
	predicates: FxHashMap<CapabilityTag, Predicate>,
}

impl CapabilityTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a predicate for `tag`.
	pub fn register(
		&mut self,
		tag: impl Into<CapabilityTag>,
		predicate: Predicate,
	) -> Result<(), RegistrationError> {
		let tag = tag.into();
		if self.predicates.contains_key(&tag) {
			return Err(RegistrationError::DuplicateCapability { tag });
		}
		tracing::trace!(tag = %tag, ?predicate, "registered capability");
		self.predicates.insert(tag, predicate);
		Ok(())
	}

	#[inline]
	pub fn contains(&self, tag: &str) -> bool {
		self.predicates.contains_key(tag)
	}

	pub fn len(&self) -> usize {
		self.predicates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.predicates.is_empty()
	}

	/// Returns registered tags in sorted order.
	pub fn tags(&self) -> Vec<&CapabilityTag> {
		let mut tags: Vec<_> = self.predicates.keys().collect();
		tags.sort();
		tags
	}

	/// Returns true if `concrete` satisfies `tag`.
	pub fn satisfies(&self, concrete: &Descriptor, tag: &CapabilityTag) -> Result<bool, UnknownCapability> {
		let predicate = self
			.predicates
			.get(tag)
			.ok_or_else(|| UnknownCapability(tag.clone()))?;
		Ok(concrete.declares(tag.as_str()) || predicate.proves(concrete, tag))
	}

	/// Returns the first required tag (in sorted order) that `concrete` does not satisfy.
	///
	/// An unregistered tag counts as unsatisfied.
	pub fn first_unsatisfied<'t>(
		&self,
		concrete: &Descriptor,
		required: &'t BTreeSet<CapabilityTag>,
	) -> Option<&'t CapabilityTag> {
		required
			.iter()
			.find(|tag| !self.satisfies(concrete, tag).unwrap_or(false))
	}
}

/// Table of types to the operations they expose.
///
/// A descriptor provides a tag when it has at least one parameter and the subject
/// type of every parameter (pointer, sequence and pack layers stripped) lists it.
#[derive(Debug, Clone, Default)]
pub struct StaticTypeFacts {
	operations: FxHashMap<Arc<str>, BTreeSet<CapabilityTag>>,
}

impl StaticTypeFacts {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records that `type_name` exposes `ops`.
	pub fn insert<I, T>(&mut self, type_name: impl Into<Arc<str>>, ops: I)
	where
		I: IntoIterator<Item = T>,
		T: Into<CapabilityTag>,
	{
		self.operations
			.entry(type_name.into())
			.or_default()
			.extend(ops.into_iter().map(Into::into));
	}

	pub fn with_type<I, T>(mut self, type_name: impl Into<Arc<str>>, ops: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<CapabilityTag>,
	{
		self.insert(type_name, ops);
		self
	}

	pub fn exposes(&self, type_name: &str, tag: &str) -> bool {
		self.operations
			.get(type_name)
			.is_some_and(|ops| ops.contains(tag))
	}
}

impl TypeFacts for StaticTypeFacts {
	fn provides(&self, descriptor: &Descriptor, tag: &CapabilityTag) -> bool {
		let params = descriptor.params();
		!params.is_empty()
			&& params.iter().all(|kind| {
				kind.subject()
					.type_name()
					.is_some_and(|name| self.exposes(name, tag.as_str()))
			})
	}
}
