use std::sync::Arc;

use pickwise_descriptor::Descriptor;

/// Name of a rule family (all overloads or specializations of one template).
pub type Family = Arc<str>;

/// Declared priority class of a candidate.
///
/// Compared before structure: a higher rank is always more specific.
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	PartialOrd,
	Ord,
	strum::Display,
	strum::EnumString,
	strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum PriorityClass {
	/// Most general template.
	Primary,
	/// Partial specialization.
	Partial,
	/// Full (explicit) specialization.
	Full,
	/// Non-template overload.
	Explicit,
}

impl PriorityClass {
	/// Returns the precedence rank (higher is more specific).
	///
	/// `Full` and `Explicit` share the top rank; a tie between them falls back to
	/// structural comparison.
	pub const fn rank(self) -> u8 {
		match self {
			Self::Primary => 0,
			Self::Partial => 1,
			Self::Full | Self::Explicit => 2,
		}
	}
}

/// Registration ordinal, unique across a registry and stable across snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(pub u32);

impl std::fmt::Display for CandidateId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// A registered rule: pattern, priority class and opaque implementation handle.
#[derive(Debug, Clone)]
pub struct Candidate<H> {
	pub(crate) id: CandidateId,
	pub(crate) family: Family,
	pub(crate) pattern: Descriptor,
	pub(crate) class: PriorityClass,
	pub(crate) handle: H,
}

impl<H> Candidate<H> {
	/// Creates a detached candidate. Registries assign their own ids on registration.
	pub fn new(
		id: CandidateId,
		family: impl Into<Family>,
		pattern: Descriptor,
		class: PriorityClass,
		handle: H,
	) -> Self {
		Self {
			id,
			family: family.into(),
			pattern,
			class,
			handle,
		}
	}

	#[inline]
	pub fn id(&self) -> CandidateId {
		self.id
	}

	#[inline]
	pub fn family(&self) -> &str {
		&self.family
	}

	#[inline]
	pub fn pattern(&self) -> &Descriptor {
		&self.pattern
	}

	#[inline]
	pub fn class(&self) -> PriorityClass {
		self.class
	}

	#[inline]
	pub fn handle(&self) -> &H {
		&self.handle
	}
}
