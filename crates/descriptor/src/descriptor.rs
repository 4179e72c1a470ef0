use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::kind::Kind;
use crate::matching::{self, MalformedPattern};
use crate::parse::{self, ParseError};

/// Name of a capability predicate (for example `has_to_string`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityTag(Arc<str>);

impl CapabilityTag {
	pub fn new(name: impl Into<Arc<str>>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for CapabilityTag {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for CapabilityTag {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl fmt::Display for CapabilityTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Immutable structural shape: ordered parameter kinds plus capability tags.
///
/// On a query the tags are the capabilities the shape declares. On a pattern
/// they are the capabilities a matching query must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Descriptor {
	params: SmallVec<[Kind; 4]>,
	caps: BTreeSet<CapabilityTag>,
}

impl Descriptor {
	/// Creates a descriptor with no capability tags.
	pub fn new(params: impl IntoIterator<Item = Kind>) -> Self {
		Self {
			params: params.into_iter().collect(),
			caps: BTreeSet::new(),
		}
	}

	/// Returns a copy with the given tags added.
	pub fn with_caps<I, T>(mut self, caps: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<CapabilityTag>,
	{
		self.caps.extend(caps.into_iter().map(Into::into));
		self
	}

	#[inline]
	pub fn params(&self) -> &[Kind] {
		&self.params
	}

	#[inline]
	pub fn caps(&self) -> &BTreeSet<CapabilityTag> {
		&self.caps
	}

	#[inline]
	pub fn arity(&self) -> usize {
		self.params.len()
	}

	/// Returns true if the tag is in the declared set.
	#[inline]
	pub fn declares(&self, tag: &str) -> bool {
		self.caps.contains(tag)
	}

	/// Returns true if no parameter contains a slot or placeholder.
	pub fn is_concrete(&self) -> bool {
		self.params.iter().all(Kind::is_concrete)
	}

	/// Returns the first parameter that is not concrete, if any.
	pub fn first_open_param(&self) -> Option<&Kind> {
		self.params.iter().find(|k| !k.is_concrete())
	}

	/// Checks pattern structure without matching anything.
	pub fn validate_pattern(&self) -> Result<(), MalformedPattern> {
		matching::validate(self)
	}

	/// Returns true if `concrete` binds to this pattern. Capability tags are not checked.
	pub fn matches(&self, concrete: &Descriptor) -> Result<bool, MalformedPattern> {
		matching::matches(self, concrete)
	}
}

impl FromStr for Descriptor {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse::parse_descriptor(s)
	}
}

impl fmt::Display for Descriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("(")?;
		for (i, kind) in self.params.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{kind}")?;
		}
		f.write_str(")")?;
		if !self.caps.is_empty() {
			f.write_str(" {")?;
			for (i, tag) in self.caps.iter().enumerate() {
				if i > 0 {
					f.write_str(", ")?;
				}
				write!(f, "{tag}")?;
			}
			f.write_str("}")?;
		}
		Ok(())
	}
}

#[cfg(feature = "serde")]
impl serde::Serialize for Descriptor {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Descriptor {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
		text.parse().map_err(serde::de::Error::custom)
	}
}
