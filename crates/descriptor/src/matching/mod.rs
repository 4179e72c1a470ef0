//! Positional pattern matching with consistent variable binding.
//!
//! # Role
//!
//! Decides whether a concrete descriptor binds to a pattern descriptor and builds
//! the synthetic instantiations used for specificity comparison. Capability tags
//! are ignored here; they belong to the constraint evaluator.
//!
//! # Invariants
//!
//! - Every occurrence of a variable within one pattern binds to the same concrete kind.
//! - A pack is only valid as the last top-level parameter.
//! - Wildcards, variables and packs never match a synthetic pack as a single parameter.
//! - Structural defects surface as [`MalformedPattern`], never as a panic.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::descriptor::Descriptor;
use crate::kind::Kind;

#[cfg(test)]
mod tests;

/// Structural defect in a pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedPattern {
	/// A pack appears before the last top-level parameter.
	#[error("variadic pack at parameter {position} is not the last parameter")]
	PackNotLast { position: usize },
	/// A pack appears inside another kind.
	#[error("variadic pack nested inside `{within}`")]
	NestedPack { within: String },
	/// A synthetic placeholder appears in a registered pattern.
	#[error("synthetic placeholder #{id} cannot appear in a pattern")]
	SyntheticKind { id: u32 },
}

/// Variable bindings produced by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<Arc<str>, Kind>);

impl Bindings {
	pub fn get(&self, var: &str) -> Option<&Kind> {
		self.0.get(var)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates bindings in variable-name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Kind)> + '_ {
		self.0.iter().map(|(k, v)| (k.as_ref(), v))
	}
}

impl fmt::Display for Bindings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, (var, kind)) in self.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "${var} = {kind}")?;
		}
		Ok(())
	}
}

/// Checks pattern structure.
pub fn validate(pattern: &Descriptor) -> Result<(), MalformedPattern> {
	let params = pattern.params();
	for (position, kind) in params.iter().enumerate() {
		match kind {
			Kind::Pack(elem) => {
				if position + 1 != params.len() {
					return Err(MalformedPattern::PackNotLast { position });
				}
				validate_nested(elem, kind)?;
			}
			other => validate_nested(other, other)?,
		}
	}
	Ok(())
}

fn validate_nested(kind: &Kind, within: &Kind) -> Result<(), MalformedPattern> {
	match kind {
		Kind::Pack(_) => Err(MalformedPattern::NestedPack {
			within: within.to_string(),
		}),
		Kind::Fresh(id) => Err(MalformedPattern::SyntheticKind { id: *id }),
		Kind::Pointer(inner) | Kind::Sequence(inner) => validate_nested(inner, within),
		Kind::Named { args, .. } => args.iter().try_for_each(|a| validate_nested(a, within)),
		Kind::Primitive(_) | Kind::Value(_) | Kind::Wildcard | Kind::Var(_) => Ok(()),
	}
}

/// Returns true if `concrete` binds to `pattern`.
pub fn matches(pattern: &Descriptor, concrete: &Descriptor) -> Result<bool, MalformedPattern> {
	Ok(match_bindings(pattern, concrete)?.is_some())
}

/// Matches `concrete` against `pattern`, returning the variable bindings on success.
pub fn match_bindings(
	pattern: &Descriptor,
	concrete: &Descriptor,
) -> Result<Option<Bindings>, MalformedPattern> {
	validate(pattern)?;
	let mut matcher = Matcher::default();
	if matcher.params(pattern.params(), concrete.params()) {
		Ok(Some(Bindings(matcher.bindings)))
	} else {
		Ok(None)
	}
}

#[derive(Default)]
struct Matcher {
	bindings: BTreeMap<Arc<str>, Kind>,
}

impl Matcher {
	fn params(&mut self, pattern: &[Kind], concrete: &[Kind]) -> bool {
		let (fixed, pack) = match pattern.split_last() {
			Some((Kind::Pack(elem), fixed)) => (fixed, Some(elem.as_ref())),
			_ => (pattern, None),
		};

		match pack {
			None if concrete.len() != fixed.len() => return false,
			Some(_) if concrete.len() < fixed.len() => return false,
			_ => {}
		}

		if !fixed.iter().zip(concrete).all(|(p, c)| self.kind(p, c)) {
			return false;
		}

		let Some(elem) = pack else { return true };
		concrete[fixed.len()..].iter().all(|c| match c {
			Kind::Pack(inner) => self.kind(elem, inner),
			other => self.kind(elem, other),
		})
	}

	fn kind(&mut self, pattern: &Kind, concrete: &Kind) -> bool {
		if matches!(concrete, Kind::Pack(_)) {
			return false;
		}
		match (pattern, concrete) {
			(Kind::Wildcard, _) => true,
			(Kind::Var(name), c) => match self.bindings.get(name) {
				Some(bound) => bound == c,
				None => {
					self.bindings.insert(name.clone(), c.clone());
					true
				}
			},
			(Kind::Primitive(a), Kind::Primitive(b)) => a == b,
			(Kind::Value(a), Kind::Value(b)) => a == b,
			(Kind::Pointer(p), Kind::Pointer(c)) | (Kind::Sequence(p), Kind::Sequence(c)) => {
				self.kind(p, c)
			}
			(
				Kind::Named { name: pn, args: pa },
				Kind::Named { name: cn, args: ca },
			) => pn == cn && pa.len() == ca.len() && pa.iter().zip(ca).all(|(p, c)| self.kind(p, c)),
			_ => false,
		}
	}
}

/// Instantiates a pattern into a synthetic concrete descriptor.
///
/// Each wildcard becomes a distinct [`Kind::Fresh`], each variable becomes one
/// fresh kind shared by all of its occurrences, and required capability tags become
/// declared tags. A trailing pack becomes two synthetic packs instantiated
/// independently, so `$T...` (one shared kind) stays distinguishable from `_...`.
pub fn instantiate(pattern: &Descriptor) -> Descriptor {
	let mut synth = Synth::default();
	let mut params: Vec<Kind> = Vec::with_capacity(pattern.arity() + 1);
	for kind in pattern.params() {
		match kind {
			Kind::Pack(elem) => {
				params.push(Kind::pack(synth.kind(elem)));
				params.push(Kind::pack(synth.kind(elem)));
			}
			other => params.push(synth.kind(other)),
		}
	}
	Descriptor::new(params).with_caps(pattern.caps().iter().cloned())
}

#[derive(Default)]
struct Synth {
	next: u32,
	vars: FxHashMap<Arc<str>, u32>,
}

impl Synth {
	fn fresh(&mut self) -> u32 {
		let id = self.next;
		self.next += 1;
		id
	}

	fn kind(&mut self, kind: &Kind) -> Kind {
		match kind {
			Kind::Wildcard => Kind::Fresh(self.fresh()),
			Kind::Var(name) => {
				if let Some(&id) = self.vars.get(name) {
					return Kind::Fresh(id);
				}
				let id = self.fresh();
				self.vars.insert(name.clone(), id);
				Kind::Fresh(id)
			}
			Kind::Pack(elem) => Kind::Pack(Box::new(self.kind(elem))),
			Kind::Pointer(inner) => Kind::Pointer(Box::new(self.kind(inner))),
			Kind::Sequence(inner) => Kind::Sequence(Box::new(self.kind(inner))),
			Kind::Named { name, args } => Kind::Named {
				name: name.clone(),
				args: args.iter().map(|a| self.kind(a)).collect(),
			},
			Kind::Primitive(_) | Kind::Value(_) | Kind::Fresh(_) => kind.clone(),
		}
	}
}
