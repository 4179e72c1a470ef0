use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::explain::Verdict;
use super::specificity::{Specificity, compare};
use crate::candidate::{CandidateId, PriorityClass};
use crate::capability::{Predicate, StaticTypeFacts};
use crate::error::ResolutionError;
use crate::index::{RegistryBuilder, Snapshot};
use pickwise_descriptor::{Descriptor, MalformedPattern};

fn d(s: &str) -> Descriptor {
	s.parse().unwrap()
}

fn snapshot(rules: &[(&str, &str, PriorityClass, &'static str)]) -> Snapshot<&'static str> {
	let mut builder = RegistryBuilder::new("test");
	builder
		.register_capability("has_to_string", Predicate::Declared)
		.unwrap();
	let facts = StaticTypeFacts::new()
		.with_type("A", ["foo", "bar"])
		.with_type("B", ["foo"]);
	builder
		.register_capability("foo", Predicate::structural(facts.clone()))
		.unwrap();
	builder
		.register_capability("bar", Predicate::structural(facts))
		.unwrap();
	for &(family, pattern, class, handle) in rules {
		builder
			.register_candidate(family, d(pattern), class, handle)
			.unwrap();
	}
	builder.build()
}

fn container_ops() -> Snapshot<&'static str> {
	snapshot(&[
		("container_ops", "$T", PriorityClass::Primary, "generic"),
		("container_ops", "$T*", PriorityClass::Partial, "pointer"),
		("container_ops", "void*", PriorityClass::Full, "void_ptr"),
	])
}

#[rstest]
#[case("void*", "void_ptr")]
#[case("int*", "pointer")]
#[case("int**", "pointer")]
#[case("int", "generic")]
#[case("Vector<int>", "generic")]
fn test_container_ops(#[case] query: &str, #[case] expected: &str) {
	assert_eq!(container_ops().resolve("container_ops", &d(query)), Ok(expected));
}

/// Two partial specializations that each fix a different position tie.
#[test]
fn test_incomparable_partials_are_ambiguous() {
	let snap = snapshot(&[
		("pair", "($A, $B)", PriorityClass::Primary, "primary"),
		("pair", "($T, int)", PriorityClass::Partial, "left"),
		("pair", "(int, $T)", PriorityClass::Partial, "right"),
	]);

	let err = snap.resolve("pair", &d("int, int")).unwrap_err();
	assert_eq!(err.tied(), &["left", "right"]);
	assert!(matches!(err, ResolutionError::Ambiguous { .. }));

	assert_eq!(snap.resolve("pair", &d("char, int")), Ok("left"));
	assert_eq!(snap.resolve("pair", &d("int, char")), Ok("right"));
	assert_eq!(snap.resolve("pair", &d("char, char")), Ok("primary"));
}

#[test]
fn test_unknown_family_is_unmatched() {
	let snap = container_ops();
	assert_eq!(
		snap.resolve("nope", &d("int")),
		Err(ResolutionError::Unmatched {
			family: "nope".into(),
			query: d("int"),
		})
	);
}

/// A declared capability gates the only candidate.
#[test]
fn test_capability_gate() {
	let snap = snapshot(&[(
		"serializers",
		"_ {has_to_string}",
		PriorityClass::Partial,
		"to_string",
	)]);
	assert!(matches!(
		snap.resolve("serializers", &d("Point")),
		Err(ResolutionError::Unmatched { .. })
	));
	assert_eq!(
		snap.resolve("serializers", &d("Point {has_to_string}")),
		Ok("to_string")
	);
}

/// Structural capabilities come from type facts; overlapping concepts tie.
#[test]
fn test_concepts_from_type_facts() {
	let snap = snapshot(&[
		("concepts", "_ {foo}", PriorityClass::Partial, "foo_concept"),
		("concepts", "_ {bar}", PriorityClass::Partial, "bar_concept"),
		("concepts", "_ {bar, foo}", PriorityClass::Partial, "both"),
	]);
	assert_eq!(snap.resolve("concepts", &d("A")), Ok("both"));
	assert_eq!(snap.resolve("concepts", &d("B")), Ok("foo_concept"));
	assert!(matches!(
		snap.resolve("concepts", &d("int")),
		Err(ResolutionError::Unmatched { .. })
	));
}

#[test]
fn test_concepts_without_conjunction_are_ambiguous() {
	let snap = snapshot(&[
		("concepts", "_ {foo}", PriorityClass::Partial, "foo_concept"),
		("concepts", "_ {bar}", PriorityClass::Partial, "bar_concept"),
	]);
	assert_eq!(
		snap.resolve("concepts", &d("A")).unwrap_err().tied(),
		&["foo_concept", "bar_concept"]
	);
}

/// A primary template never beats a matching full specialization.
#[rstest]
#[case("factorial<1>", "base")]
#[case("factorial<5>", "recursive")]
fn test_value_parameters(#[case] query: &str, #[case] expected: &str) {
	let snap = snapshot(&[
		("factorial", "factorial<$N>", PriorityClass::Primary, "recursive"),
		("factorial", "factorial<1>", PriorityClass::Full, "base"),
	]);
	assert_eq!(snap.resolve("factorial", &d(query)), Ok(expected));
}

#[rstest]
#[case("()", "same_type")]
#[case("int, int, int", "same_type")]
#[case("int, char", "any")]
#[case("int", "same_type")]
fn test_variadic_sum(#[case] query: &str, #[case] expected: &str) {
	let snap = snapshot(&[
		("sum", "_...", PriorityClass::Primary, "any"),
		("sum", "$T...", PriorityClass::Primary, "same_type"),
	]);
	assert_eq!(snap.resolve("sum", &d(query)), Ok(expected));
}

/// Full specializations and explicit overloads share a rank.
#[test]
fn test_full_and_explicit_share_rank() {
	let snap = snapshot(&[
		("foo", "_", PriorityClass::Primary, "template"),
		("foo", "int", PriorityClass::Full, "specialization"),
		("foo", "[$T]", PriorityClass::Explicit, "overload"),
	]);
	assert_eq!(snap.resolve("foo", &d("int")), Ok("specialization"));
	assert_eq!(snap.resolve("foo", &d("[int]")), Ok("overload"));
	assert_eq!(snap.resolve("foo", &d("char")), Ok("template"));

	let tie = snapshot(&[
		("foo", "$T", PriorityClass::Full, "specialization"),
		("foo", "_", PriorityClass::Explicit, "overload"),
	]);
	assert_eq!(
		tie.resolve("foo", &d("int")).unwrap_err().tied(),
		&["specialization", "overload"]
	);
}

#[test]
fn test_malformed_pattern_only_affects_its_family() {
	let snap = snapshot(&[
		("bad", "(_..., int)", PriorityClass::Primary, "bad"),
		("good", "int", PriorityClass::Primary, "good"),
	]);
	assert_eq!(
		snap.resolve("bad", &d("int")),
		Err(ResolutionError::MalformedPattern {
			family: "bad".into(),
			candidate: CandidateId(0),
			reason: MalformedPattern::PackNotLast { position: 0 },
		})
	);
	assert_eq!(snap.resolve("good", &d("int")), Ok("good"));
}

#[test]
fn test_non_concrete_query() {
	let snap = container_ops();
	assert_eq!(
		snap.resolve("container_ops", &d("$T*")),
		Err(ResolutionError::NonConcreteQuery {
			query: d("$T*"),
			found: "$T*".to_string(),
		})
	);
}

#[test]
fn test_explain_reports_each_candidate() {
	let snap = container_ops();
	let explanation = snap.explain("container_ops", &d("int*"));

	let verdicts: Vec<_> = explanation
		.candidates
		.iter()
		.map(|r| (r.id, r.verdict.clone()))
		.collect();
	assert_eq!(
		verdicts,
		vec![
			(CandidateId(0), Verdict::Dominated { by: CandidateId(1) }),
			(CandidateId(1), Verdict::Selected),
			(CandidateId(2), Verdict::PatternMismatch),
		]
	);
	assert_eq!(explanation.outcome, Ok("pointer"));

	let selected = explanation.selected().unwrap();
	assert_eq!(selected.bindings.as_ref().map(ToString::to_string), Some("$T = int".to_string()));
}

#[test]
fn test_explain_missing_capability_and_ties() {
	let snap = snapshot(&[
		("s", "(_, _) {has_to_string}", PriorityClass::Partial, "to_string"),
		("s", "(int, _)", PriorityClass::Partial, "left"),
		("s", "(_, int)", PriorityClass::Partial, "right"),
	]);
	let explanation = snap.explain("s", &d("int, int"));
	let verdicts: Vec<_> = explanation
		.candidates
		.iter()
		.map(|r| r.verdict.clone())
		.collect();
	assert_eq!(
		verdicts,
		vec![
			Verdict::MissingCapability("has_to_string".into()),
			Verdict::Tied,
			Verdict::Tied,
		]
	);
	let rendered = explanation.to_string();
	assert!(rendered.starts_with("family `s` for (int, int)\n"));
	assert!(rendered.ends_with("=> ambiguous: left right"));
}

const PATTERNS: &[&str] = &[
	"$T",
	"_",
	"int",
	"char",
	"$T*",
	"int*",
	"void*",
	"[$T]",
	"[int]",
	"($T, $T)",
	"($T, $U)",
	"(int, _)",
	"(_, int)",
	"$T...",
	"_...",
	"(int, _...)",
	"()",
	"Vector<$T>",
	"Vector<int>",
	"$T {has_to_string}",
];

const QUERIES: &[&str] = &[
	"int",
	"char",
	"int*",
	"void*",
	"char**",
	"[int]",
	"[char]",
	"int, int",
	"int, char",
	"char, int",
	"()",
	"int, int, int",
	"Vector<int>",
	"Vector<char>",
	"int {has_to_string}",
];

const CLASSES: [PriorityClass; 4] = [
	PriorityClass::Primary,
	PriorityClass::Partial,
	PriorityClass::Full,
	PriorityClass::Explicit,
];

fn arb_snapshot() -> impl Strategy<Value = Snapshot<usize>> {
	prop::collection::vec((0..PATTERNS.len(), 0..CLASSES.len()), 0..12).prop_map(|rules| {
		let mut builder = RegistryBuilder::new("prop");
		builder
			.register_capability("has_to_string", Predicate::Declared)
			.unwrap();
		for (handle, (pattern, class)) in rules.into_iter().enumerate() {
			// Duplicate picks are rejected; that is covered elsewhere.
			let _ = builder.register_candidate("f", d(PATTERNS[pattern]), CLASSES[class], handle);
		}
		builder.build()
	})
}

proptest! {
	/// Resolving twice against one snapshot gives the same answer.
	#[test]
	fn prop_resolution_is_deterministic(snap in arb_snapshot(), q in 0..QUERIES.len()) {
		let query = d(QUERIES[q]);
		prop_assert_eq!(snap.resolve("f", &query), snap.resolve("f", &query));
	}

	/// A winner matches and is not strictly dominated by any other eligible candidate.
	#[test]
	fn prop_winner_is_undominated(snap in arb_snapshot(), q in 0..QUERIES.len()) {
		let query = d(QUERIES[q]);
		let eligible: Vec<_> = snap
			.family("f")
			.iter()
			.filter(|c| c.pattern().matches(&query).unwrap())
			.filter(|c| snap.capabilities().first_unsatisfied(&query, c.pattern().caps()).is_none())
			.collect();

		match snap.resolve_candidate("f", &query) {
			Ok(winner) => {
				prop_assert!(winner.pattern().matches(&query).unwrap());
				for other in &eligible {
					prop_assert_ne!(compare::<usize>(other, winner), Ok(Specificity::MoreSpecific));
				}
			}
			Err(ResolutionError::Unmatched { .. }) => prop_assert!(eligible.is_empty()),
			Err(ResolutionError::Ambiguous { candidates, .. }) => {
				prop_assert!(candidates.len() >= 2);
				prop_assert!(candidates.windows(2).all(|w| w[0] < w[1]));
			}
			Err(other) => prop_assert!(false, "unexpected error: {other}"),
		}
	}
}
