use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::kind::Primitive;

fn d(s: &str) -> Descriptor {
	s.parse().unwrap_or_else(|e| panic!("bad descriptor {s:?}: {e}"))
}

#[rstest]
#[case("int", "int", true)]
#[case("int", "char", false)]
#[case("$T", "int", true)]
#[case("$T*", "int*", true)]
#[case("$T*", "int", false)]
#[case("void*", "void*", true)]
#[case("void*", "int*", false)]
#[case("[$T]", "[char]", true)]
#[case("[$T]", "char*", false)]
#[case("Vector<$T>", "Vector<int**>", true)]
#[case("Vector<$T>", "Pair<int>", false)]
#[case("Pair<$A, $B>", "Pair<int, char>", true)]
#[case("Pair<$A, $B>", "Pair<int>", false)]
#[case("_, _", "int, char", true)]
#[case("_, _", "int", false)]
#[case("()", "()", true)]
#[case("factorial<1>", "factorial<1>", true)]
#[case("factorial<$N>", "factorial<3>", true)]
#[case("factorial<1>", "factorial<3>", false)]
#[case("false, $T, $F", "false, int, char", true)]
#[case("false, $T, $F", "true, int, char", false)]
fn test_positional_match(#[case] pattern: &str, #[case] concrete: &str, #[case] expected: bool) {
	assert_eq!(matches(&d(pattern), &d(concrete)), Ok(expected), "{pattern} vs {concrete}");
}

#[rstest]
#[case("$T, $T", "int, int", true)]
#[case("$T, $T", "int, char", false)]
#[case("$T, $T*", "int, int*", true)]
#[case("$T, $T*", "int, char*", false)]
#[case("Pair<$T, $T>", "Pair<A, A>", true)]
#[case("Pair<$T, $T>", "Pair<A, B>", false)]
fn test_repeated_variable_binds_consistently(
	#[case] pattern: &str,
	#[case] concrete: &str,
	#[case] expected: bool,
) {
	assert_eq!(matches(&d(pattern), &d(concrete)), Ok(expected));
}

#[rstest]
#[case("$T...", "()", true)]
#[case("$T...", "int, int, int", true)]
#[case("$T...", "int, char", false)]
#[case("_...", "int, char, A", true)]
#[case("$H, $H...", "int", true)]
#[case("$H, $H...", "int, int, int", true)]
#[case("$H, $H...", "int, int, char", false)]
#[case("$H, $H...", "()", false)]
#[case("0, $T, _...", "0, A, B, C", true)]
fn test_pack_consumes_tail(#[case] pattern: &str, #[case] concrete: &str, #[case] expected: bool) {
	assert_eq!(matches(&d(pattern), &d(concrete)), Ok(expected));
}

#[test]
fn test_bindings_are_reported() {
	let bindings = match_bindings(&d("Pair<$K, $V*>"), &d("Pair<int, A>"))
		.unwrap()
		.is_none();
	assert!(bindings, "A is not a pointer");

	let bindings = match_bindings(&d("Pair<$K, $V>*"), &d("Pair<int, A*>*"))
		.unwrap()
		.expect("should match");
	assert_eq!(bindings.len(), 2);
	assert_eq!(bindings.get("K"), Some(&Kind::prim(Primitive::Int)));
	assert_eq!(bindings.get("V"), Some(&Kind::ptr(Kind::named("A"))));
	assert_eq!(bindings.to_string(), "$K = int, $V = A*");
}

#[test]
fn test_capability_tags_ignored_by_matcher() {
	assert_eq!(matches(&d("$T {has_to_string}"), &d("int")), Ok(true));
}

#[test]
fn test_pack_not_last_is_malformed() {
	let pattern = Descriptor::new([Kind::pack(Kind::Wildcard), Kind::prim(Primitive::Int)]);
	assert_eq!(
		matches(&pattern, &d("int")),
		Err(MalformedPattern::PackNotLast { position: 0 })
	);
}

#[test]
fn test_nested_pack_is_malformed() {
	let pattern = Descriptor::new([Kind::ptr(Kind::pack(Kind::var("T")))]);
	assert!(matches!(
		matches(&pattern, &d("int*")),
		Err(MalformedPattern::NestedPack { .. })
	));
}

#[test]
fn test_fresh_in_pattern_is_malformed() {
	let pattern = Descriptor::new([Kind::Fresh(7)]);
	assert_eq!(
		pattern.validate_pattern(),
		Err(MalformedPattern::SyntheticKind { id: 7 })
	);
}

#[test]
fn test_instantiate_shares_variables_and_splits_wildcards() {
	let synth = instantiate(&d("$T, _, $T*, _... {printable}"));
	assert_eq!(
		synth.params(),
		&[
			Kind::Fresh(0),
			Kind::Fresh(1),
			Kind::ptr(Kind::Fresh(0)),
			Kind::pack(Kind::Fresh(2)),
			Kind::pack(Kind::Fresh(3)),
		]
	);
	assert!(synth.declares("printable"));
}

#[test]
fn test_instantiate_pack_copies_share_variables() {
	let synth = instantiate(&d("$T..."));
	assert_eq!(
		synth.params(),
		&[Kind::pack(Kind::Fresh(0)), Kind::pack(Kind::Fresh(0))]
	);
	assert_eq!(matches(&d("_..."), &synth), Ok(true));
	assert_eq!(matches(&d("$U..."), &synth), Ok(true));
	assert_eq!(matches(&d("$U..."), &instantiate(&d("_..."))), Ok(false));
}

#[test]
fn test_synthetic_pack_only_matches_pack() {
	let general = d("_...");
	let one_plus = d("$H, _...");
	let synth_general = instantiate(&general);
	let synth_one_plus = instantiate(&one_plus);

	assert_eq!(matches(&general, &synth_one_plus), Ok(true));
	assert_eq!(matches(&one_plus, &synth_general), Ok(false));
	assert_eq!(matches(&d("_"), &synth_general), Ok(false));
}
