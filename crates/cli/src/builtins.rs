//! Builtin rule families.
//!
//! Each family mirrors a classic specialization or overload-selection example.
//!
//! | Family | Queries | Shows |
//! |--------|---------|-------|
//! | `container_ops` | `int`, `int*`, `void*` | primary, partial and full specialization |
//! | `serializers` | `Point {has_to_string}` | declared capability gate |
//! | `foo` | `double`, `[char]`, `int` | overloads beside a function template |
//! | `default_value` | `int`, `char` | full specializations without a primary |
//! | `factorial` | `factorial<3>`, `factorial<1>` | value parameters |
//! | `conditional` | `true, int, char` | boolean value partial specialization |
//! | `select` | `0, int, char` | variadic partial specialization |
//! | `value_trait` | `A`, `B` | trait specialization per type |
//! | `concepts` | `A*`, `B*` | structural capabilities from type facts |
//! | `sum` | `int, int`, `int, double` | same-type variadic pack |
//! | `pi` | `double`, `char*` | variable template specialization |

use pickwise_engine::global::Handle;
use pickwise_engine::{Descriptor, Predicate, PriorityClass, RegistryBuilder, StaticTypeFacts};

use crate::config::ConfigError;

use PriorityClass::{Explicit, Full, Partial, Primary};

/// `(family, pattern, class, handle)`.
type Rule = (&'static str, &'static str, PriorityClass, &'static str);

const RULES: &[Rule] = &[
	("container_ops", "$T", Primary, "generic"),
	("container_ops", "$T*", Partial, "pointer"),
	("container_ops", "void*", Full, "void_ptr"),
	("serializers", "_ {has_to_string}", Partial, "to_string"),
	("foo", "$T", Primary, "identity"),
	("foo", "[$T]", Primary, "first_element"),
	("foo", "int", Explicit, "int_overload"),
	("default_value", "int", Full, "zero"),
	("default_value", "char", Full, "letter_a"),
	("factorial", "factorial<$N>", Primary, "recursive"),
	("factorial", "factorial<1>", Full, "base"),
	("conditional", "($B, $T, $F)", Primary, "then_type"),
	("conditional", "(false, $T, $F)", Partial, "else_type"),
	("select", "(0, $T, _...)", Partial, "head"),
	("select", "($N, _, _...)", Partial, "recurse"),
	("value_trait", "$T", Primary, "no_value"),
	("value_trait", "A", Full, "a_value"),
	("value_trait", "B", Full, "b_value"),
	("concepts", "$T* {foo}", Partial, "foo_only"),
	("concepts", "$T* {bar, foo}", Partial, "foo_and_bar"),
	("sum", "($T, $T...)", Primary, "homogeneous"),
	("sum", "_...", Primary, "fold"),
	("pi", "$T", Primary, "numeric"),
	("pi", "char*", Full, "name"),
];

/// Type facts consulted by the structural capabilities.
pub fn type_facts() -> StaticTypeFacts {
	StaticTypeFacts::new()
		.with_type("A", ["foo", "bar"])
		.with_type("B", ["foo"])
}

/// Registers every builtin capability and family into `builder`.
pub fn register_all(builder: &mut RegistryBuilder<Handle>) -> Result<(), ConfigError> {
	let facts = type_facts();
	builder.register_capability("has_to_string", Predicate::Declared)?;
	builder.register_capability("foo", Predicate::structural(facts.clone()))?;
	builder.register_capability("bar", Predicate::structural(facts))?;

	register_rules(builder, RULES)?;
	tracing::debug!(candidates = builder.len(), "registered builtins");
	Ok(())
}

fn register_rules(builder: &mut RegistryBuilder<Handle>, rules: &[Rule]) -> Result<(), ConfigError> {
	for &(family, pattern, class, handle) in rules {
		let pattern: Descriptor = pattern.parse().map_err(|source| ConfigError::Pattern {
			family: family.to_string(),
			pattern: pattern.to_string(),
			source,
		})?;
		builder.register_candidate(family, pattern, class, Handle::from(handle))?;
	}
	Ok(())
}
