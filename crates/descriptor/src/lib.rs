//! Structural shape descriptors.
//!
//! A [`Descriptor`] is an ordered list of parameter [`Kind`]s plus a set of
//! [`CapabilityTag`]s. Queries are concrete descriptors; patterns may contain
//! wildcards, type variables and a trailing variadic pack.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Kind`] | One parameter position (primitive, pointer, sequence, named, value, slot). |
//! | [`Descriptor`] | Immutable shape value: kinds plus capability tags. |
//! | [`Bindings`] | Variable bindings produced by a successful match. |
//! | [`MalformedPattern`] | Structural defect in a pattern, reported at match time. |
//! | [`ParseError`] | Textual syntax error with byte position. |
//!
//! # Syntax
//!
//! ```text
//! descriptor = "(" [kind ("," kind)*] ")" [caps] | kind ("," kind)* [caps]
//! caps       = "{" tag ("," tag)* "}"
//! kind       = atom "*"* ["..."]
//! atom       = "_" | "$" ident | "[" kind "]" | integer | "true" | "false"
//!            | primitive | ident ["<" kind ("," kind)* ">"]
//! ```
//!
//! ```
//! use pickwise_descriptor::Descriptor;
//!
//! let pattern: Descriptor = "$T*".parse().unwrap();
//! let query: Descriptor = "int*".parse().unwrap();
//! assert!(pattern.matches(&query).unwrap());
//! ```

mod descriptor;
mod kind;
pub mod matching;
pub mod parse;

pub use descriptor::{CapabilityTag, Descriptor};
pub use kind::{Kind, Literal, Primitive};
pub use matching::{Bindings, MalformedPattern, instantiate, match_bindings, matches};
pub use parse::ParseError;
