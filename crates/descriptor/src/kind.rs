use std::fmt;
use std::sync::Arc;

/// Built-in scalar kinds.
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
	strum::EnumIter,
	strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Primitive {
	Void,
	Bool,
	Char,
	Short,
	Int,
	Long,
	Float,
	Double,
	SizeT,
	Unsigned,
}

/// Literal carried by a non-type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Literal {
	Int(i64),
	Bool(bool),
}

impl fmt::Display for Literal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(n) => write!(f, "{n}"),
			Self::Bool(b) => write!(f, "{b}"),
		}
	}
}

/// One parameter position of a descriptor.
///
/// `Wildcard`, `Var` and `Pack` are pattern slots and never appear in a query.
/// `Fresh` is an opaque placeholder minted by [`crate::instantiate`]; it has no
/// textual form and is rejected in both patterns and queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
	/// Built-in scalar.
	Primitive(Primitive),
	/// Pointer to the inner kind.
	Pointer(Box<Kind>),
	/// Homogeneous sequence of the inner kind.
	Sequence(Box<Kind>),
	/// User type, optionally applied to arguments.
	Named { name: Arc<str>, args: Vec<Kind> },
	/// Non-type parameter.
	Value(Literal),
	/// Anonymous slot matching any single concrete kind.
	Wildcard,
	/// Named slot; all occurrences in one pattern bind to the same kind.
	Var(Arc<str>),
	/// Trailing variadic slot matching zero or more parameters of the element kind.
	Pack(Box<Kind>),
	/// Synthetic placeholder.
	Fresh(u32),
}

impl Kind {
	/// Primitive scalar kind.
	pub fn prim(p: Primitive) -> Self {
		Self::Primitive(p)
	}

	/// Pointer to `inner`.
	pub fn ptr(inner: Kind) -> Self {
		Self::Pointer(Box::new(inner))
	}

	/// Sequence of `inner`.
	pub fn seq(inner: Kind) -> Self {
		Self::Sequence(Box::new(inner))
	}

	/// Named type without arguments.
	pub fn named(name: impl Into<Arc<str>>) -> Self {
		Self::Named {
			name: name.into(),
			args: Vec::new(),
		}
	}

	/// Named type applied to `args`.
	pub fn applied(name: impl Into<Arc<str>>, args: impl IntoIterator<Item = Kind>) -> Self {
		Self::Named {
			name: name.into(),
			args: args.into_iter().collect(),
		}
	}

	/// Integer value parameter.
	pub fn int(n: i64) -> Self {
		Self::Value(Literal::Int(n))
	}

	/// Boolean value parameter.
	pub fn bool(b: bool) -> Self {
		Self::Value(Literal::Bool(b))
	}

	/// Type variable `$name`.
	pub fn var(name: impl Into<Arc<str>>) -> Self {
		Self::Var(name.into())
	}

	/// Variadic pack of `elem`.
	pub fn pack(elem: Kind) -> Self {
		Self::Pack(Box::new(elem))
	}

	/// Returns true if this kind and everything nested in it is concrete.
	pub fn is_concrete(&self) -> bool {
		match self {
			Self::Primitive(_) | Self::Value(_) => true,
			Self::Pointer(inner) | Self::Sequence(inner) => inner.is_concrete(),
			Self::Named { args, .. } => args.iter().all(Kind::is_concrete),
			Self::Wildcard | Self::Var(_) | Self::Pack(_) | Self::Fresh(_) => false,
		}
	}

	/// Returns the innermost kind under pointer, sequence and pack layers.
	pub fn subject(&self) -> &Kind {
		match self {
			Self::Pointer(inner) | Self::Sequence(inner) | Self::Pack(inner) => inner.subject(),
			other => other,
		}
	}

	/// Returns the type name of a primitive or named kind.
	pub fn type_name(&self) -> Option<&str> {
		match self {
			Self::Primitive(p) => Some(p.into()),
			Self::Named { name, .. } => Some(name),
			_ => None,
		}
	}
}

impl From<Primitive> for Kind {
	fn from(p: Primitive) -> Self {
		Self::Primitive(p)
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Primitive(p) => write!(f, "{p}"),
			Self::Pointer(inner) => write!(f, "{inner}*"),
			Self::Sequence(inner) => write!(f, "[{inner}]"),
			Self::Named { name, args } => {
				f.write_str(name)?;
				if !args.is_empty() {
					f.write_str("<")?;
					for (i, arg) in args.iter().enumerate() {
						if i > 0 {
							f.write_str(", ")?;
						}
						write!(f, "{arg}")?;
					}
					f.write_str(">")?;
				}
				Ok(())
			}
			Self::Value(lit) => write!(f, "{lit}"),
			Self::Wildcard => f.write_str("_"),
			Self::Var(name) => write!(f, "${name}"),
			Self::Pack(elem) => write!(f, "{elem}..."),
			Self::Fresh(id) => write!(f, "#{id}"),
		}
	}
}
