//! # Parser
//!
//! Recursive descent parser for the textual descriptor syntax.
//!
//! ```text
//! descriptor = "(" [kind ("," kind)*] ")" [caps] | kind ("," kind)* [caps]
//! caps       = "{" tag ("," tag)* "}"
//! kind       = atom "*"* ["..."]
//! atom       = "_" | "$" ident | "[" kind "]" | integer | "true" | "false"
//!            | primitive | ident ["<" kind ("," kind)* ">"]
//! ident      = (alpha | "_") (alnum | "_" | ":")*
//! ```
//!
//! Whitespace is allowed between tokens. Synthetic placeholders have no syntax.

use std::sync::Arc;

use crate::descriptor::{CapabilityTag, Descriptor};
use crate::kind::{Kind, Literal, Primitive};


/// Represents an error that occurred during parsing.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

/// Deepest nesting of sequences, arguments and pointers accepted in one kind.
pub const MAX_DEPTH: usize = 128;

/// Cursor over the remaining input.
struct Parser<'a> {
	input: &'a str,
	position: usize,
	depth: usize,
}

impl<'a> Parser<'a> {
	/// Creates a parser positioned at the start of `input`.
	fn new(input: &'a str) -> Self {
		Self {
			input,
			position: 0,
			depth: 0,
		}
	}

	/// Returns the next character without consuming it.
	fn peek(&self) -> Option<char> {
		self.input.chars().next()
	}

	/// Consumes and returns the next character.
	fn next(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.position += ch.len_utf8();
		self.input = &self.input[ch.len_utf8()..];
		Some(ch)
	}

	/// Returns true when all input has been consumed.
	fn is_end(&self) -> bool {
		self.input.is_empty()
	}

	/// Skips any whitespace at the cursor.
	fn skip_ws(&mut self) {
		while self.peek().is_some_and(char::is_whitespace) {
			self.next();
		}
	}

	/// Consumes `expected` after optional whitespace.
	fn take(&mut self, expected: char) -> Result<(), ParseError> {
		self.skip_ws();
		match self.next() {
			Some(ch) if ch == expected => Ok(()),
			Some(ch) => Err(ParseError {
				message: format!("expected '{expected}', found '{ch}'"),
				position: self.position - ch.len_utf8(),
			}),
			None => Err(self.error(format!("expected '{expected}', found end of input"))),
		}
	}

	/// Consumes `expected` if it is the next non-whitespace character.
	fn eat(&mut self, expected: char) -> bool {
		self.skip_ws();
		if self.peek() == Some(expected) {
			self.next();
			true
		} else {
			false
		}
	}

	/// Consumes `expected` if the input continues with it after optional whitespace.
	fn eat_str(&mut self, expected: &str) -> bool {
		self.skip_ws();
		if self.input.starts_with(expected) {
			self.position += expected.len();
			self.input = &self.input[expected.len()..];
			true
		} else {
			false
		}
	}

	/// Consumes the longest prefix whose characters satisfy `predicate`.
	fn take_while<F>(&mut self, predicate: F) -> &'a str
	where
		F: Fn(char) -> bool,
	{
		let len = self
			.input
			.char_indices()
			.find(|&(_, ch)| !predicate(ch))
			.map_or(self.input.len(), |(i, _)| i);
		let (taken, rest) = self.input.split_at(len);
		self.input = rest;
		self.position += len;
		taken
	}

	/// Builds an error at the current position.
	fn error(&self, message: String) -> ParseError {
		ParseError {
			message,
			position: self.position,
		}
	}

	/// Enters one nesting level, failing past [`MAX_DEPTH`].
	fn descend(&mut self) -> Result<(), ParseError> {
		if self.depth >= MAX_DEPTH {
			return Err(self.error("nesting too deep".to_string()));
		}
		self.depth += 1;
		Ok(())
	}
}

fn is_ident_start(ch: char) -> bool {
	ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || ch == '_' || ch == ':'
}

/// Parses a descriptor from its textual form.
pub fn parse_descriptor(s: &str) -> Result<Descriptor, ParseError> {
	let mut parser = Parser::new(s);
	let params = if parser.eat('(') {
		let params = parse_list(&mut parser, ')')?;
		parser.take(')')?;
		params
	} else {
		parser.skip_ws();
		if parser.is_end() || parser.peek() == Some('{') {
			Vec::new()
		} else {
			parse_list(&mut parser, '{')?
		}
	};

	let caps = if parser.eat('{') {
		parse_caps(&mut parser)?
	} else {
		Vec::new()
	};

	parser.skip_ws();
	if let Some(ch) = parser.peek() {
		return Err(parser.error(format!("expected end of input, found '{ch}'")));
	}

	Ok(Descriptor::new(params).with_caps(caps))
}

/// Parses a single kind from its textual form.
pub fn parse_kind(s: &str) -> Result<Kind, ParseError> {
	let mut parser = Parser::new(s);
	let kind = kind(&mut parser)?;
	parser.skip_ws();
	if let Some(ch) = parser.peek() {
		return Err(parser.error(format!("expected end of input, found '{ch}'")));
	}
	Ok(kind)
}

/// Parses a comma separated kind list, stopping before `close`.
fn parse_list(parser: &mut Parser, close: char) -> Result<Vec<Kind>, ParseError> {
	let mut kinds = Vec::new();
	parser.skip_ws();
	if parser.peek() == Some(close) {
		return Ok(kinds);
	}
	loop {
		kinds.push(kind(parser)?);
		if !parser.eat(',') {
			return Ok(kinds);
		}
	}
}

fn parse_caps(parser: &mut Parser) -> Result<Vec<CapabilityTag>, ParseError> {
	let mut tags = Vec::new();
	loop {
		parser.skip_ws();
		let name = parser.take_while(is_ident_char);
		if name.is_empty() {
			return Err(parser.error("expected capability tag".to_string()));
		}
		tags.push(CapabilityTag::new(name));
		if parser.eat('}') {
			return Ok(tags);
		}
		parser.take(',')?;
	}
}

/// Grammar: `kind = atom "*"* ["..."]`
fn kind(parser: &mut Parser) -> Result<Kind, ParseError> {
	parser.descend()?;
	let depth = parser.depth;
	let result = pointers(parser);
	parser.depth = depth - 1;
	result
}

fn pointers(parser: &mut Parser) -> Result<Kind, ParseError> {
	let mut kind = atom(parser)?;
	loop {
		if parser.eat_str("...") {
			return Ok(Kind::Pack(Box::new(kind)));
		}
		if parser.eat('*') {
			parser.descend()?;
			kind = Kind::Pointer(Box::new(kind));
		} else {
			return Ok(kind);
		}
	}
}

fn atom(parser: &mut Parser) -> Result<Kind, ParseError> {
	parser.skip_ws();
	let start = parser.position;
	match parser.peek() {
		Some('$') => {
			parser.next();
			let name = parser.take_while(is_ident_char);
			if name.is_empty() {
				return Err(parser.error("expected variable name after '$'".to_string()));
			}
			Ok(Kind::Var(Arc::from(name)))
		}
		Some('[') => {
			parser.next();
			let inner = kind(parser)?;
			parser.take(']')?;
			Ok(Kind::Sequence(Box::new(inner)))
		}
		Some(ch) if ch == '-' || ch.is_ascii_digit() => {
			let text = if ch == '-' {
				parser.next();
				let digits = parser.take_while(|c| c.is_ascii_digit());
				format!("-{digits}")
			} else {
				parser.take_while(|c| c.is_ascii_digit()).to_string()
			};
			text.parse::<i64>()
				.map(|n| Kind::Value(Literal::Int(n)))
				.map_err(|_| ParseError {
					message: format!("invalid integer literal '{text}'"),
					position: start,
				})
		}
		Some(ch) if is_ident_start(ch) => {
			let name = parser.take_while(is_ident_char);
			named(parser, name)
		}
		Some(ch) => Err(parser.error(format!("expected a kind, found '{ch}'"))),
		None => Err(parser.error("expected a kind, found end of input".to_string())),
	}
}

fn named(parser: &mut Parser, name: &str) -> Result<Kind, ParseError> {
	match name {
		"_" => return Ok(Kind::Wildcard),
		"true" => return Ok(Kind::Value(Literal::Bool(true))),
		"false" => return Ok(Kind::Value(Literal::Bool(false))),
		_ => {}
	}

	if parser.eat('<') {
		let args = parse_list(parser, '>')?;
		parser.take('>')?;
		return Ok(Kind::Named {
			name: Arc::from(name),
			args,
		});
	}

	match name.parse::<Primitive>() {
		Ok(p) => Ok(Kind::Primitive(p)),
		Err(_) => Ok(Kind::Named {
			name: Arc::from(name),
			args: Vec::new(),
		}),
	}
}
