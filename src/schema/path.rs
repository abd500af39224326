use crate::schema::{Result, SchemaError};

/// Parsed dotted field path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
	/// Ordered field name segments.
	pub segments: Vec<Box<str>>,
}

impl FieldPath {
	/// Parse dotted field syntax, e.g. `k1.i`.
	pub fn parse(input: &str) -> Result<Self> {
		if input.is_empty() {
			return Err(SchemaError::InvalidFieldPath { path: input.to_owned() });
		}

		let mut segments = Vec::new();
		for segment in input.split('.') {
			if !is_ident(segment) {
				return Err(SchemaError::InvalidFieldPath { path: input.to_owned() });
			}
			segments.push(segment.to_owned().into_boxed_str());
		}

		Ok(Self { segments })
	}
}

fn is_ident(segment: &str) -> bool {
	let mut chars = segment.chars();
	let Some(first) = chars.next() else {
		return false;
	};
	if !first.is_ascii_alphabetic() && first != '_' {
		return false;
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
