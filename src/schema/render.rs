use std::hash::{DefaultHasher, Hash, Hasher};

use crate::schema::registry::FieldKind;
use crate::schema::value::Value;

/// Render a value at the default depth of 1.
///
/// The immediate value's own fields are expanded; nested sub-values collapse
/// to opaque placeholders. Callers needing more context use [`render_depth`].
pub fn render(value: &Value) -> String {
	render_depth(value, 1)
}

/// Render a value expanding composite fields down to `depth` levels.
///
/// `depth = 0` yields `TypeName@<token>` without expanding any field, which
/// bounds output size for deep type graphs. Output is deterministic for a
/// given `(value, depth)` pair.
pub fn render_depth(value: &Value, depth: u32) -> String {
	match value {
		Value::Int(v) => v.to_string(),
		Value::Bool(v) => v.to_string(),
		Value::Str(v) => v.to_string(),
		Value::Record(rec) => {
			if depth == 0 {
				return placeholder(&rec.type_name, value);
			}

			let mut index = Vec::new();
			let mut dependent = Vec::new();
			for field in &rec.fields {
				let rendered = render_depth(&field.value, depth - 1);
				match field.kind {
					FieldKind::Index => index.push(format!("{} = {}", field.name, rendered)),
					FieldKind::Dependent => dependent.push(format!("{}: {}", field.name, rendered)),
				}
			}

			if index.is_empty() {
				format!("{} {{{}}}", rec.type_name, dependent.join(", "))
			} else {
				format!("{} <{}> {{{}}}", rec.type_name, index.join(", "), dependent.join(", "))
			}
		}
		Value::Union(uni) => {
			if depth == 0 {
				return placeholder(&uni.type_name, value);
			}
			format!("({}) {}", uni.type_name, render_depth(&uni.payload, depth))
		}
	}
}

fn placeholder(type_name: &str, value: &Value) -> String {
	let mut hasher = DefaultHasher::new();
	value.hash(&mut hasher);
	format!("{type_name}@{:x}", hasher.finish())
}
