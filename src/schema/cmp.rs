use crate::schema::registry::FieldKind;
use crate::schema::value::Value;

/// Full structural equality over every field, index and dependent.
///
/// Values of different runtime kinds, different type names, or different
/// union variants are never equal. Only defined over validated values.
pub fn full_equals(a: &Value, b: &Value) -> bool {
	match (a, b) {
		(Value::Int(x), Value::Int(y)) => x == y,
		(Value::Bool(x), Value::Bool(y)) => x == y,
		(Value::Str(x), Value::Str(y)) => x == y,
		(Value::Record(x), Value::Record(y)) => {
			x.type_name == y.type_name
				&& x.fields.len() == y.fields.len()
				&& x.fields.iter().zip(&y.fields).all(|(fa, fb)| full_equals(&fa.value, &fb.value))
		}
		(Value::Union(x), Value::Union(y)) => x.type_name == y.type_name && full_equals(&x.payload, &y.payload),
		_ => false,
	}
}

/// Shape equality: compares dependent fields only, ignoring index fields.
///
/// Asserts that two values carry the same computed content regardless of
/// which index parameters produced them. Unions must hold the same concrete
/// variant, whose fields are then compared by shape.
pub fn same_shape(a: &Value, b: &Value) -> bool {
	match (a, b) {
		(Value::Record(x), Value::Record(y)) => {
			x.type_name == y.type_name
				&& x.fields.len() == y.fields.len()
				&& x.fields
					.iter()
					.zip(&y.fields)
					.filter(|(fa, _)| fa.kind == FieldKind::Dependent)
					.all(|(fa, fb)| same_shape(&fa.value, &fb.value))
		}
		(Value::Union(x), Value::Union(y)) => {
			x.type_name == y.type_name && x.payload.type_label() == y.payload.type_label() && same_shape(&x.payload, &y.payload)
		}
		_ => full_equals(a, b),
	}
}
