use crate::schema::registry::FieldKind;

#[derive(Debug, Clone, Hash)]
pub enum Value {
	Int(i64),
	Bool(bool),
	Str(Box<str>),
	Record(RecordValue),
	Union(UnionValue),
}

#[derive(Debug, Clone, Hash)]
pub struct RecordValue {
	pub type_name: Box<str>,
	pub fields: Vec<FieldValue>,
}

#[derive(Debug, Clone, Hash)]
pub struct FieldValue {
	pub name: Box<str>,
	pub kind: FieldKind,
	pub value: Value,
}

#[derive(Debug, Clone, Hash)]
pub struct UnionValue {
	pub type_name: Box<str>,
	pub payload: Box<Value>,
}

impl Value {
	/// Short label for the runtime kind, used in error messages.
	pub fn kind_label(&self) -> &'static str {
		match self {
			Value::Int(_) => "int",
			Value::Bool(_) => "bool",
			Value::Str(_) => "str",
			Value::Record(_) => "record",
			Value::Union(_) => "union",
		}
	}

	/// Type name for composite values, kind label otherwise.
	pub fn type_label(&self) -> &str {
		match self {
			Value::Record(rec) => &rec.type_name,
			Value::Union(uni) => &uni.type_name,
			other => other.kind_label(),
		}
	}
}
