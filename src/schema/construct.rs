use crate::schema::cmp::{full_equals, same_shape};
use crate::schema::expr::{Env, evaluate};
use crate::schema::registry::{DeclaredType, FieldDef, FieldKind, RecordDef, Registry, TypeBody, TypeDef, UnionArm, UnionDef};
use crate::schema::render::render;
use crate::schema::value::{FieldValue, RecordValue, UnionValue, Value};
use crate::schema::{Result, SchemaError};

/// Phase-2 construction input: dependent fields for records, a variant
/// payload for unions.
#[derive(Debug, Clone, Copy)]
pub enum Inputs<'a> {
	/// Dependent field values for a record type.
	Fields(&'a [(&'a str, Value)]),
	/// Variant payload for a union type.
	Payload {
		/// Concrete variant record the payload instantiates.
		variant: &'a str,
		/// Dependent field values of the variant.
		fields: &'a [(&'a str, Value)],
	},
}

/// One-shot construction over the two-phase [`Builder`].
pub fn construct(registry: &Registry, type_name: &str, index: &[(&str, Value)], inputs: Inputs<'_>) -> Result<Value> {
	let mut builder = Builder::new(registry, type_name)?;
	for (name, value) in index {
		builder = builder.index(name, value.clone())?;
	}
	match inputs {
		Inputs::Fields(fields) => {
			for (name, value) in fields {
				builder = builder.dependent(name, value.clone())?;
			}
		}
		Inputs::Payload { variant, fields } => {
			builder = builder.payload(variant, fields)?;
		}
	}
	builder.finish()
}

/// Two-phase value constructor.
///
/// Phase 1 binds index fields and nested sub-values; phase 2 supplies
/// dependent fields (records) or the variant payload (unions). Setters are
/// write-once. `finish` runs every declared constraint and yields an
/// immutable value only when all of them hold; no handle to a partially
/// validated value ever escapes.
#[derive(Debug)]
pub struct Builder<'r> {
	registry: &'r Registry,
	def: &'r TypeDef,
	bound: Vec<Option<Value>>,
	payload: Option<PayloadInput>,
}

#[derive(Debug)]
struct PayloadInput {
	variant: Box<str>,
	fields: Vec<(Box<str>, Value)>,
}

impl<'r> Builder<'r> {
	/// Start constructing a value of the named type.
	pub fn new(registry: &'r Registry, type_name: &str) -> Result<Self> {
		let def = registry.require(type_name)?;
		let slots = match &def.body {
			TypeBody::Record(rec) => rec.fields.len(),
			TypeBody::Union(uni) => uni.index.len(),
		};
		Ok(Self {
			registry,
			def,
			bound: vec![None; slots],
			payload: None,
		})
	}

	/// Bind an index field.
	pub fn index(mut self, name: &str, value: Value) -> Result<Self> {
		let fields = match &self.def.body {
			TypeBody::Record(rec) => &rec.fields,
			TypeBody::Union(uni) => &uni.index,
		};
		let slot = find_field(&self.def.name, fields, name, FieldKind::Index, "an index field")?;
		check_declared_type(&self.def.name, &fields[slot], &value)?;
		bind_slot(&self.def.name, &mut self.bound, slot, name, value)?;
		Ok(self)
	}

	/// Bind a dependent field. Records only.
	pub fn dependent(mut self, name: &str, value: Value) -> Result<Self> {
		let TypeBody::Record(rec) = &self.def.body else {
			return Err(SchemaError::NotARecord { name: self.def.name.to_string() });
		};
		let slot = find_field(&self.def.name, &rec.fields, name, FieldKind::Dependent, "a dependent field")?;
		check_declared_type(&self.def.name, &rec.fields[slot], &value)?;
		bind_slot(&self.def.name, &mut self.bound, slot, name, value)?;
		Ok(self)
	}

	/// Supply the variant payload. Unions only.
	pub fn payload(mut self, variant: &str, fields: &[(&str, Value)]) -> Result<Self> {
		let TypeBody::Union(_) = &self.def.body else {
			return Err(SchemaError::NotAUnion { name: self.def.name.to_string() });
		};
		if self.payload.is_some() {
			return Err(SchemaError::FieldRebound {
				type_name: self.def.name.to_string(),
				field: "payload".to_owned(),
			});
		}
		self.payload = Some(PayloadInput {
			variant: variant.to_owned().into_boxed_str(),
			fields: fields.iter().map(|(name, value)| ((*name).to_owned().into_boxed_str(), value.clone())).collect(),
		});
		Ok(self)
	}

	/// Validate all constraints and yield the immutable value.
	pub fn finish(self) -> Result<Value> {
		match &self.def.body {
			TypeBody::Record(rec) => finish_record(self.registry, &self.def.name, rec, self.bound),
			TypeBody::Union(uni) => finish_union(self.registry, &self.def.name, uni, self.bound, self.payload),
		}
	}
}

fn finish_record(registry: &Registry, type_name: &str, rec: &RecordDef, bound: Vec<Option<Value>>) -> Result<Value> {
	let mut fields = Vec::with_capacity(rec.fields.len());
	for (def, slot) in rec.fields.iter().zip(bound) {
		let value = slot.ok_or_else(|| SchemaError::MissingField {
			type_name: type_name.to_owned(),
			field: def.name.to_string(),
		})?;
		fields.push(FieldValue {
			name: def.name.clone(),
			kind: def.kind,
			value,
		});
	}

	let mut env = Env::new();
	for field in &fields {
		env.bind(&field.name, &field.value);
	}

	for constraint in &rec.constraints {
		let expected = evaluate(registry, type_name, &constraint.expr, &env)?;
		let actual = env.get(&constraint.field).ok_or_else(|| SchemaError::UnboundField {
			type_name: type_name.to_owned(),
			path: constraint.field.to_string(),
		})?;

		let composite = matches!(expected, Value::Record(_) | Value::Union(_)) && matches!(actual, Value::Record(_) | Value::Union(_));
		let holds = if composite {
			same_shape(&expected, actual)
		} else {
			full_equals(&expected, actual)
		};
		if !holds {
			return Err(SchemaError::InvalidValue {
				field: constraint.field.to_string(),
				expected: render(&expected),
				actual: render(actual),
			});
		}
	}

	Ok(Value::Record(RecordValue {
		type_name: type_name.to_owned().into_boxed_str(),
		fields,
	}))
}

fn finish_union(
	registry: &Registry,
	type_name: &str,
	uni: &UnionDef,
	bound: Vec<Option<Value>>,
	payload: Option<PayloadInput>,
) -> Result<Value> {
	let mut index = Vec::with_capacity(uni.index.len());
	for (def, slot) in uni.index.iter().zip(bound) {
		let value = slot.ok_or_else(|| SchemaError::MissingField {
			type_name: type_name.to_owned(),
			field: def.name.to_string(),
		})?;
		index.push((def.name.clone(), value));
	}

	let payload = payload.ok_or_else(|| SchemaError::MissingPayload { type_name: type_name.to_owned() })?;

	let mut env = Env::new();
	for (name, value) in &index {
		env.bind(name, value);
	}

	let (arm_idx, arm) = select_arm(registry, type_name, uni, &env)?;
	if !arm.variants.iter().any(|variant| variant.as_ref() == payload.variant.as_ref()) {
		return Err(SchemaError::UnresolvedVariant {
			type_name: type_name.to_owned(),
			detail: format!(
				"payload {} not valid inside (arm {arm_idx} accepts {})",
				payload.variant,
				arm.variants.join(", ")
			),
		});
	}

	let mut builder = Builder::new(registry, &payload.variant)?;
	for (name, value) in index {
		builder = builder.index(&name, value)?;
	}
	for (name, value) in payload.fields {
		builder = builder.dependent(&name, value)?;
	}
	let variant_value = builder.finish()?;

	Ok(Value::Union(UnionValue {
		type_name: type_name.to_owned().into_boxed_str(),
		payload: Box::new(variant_value),
	}))
}

/// Evaluate guards in declared order and return the first matching arm.
pub(crate) fn select_arm<'r>(registry: &Registry, type_name: &str, uni: &'r UnionDef, env: &Env) -> Result<(usize, &'r UnionArm)> {
	for (idx, arm) in uni.arms.iter().enumerate() {
		match evaluate(registry, type_name, &arm.guard, env)? {
			Value::Bool(true) => return Ok((idx, arm)),
			Value::Bool(false) => {}
			other => {
				return Err(SchemaError::EvalTypeMismatch {
					expected: "bool",
					got: other.kind_label().to_owned(),
				});
			}
		}
	}
	Err(SchemaError::UnresolvedVariant {
		type_name: type_name.to_owned(),
		detail: "no guard matched".to_owned(),
	})
}

fn find_field(type_name: &str, fields: &[FieldDef], name: &str, kind: FieldKind, expected: &'static str) -> Result<usize> {
	let slot = fields.iter().position(|field| field.name.as_ref() == name).ok_or_else(|| SchemaError::UnknownField {
		type_name: type_name.to_owned(),
		field: name.to_owned(),
	})?;
	if fields[slot].kind != kind {
		return Err(SchemaError::WrongFieldKind {
			type_name: type_name.to_owned(),
			field: name.to_owned(),
			expected,
		});
	}
	Ok(slot)
}

fn check_declared_type(type_name: &str, def: &FieldDef, value: &Value) -> Result<()> {
	let matches = match (&def.ty, value) {
		(DeclaredType::Int, Value::Int(_)) => true,
		(DeclaredType::Bool, Value::Bool(_)) => true,
		(DeclaredType::Str, Value::Str(_)) => true,
		(DeclaredType::Named(name), Value::Record(rec)) => rec.type_name == *name,
		(DeclaredType::Named(name), Value::Union(uni)) => uni.type_name == *name,
		_ => false,
	};
	if !matches {
		return Err(SchemaError::DeclaredTypeMismatch {
			type_name: type_name.to_owned(),
			field: def.name.to_string(),
			expected: def.ty.label(),
			got: value.kind_label(),
		});
	}
	Ok(())
}

fn bind_slot(type_name: &str, bound: &mut [Option<Value>], slot: usize, name: &str, value: Value) -> Result<()> {
	if bound[slot].is_some() {
		return Err(SchemaError::FieldRebound {
			type_name: type_name.to_owned(),
			field: name.to_owned(),
		});
	}
	bound[slot] = Some(value);
	Ok(())
}
