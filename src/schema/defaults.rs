use crate::schema::construct::{Builder, select_arm};
use crate::schema::expr::Env;
use crate::schema::registry::{DeclaredType, FieldDef, FieldKind, Registry, TypeBody};
use crate::schema::value::Value;
use crate::schema::{Result, SchemaError};

/// Construct the canonical zero-valued instance of a type.
///
/// Index and dependent fields take their type's zero value (0, false, empty
/// text); nested sub-values default recursively; validation runs in full. A
/// union default selects whichever guard matches the all-zero index bindings
/// and defaults that arm's first variant. Type graphs are acyclic at the
/// definition level, so this terminates.
pub fn default_value(registry: &Registry, type_name: &str) -> Result<Value> {
	make(registry, type_name, &[])
}

/// Construct from defaults with named dependent fields overwritten.
///
/// Sugar over [`default_value`]: the overrides replace dependent inputs
/// before validation, so the result is re-validated in full. Witness values
/// used inside guards and constraints are built this way.
pub fn make(registry: &Registry, type_name: &str, overrides: &[(&str, Value)]) -> Result<Value> {
	match &registry.require(type_name)?.body {
		TypeBody::Record(_) => make_record(registry, type_name, overrides),
		TypeBody::Union(_) => make_union(registry, type_name, None, overrides),
	}
}

/// Record-typed [`make`].
pub fn make_record(registry: &Registry, type_name: &str, overrides: &[(&str, Value)]) -> Result<Value> {
	let def = registry.require(type_name)?;
	let TypeBody::Record(rec) = &def.body else {
		return Err(SchemaError::NotARecord { name: type_name.to_owned() });
	};

	check_override_names(type_name, &rec.fields, overrides)?;

	let mut builder = Builder::new(registry, type_name)?;
	for field in &rec.fields {
		match field.kind {
			FieldKind::Index => {
				builder = builder.index(&field.name, zero_of(registry, &field.ty)?)?;
			}
			FieldKind::Dependent => {
				let value = match find_override(overrides, &field.name) {
					Some(value) => value.clone(),
					None => zero_of(registry, &field.ty)?,
				};
				builder = builder.dependent(&field.name, value)?;
			}
		}
	}
	builder.finish()
}

/// Union-typed [`make`] with optional explicit variant selection.
///
/// With `variant = None` the all-zero index bindings pick the arm and its
/// first declared variant, matching what a plain default would carry.
pub fn make_union(registry: &Registry, type_name: &str, variant: Option<&str>, overrides: &[(&str, Value)]) -> Result<Value> {
	let def = registry.require(type_name)?;
	let TypeBody::Union(uni) = &def.body else {
		return Err(SchemaError::NotAUnion { name: type_name.to_owned() });
	};

	let mut index = Vec::with_capacity(uni.index.len());
	for field in &uni.index {
		index.push((field.name.clone(), zero_of(registry, &field.ty)?));
	}

	let variant = match variant {
		Some(name) => name.to_owned(),
		None => {
			let mut env = Env::new();
			for (name, value) in &index {
				env.bind(name, value);
			}
			let (_, arm) = select_arm(registry, type_name, uni, &env)?;
			arm.variants[0].to_string()
		}
	};

	let variant_def = registry.require(&variant)?;
	let TypeBody::Record(variant_rec) = &variant_def.body else {
		return Err(SchemaError::NotARecord { name: variant });
	};
	check_override_names(&variant, &variant_rec.fields, overrides)?;

	let mut fields = Vec::new();
	for field in &variant_rec.fields {
		if field.kind != FieldKind::Dependent {
			continue;
		}
		let value = match find_override(overrides, &field.name) {
			Some(value) => value.clone(),
			None => zero_of(registry, &field.ty)?,
		};
		fields.push((field.name.clone(), value));
	}

	let mut builder = Builder::new(registry, type_name)?;
	for (name, value) in &index {
		builder = builder.index(name, value.clone())?;
	}
	let payload: Vec<(&str, Value)> = fields.iter().map(|(name, value)| (name.as_ref(), value.clone())).collect();
	builder = builder.payload(&variant, &payload)?;
	builder.finish()
}

/// Zero value of a declared type: 0, false, empty text, or a nested default.
pub fn zero_of(registry: &Registry, ty: &DeclaredType) -> Result<Value> {
	match ty {
		DeclaredType::Int => Ok(Value::Int(0)),
		DeclaredType::Bool => Ok(Value::Bool(false)),
		DeclaredType::Str => Ok(Value::Str(Box::default())),
		DeclaredType::Named(name) => default_value(registry, name),
	}
}

fn find_override<'a>(overrides: &'a [(&str, Value)], name: &str) -> Option<&'a Value> {
	overrides.iter().find(|(n, _)| *n == name).map(|(_, value)| value)
}

fn check_override_names(type_name: &str, fields: &[FieldDef], overrides: &[(&str, Value)]) -> Result<()> {
	for (name, _) in overrides {
		let field = fields.iter().find(|field| field.name.as_ref() == *name).ok_or_else(|| SchemaError::UnknownField {
			type_name: type_name.to_owned(),
			field: (*name).to_owned(),
		})?;
		if field.kind != FieldKind::Dependent {
			return Err(SchemaError::WrongFieldKind {
				type_name: type_name.to_owned(),
				field: (*name).to_owned(),
				expected: "a dependent field",
			});
		}
	}
	Ok(())
}
