use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::construct::Builder;
use crate::schema::expr::{Expr, WitnessExpr};
use crate::schema::registry::{Constraint, DeclaredType, FieldDef, FieldKind, Registry, RegistryBuilder, TypeDef, UnionArm};
use crate::schema::value::Value;
use crate::schema::Result;

/// Serialized registry description, the boundary consumed from the schema
/// compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryDesc {
	/// Declared types in declaration order.
	pub types: Vec<TypeDesc>,
}

/// One serialized type declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDesc {
	/// Record with ordered fields and constraints.
	Record {
		/// Type name.
		name: String,
		/// Ordered field declarations.
		#[serde(default)]
		fields: Vec<FieldDesc>,
		/// Constraints checked in declaration order.
		#[serde(default)]
		constraints: Vec<ConstraintDesc>,
	},
	/// Union with shared index fields and guarded arms.
	Union {
		/// Type name.
		name: String,
		/// Index fields every variant mirrors.
		#[serde(default)]
		index: Vec<FieldDesc>,
		/// Guard/variant arms in dispatch order.
		arms: Vec<ArmDesc>,
	},
}

/// One serialized field declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDesc {
	/// Field name.
	pub name: String,
	/// Index or dependent.
	pub kind: FieldKindDesc,
	/// Declared type reference.
	#[serde(rename = "type")]
	pub ty: TypeRefDesc,
}

/// Serialized field kind tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKindDesc {
	/// Index field.
	Index,
	/// Dependent field.
	Dependent,
}

/// Serialized declared-type reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRefDesc {
	/// Signed 64-bit integer.
	Int,
	/// Boolean.
	Bool,
	/// Text.
	Str,
	/// Another declared type, by name.
	Named(String),
}

/// One serialized constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintDesc {
	/// Dotted path of the constrained field.
	pub field: String,
	/// Expression producing the expected value.
	pub expr: ExprDesc,
}

/// One serialized union arm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmDesc {
	/// Guard expression over the union's index fields.
	pub guard: ExprDesc,
	/// Acceptable variant records.
	pub variants: Vec<String>,
}

/// Serialized constraint expression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprDesc {
	/// Integer literal.
	Int(i64),
	/// Boolean literal.
	Bool(bool),
	/// String literal.
	Str(String),
	/// Dotted field path lookup.
	Path(String),
	/// Wrapping integer negation.
	Neg(Box<ExprDesc>),
	/// Boolean negation.
	Not(Box<ExprDesc>),
	/// Wrapping addition or string concatenation.
	Add(Box<ExprDesc>, Box<ExprDesc>),
	/// Wrapping subtraction.
	Sub(Box<ExprDesc>, Box<ExprDesc>),
	/// Wrapping multiplication.
	Mul(Box<ExprDesc>, Box<ExprDesc>),
	/// Deep structural equality.
	Eq(Box<ExprDesc>, Box<ExprDesc>),
	/// Short-circuit boolean and.
	And(Box<ExprDesc>, Box<ExprDesc>),
	/// Short-circuit boolean or.
	Or(Box<ExprDesc>, Box<ExprDesc>),
	/// Witness construction from another type's defaults.
	Witness {
		/// Type the witness instantiates.
		#[serde(rename = "type")]
		type_name: String,
		/// Variant selection for union witnesses.
		#[serde(default)]
		variant: Option<String>,
		/// Dependent field overrides.
		#[serde(default)]
		overrides: BTreeMap<String, ExprDesc>,
	},
}

/// Serialized construction input for one value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDesc {
	/// Integer scalar.
	Int(i64),
	/// Boolean scalar.
	Bool(bool),
	/// Text scalar.
	Str(String),
	/// Record construction input.
	Record {
		/// Record type name.
		#[serde(rename = "type")]
		type_name: String,
		/// Index field inputs.
		#[serde(default)]
		index: BTreeMap<String, ValueDesc>,
		/// Dependent field inputs.
		#[serde(default)]
		fields: BTreeMap<String, ValueDesc>,
	},
	/// Union construction input.
	Union {
		/// Union type name.
		#[serde(rename = "type")]
		type_name: String,
		/// Index field inputs.
		#[serde(default)]
		index: BTreeMap<String, ValueDesc>,
		/// Variant the payload instantiates.
		variant: String,
		/// Dependent field inputs of the variant.
		#[serde(default)]
		fields: BTreeMap<String, ValueDesc>,
	},
}

impl RegistryDesc {
	/// Parse a description from JSON text.
	pub fn from_json(text: &str) -> Result<Self> {
		Ok(serde_json::from_str(text)?)
	}

	/// Convert into a validated registry.
	pub fn into_registry(self) -> Result<Registry> {
		let mut builder = RegistryBuilder::new();
		for ty in self.types {
			builder = builder.ty(ty.into_def());
		}
		builder.finish()
	}
}

/// Load and validate a registry description from a JSON file.
pub fn load_registry(path: impl AsRef<Path>) -> Result<Registry> {
	let text = fs::read_to_string(path)?;
	RegistryDesc::from_json(&text)?.into_registry()
}

/// Construct a value from a serialized input, validating in full.
pub fn build_value(registry: &Registry, desc: &ValueDesc) -> Result<Value> {
	match desc {
		ValueDesc::Int(v) => Ok(Value::Int(*v)),
		ValueDesc::Bool(v) => Ok(Value::Bool(*v)),
		ValueDesc::Str(v) => Ok(Value::Str(v.clone().into_boxed_str())),
		ValueDesc::Record { type_name, index, fields } => {
			let mut builder = Builder::new(registry, type_name)?;
			for (name, input) in index {
				builder = builder.index(name, build_value(registry, input)?)?;
			}
			for (name, input) in fields {
				builder = builder.dependent(name, build_value(registry, input)?)?;
			}
			builder.finish()
		}
		ValueDesc::Union {
			type_name,
			index,
			variant,
			fields,
		} => {
			let mut builder = Builder::new(registry, type_name)?;
			for (name, input) in index {
				builder = builder.index(name, build_value(registry, input)?)?;
			}
			let mut payload = Vec::with_capacity(fields.len());
			for (name, input) in fields {
				payload.push((name.as_str(), build_value(registry, input)?));
			}
			builder = builder.payload(variant, &payload)?;
			builder.finish()
		}
	}
}

impl TypeDesc {
	fn into_def(self) -> TypeDef {
		match self {
			TypeDesc::Record { name, fields, constraints } => TypeDef::record(
				&name,
				fields.into_iter().map(FieldDesc::into_def).collect(),
				constraints
					.into_iter()
					.map(|c| Constraint::new(&c.field, c.expr.into_expr()))
					.collect(),
			),
			TypeDesc::Union { name, index, arms } => TypeDef::union(
				&name,
				index.into_iter().map(FieldDesc::into_def).collect(),
				arms.into_iter()
					.map(|arm| UnionArm {
						guard: arm.guard.into_expr(),
						variants: arm.variants.into_iter().map(String::into_boxed_str).collect(),
					})
					.collect(),
			),
		}
	}
}

impl FieldDesc {
	fn into_def(self) -> FieldDef {
		FieldDef {
			name: self.name.into_boxed_str(),
			kind: match self.kind {
				FieldKindDesc::Index => FieldKind::Index,
				FieldKindDesc::Dependent => FieldKind::Dependent,
			},
			ty: self.ty.into_def(),
		}
	}
}

impl TypeRefDesc {
	fn into_def(self) -> DeclaredType {
		match self {
			TypeRefDesc::Int => DeclaredType::Int,
			TypeRefDesc::Bool => DeclaredType::Bool,
			TypeRefDesc::Str => DeclaredType::Str,
			TypeRefDesc::Named(name) => DeclaredType::Named(name.into_boxed_str()),
		}
	}
}

impl ExprDesc {
	fn into_expr(self) -> Expr {
		match self {
			ExprDesc::Int(v) => Expr::Int(v),
			ExprDesc::Bool(v) => Expr::Bool(v),
			ExprDesc::Str(v) => Expr::Str(v.into_boxed_str()),
			ExprDesc::Path(v) => Expr::Path(v.into_boxed_str()),
			ExprDesc::Neg(inner) => Expr::neg(inner.into_expr()),
			ExprDesc::Not(inner) => Expr::not(inner.into_expr()),
			ExprDesc::Add(lhs, rhs) => Expr::add(lhs.into_expr(), rhs.into_expr()),
			ExprDesc::Sub(lhs, rhs) => Expr::sub(lhs.into_expr(), rhs.into_expr()),
			ExprDesc::Mul(lhs, rhs) => Expr::mul(lhs.into_expr(), rhs.into_expr()),
			ExprDesc::Eq(lhs, rhs) => Expr::eq(lhs.into_expr(), rhs.into_expr()),
			ExprDesc::And(lhs, rhs) => Expr::and(lhs.into_expr(), rhs.into_expr()),
			ExprDesc::Or(lhs, rhs) => Expr::or(lhs.into_expr(), rhs.into_expr()),
			ExprDesc::Witness {
				type_name,
				variant,
				overrides,
			} => Expr::Witness(WitnessExpr {
				type_name: type_name.into_boxed_str(),
				variant: variant.map(String::into_boxed_str),
				overrides: overrides
					.into_iter()
					.map(|(name, expr)| (name.into_boxed_str(), expr.into_expr()))
					.collect(),
			}),
		}
	}
}
