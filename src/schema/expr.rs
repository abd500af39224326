use std::collections::HashMap;

use crate::schema::cmp::full_equals;
use crate::schema::defaults::{make_record, make_union};
use crate::schema::registry::{Registry, TypeBody};
use crate::schema::value::Value;
use crate::schema::{Result, SchemaError};

/// Unary operator in a constraint expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
	/// Integer negation, wrapping.
	Neg,
	/// Boolean negation.
	Not,
}

/// Binary operator in a constraint expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
	/// Integer addition (wrapping) or string concatenation.
	Add,
	/// Integer subtraction, wrapping.
	Sub,
	/// Integer multiplication, wrapping.
	Mul,
	/// Deep structural equality, yields a boolean.
	Eq,
	/// Short-circuit boolean and.
	And,
	/// Short-circuit boolean or.
	Or,
}

/// A comparison value constructed from another type's defaults.
#[derive(Debug, Clone)]
pub struct WitnessExpr {
	/// Type the witness instantiates.
	pub type_name: Box<str>,
	/// Variant selection when the type is a union.
	pub variant: Option<Box<str>>,
	/// Dependent fields overwritten on the default instance.
	pub overrides: Vec<(Box<str>, Expr)>,
}

/// Compiled constraint expression tree.
#[derive(Debug, Clone)]
pub enum Expr {
	/// Integer literal.
	Int(i64),
	/// Boolean literal. `Bool(true)` doubles as the catch-all guard.
	Bool(bool),
	/// String literal.
	Str(Box<str>),
	/// Dotted field path lookup in the binding environment.
	Path(Box<str>),
	/// Unary operation.
	Unary(UnaryOp, Box<Expr>),
	/// Binary operation.
	Binary(BinOp, Box<Expr>, Box<Expr>),
	/// Witness construction, compared against via `Eq` or constraints.
	Witness(WitnessExpr),
}

impl Expr {
	/// Field path lookup.
	pub fn path(path: &str) -> Self {
		Expr::Path(path.to_owned().into_boxed_str())
	}

	/// String literal.
	pub fn str(text: &str) -> Self {
		Expr::Str(text.to_owned().into_boxed_str())
	}

	/// Wrapping integer addition or string concatenation.
	pub fn add(lhs: Expr, rhs: Expr) -> Self {
		Expr::Binary(BinOp::Add, Box::new(lhs), Box::new(rhs))
	}

	/// Wrapping integer subtraction.
	pub fn sub(lhs: Expr, rhs: Expr) -> Self {
		Expr::Binary(BinOp::Sub, Box::new(lhs), Box::new(rhs))
	}

	/// Wrapping integer multiplication.
	pub fn mul(lhs: Expr, rhs: Expr) -> Self {
		Expr::Binary(BinOp::Mul, Box::new(lhs), Box::new(rhs))
	}

	/// Deep structural equality.
	pub fn eq(lhs: Expr, rhs: Expr) -> Self {
		Expr::Binary(BinOp::Eq, Box::new(lhs), Box::new(rhs))
	}

	/// Short-circuit boolean and.
	pub fn and(lhs: Expr, rhs: Expr) -> Self {
		Expr::Binary(BinOp::And, Box::new(lhs), Box::new(rhs))
	}

	/// Short-circuit boolean or.
	pub fn or(lhs: Expr, rhs: Expr) -> Self {
		Expr::Binary(BinOp::Or, Box::new(lhs), Box::new(rhs))
	}

	/// Boolean negation.
	pub fn not(inner: Expr) -> Self {
		Expr::Unary(UnaryOp::Not, Box::new(inner))
	}

	/// Wrapping integer negation.
	pub fn neg(inner: Expr) -> Self {
		Expr::Unary(UnaryOp::Neg, Box::new(inner))
	}

	/// Witness over a record type's defaults.
	pub fn witness(type_name: &str, overrides: Vec<(&str, Expr)>) -> Self {
		Expr::Witness(WitnessExpr {
			type_name: type_name.to_owned().into_boxed_str(),
			variant: None,
			overrides: box_overrides(overrides),
		})
	}

	/// Witness over a union type with an explicit variant.
	pub fn witness_variant(type_name: &str, variant: &str, overrides: Vec<(&str, Expr)>) -> Self {
		Expr::Witness(WitnessExpr {
			type_name: type_name.to_owned().into_boxed_str(),
			variant: Some(variant.to_owned().into_boxed_str()),
			overrides: box_overrides(overrides),
		})
	}
}

fn box_overrides(overrides: Vec<(&str, Expr)>) -> Vec<(Box<str>, Expr)> {
	overrides.into_iter().map(|(name, expr)| (name.to_owned().into_boxed_str(), expr)).collect()
}

/// Binding environment mapping dotted field paths to constructed values.
///
/// Binding a record also binds every nested field under a dotted key, so a
/// constraint can reach `k1.i` directly. Union values bind as a single
/// opaque entry; their interior depends on the active variant.
#[derive(Debug, Default)]
pub struct Env {
	bindings: HashMap<Box<str>, Value>,
}

impl Env {
	/// Empty environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind a field value and, for records, its nested fields.
	pub fn bind(&mut self, name: &str, value: &Value) {
		if let Value::Record(rec) = value {
			for field in &rec.fields {
				self.bind(&format!("{name}.{}", field.name), &field.value);
			}
		}
		self.bindings.insert(name.to_owned().into_boxed_str(), value.clone());
	}

	/// Look up a bound dotted path.
	pub fn get(&self, path: &str) -> Option<&Value> {
		self.bindings.get(path)
	}
}

/// Evaluate a constraint expression against bound field values.
///
/// `owner` names the type whose constraint or guard is being evaluated and
/// only feeds error context. An unbound path here means the registry checks
/// were bypassed; it is a type-definition defect, not a caller error.
pub fn evaluate(registry: &Registry, owner: &str, expr: &Expr, env: &Env) -> Result<Value> {
	match expr {
		Expr::Int(value) => Ok(Value::Int(*value)),
		Expr::Bool(value) => Ok(Value::Bool(*value)),
		Expr::Str(value) => Ok(Value::Str(value.clone())),
		Expr::Path(path) => env.get(path).cloned().ok_or_else(|| SchemaError::UnboundField {
			type_name: owner.to_owned(),
			path: path.to_string(),
		}),
		Expr::Unary(op, inner) => {
			let value = evaluate(registry, owner, inner, env)?;
			match (op, value) {
				(UnaryOp::Neg, Value::Int(v)) => Ok(Value::Int(v.wrapping_neg())),
				(UnaryOp::Not, Value::Bool(v)) => Ok(Value::Bool(!v)),
				(UnaryOp::Neg, other) => Err(mismatch("int", &other)),
				(UnaryOp::Not, other) => Err(mismatch("bool", &other)),
			}
		}
		Expr::Binary(op, lhs, rhs) => evaluate_binary(registry, owner, *op, lhs, rhs, env),
		Expr::Witness(witness) => {
			let mut overrides = Vec::with_capacity(witness.overrides.len());
			for (name, value) in &witness.overrides {
				overrides.push((name.as_ref(), evaluate(registry, owner, value, env)?));
			}
			match &witness.variant {
				Some(variant) => make_union(registry, &witness.type_name, Some(variant), &overrides),
				None => match &registry.require(&witness.type_name)?.body {
					TypeBody::Record(_) => make_record(registry, &witness.type_name, &overrides),
					TypeBody::Union(_) => make_union(registry, &witness.type_name, None, &overrides),
				},
			}
		}
	}
}

fn evaluate_binary(registry: &Registry, owner: &str, op: BinOp, lhs: &Expr, rhs: &Expr, env: &Env) -> Result<Value> {
	if matches!(op, BinOp::And | BinOp::Or) {
		let left = expect_bool(evaluate(registry, owner, lhs, env)?)?;
		let short = match op {
			BinOp::And => !left,
			_ => left,
		};
		if short {
			return Ok(Value::Bool(left));
		}
		return Ok(Value::Bool(expect_bool(evaluate(registry, owner, rhs, env)?)?));
	}

	let left = evaluate(registry, owner, lhs, env)?;
	let right = evaluate(registry, owner, rhs, env)?;
	match op {
		BinOp::Eq => Ok(Value::Bool(full_equals(&left, &right))),
		BinOp::Add => match (left, right) {
			(Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(b))),
			(Value::Str(a), Value::Str(b)) => {
				let mut out = String::with_capacity(a.len() + b.len());
				out.push_str(&a);
				out.push_str(&b);
				Ok(Value::Str(out.into_boxed_str()))
			}
			(Value::Int(_), other) | (other, Value::Int(_)) => Err(mismatch("int", &other)),
			(other, _) => Err(mismatch("int or str", &other)),
		},
		BinOp::Sub | BinOp::Mul => match (left, right) {
			(Value::Int(a), Value::Int(b)) => Ok(Value::Int(match op {
				BinOp::Sub => a.wrapping_sub(b),
				_ => a.wrapping_mul(b),
			})),
			(Value::Int(_), other) | (other, _) => Err(mismatch("int", &other)),
		},
		BinOp::And | BinOp::Or => unreachable!("short-circuit ops handled above"),
	}
}

fn expect_bool(value: Value) -> Result<bool> {
	match value {
		Value::Bool(v) => Ok(v),
		other => Err(mismatch("bool", &other)),
	}
}

fn mismatch(expected: &'static str, got: &Value) -> SchemaError {
	SchemaError::EvalTypeMismatch {
		expected,
		got: got.kind_label().to_owned(),
	}
}

#[cfg(test)]
mod tests;
