#![allow(missing_docs)]

use depval::schema::{
	Builder, Constraint, DeclaredType, Expr, FieldDef, Registry, RegistryBuilder, SchemaError, TypeDef, Value, default_value, full_equals, make,
};

fn fixture_registry() -> Registry {
	RegistryBuilder::new()
		.ty(TypeDef::record(
			"Inner",
			vec![FieldDef::index("i", DeclaredType::Int), FieldDef::dependent("v", DeclaredType::Int)],
			Vec::new(),
		))
		.ty(TypeDef::record(
			"Holder",
			vec![
				FieldDef::index("y", DeclaredType::Int),
				FieldDef::index("n", DeclaredType::Int),
				FieldDef::dependent("k1", DeclaredType::Named("Inner".into())),
			],
			vec![Constraint::new("k1.i", Expr::add(Expr::path("y"), Expr::path("n")))],
		))
		.ty(TypeDef::record(
			"Sq",
			vec![FieldDef::index("m", DeclaredType::Int), FieldDef::dependent("w", DeclaredType::Int)],
			Vec::new(),
		))
		.ty(TypeDef::record(
			"Box",
			vec![FieldDef::dependent("s", DeclaredType::Named("Sq".into()))],
			vec![Constraint::new(
				"s.w",
				Expr::add(Expr::path("s.m"), Expr::mul(Expr::path("s.m"), Expr::path("s.m"))),
			)],
		))
		.finish()
		.expect("fixture registry builds")
}

fn inner(registry: &Registry, i: i64, v: i64) -> Value {
	Builder::new(registry, "Inner")
		.expect("builder starts")
		.index("i", Value::Int(i))
		.expect("index binds")
		.dependent("v", Value::Int(v))
		.expect("dependent binds")
		.finish()
		.expect("inner validates")
}

#[test]
fn constraint_violation_names_the_exact_field() {
	let registry = fixture_registry();
	let bad = inner(&registry, 5, 0);

	let err = Builder::new(&registry, "Holder")
		.expect("builder starts")
		.index("y", Value::Int(0))
		.expect("y binds")
		.index("n", Value::Int(0))
		.expect("n binds")
		.dependent("k1", bad)
		.expect("k1 binds")
		.finish()
		.expect_err("constraint must fail");

	match err {
		SchemaError::InvalidValue { field, expected, actual } => {
			assert_eq!(field, "k1.i");
			assert_eq!(expected, "0");
			assert_eq!(actual, "5");
		}
		other => panic!("expected InvalidValue, got {other:?}"),
	}
}

#[test]
fn matching_dependency_constructs() {
	let registry = fixture_registry();
	let good = inner(&registry, 3, 9);

	let value = Builder::new(&registry, "Holder")
		.expect("builder starts")
		.index("y", Value::Int(1))
		.expect("y binds")
		.index("n", Value::Int(2))
		.expect("n binds")
		.dependent("k1", good)
		.expect("k1 binds")
		.finish()
		.expect("holder validates");

	assert!(matches!(value, Value::Record(rec) if rec.type_name.as_ref() == "Holder"));
}

#[test]
fn two_level_nesting_accepts_only_the_computed_value() {
	let registry = fixture_registry();

	let sq = |w: i64| {
		Builder::new(&registry, "Sq")
			.expect("builder starts")
			.index("m", Value::Int(2))
			.expect("m binds")
			.dependent("w", Value::Int(w))
			.expect("w binds")
			.finish()
			.expect("sq validates")
	};

	let good = Builder::new(&registry, "Box")
		.expect("builder starts")
		.dependent("s", sq(6))
		.expect("s binds")
		.finish();
	assert!(good.is_ok(), "inner value 6 satisfies m + m*m for m = 2");

	let err = Builder::new(&registry, "Box")
		.expect("builder starts")
		.dependent("s", sq(5))
		.expect("s binds")
		.finish()
		.expect_err("inner value 5 must fail");
	match err {
		SchemaError::InvalidValue { field, expected, actual } => {
			assert_eq!(field, "s.w");
			assert_eq!(expected, "6");
			assert_eq!(actual, "5");
		}
		other => panic!("expected InvalidValue, got {other:?}"),
	}
}

#[test]
fn every_type_defaults_and_is_reflexive() {
	let registry = fixture_registry();
	for def in registry.types() {
		let first = default_value(&registry, &def.name).expect("default constructs");
		let second = default_value(&registry, &def.name).expect("default constructs again");
		assert!(full_equals(&first, &first), "default of {} must equal itself", def.name);
		assert!(full_equals(&first, &second), "defaults of {} must agree", def.name);
	}
}

#[test]
fn setters_are_write_once() {
	let registry = fixture_registry();
	let err = Builder::new(&registry, "Inner")
		.expect("builder starts")
		.index("i", Value::Int(1))
		.expect("first bind works")
		.index("i", Value::Int(2))
		.expect_err("second bind must fail");
	assert!(matches!(err, SchemaError::FieldRebound { field, .. } if field == "i"));
}

#[test]
fn missing_dependent_field_fails() {
	let registry = fixture_registry();
	let err = Builder::new(&registry, "Inner")
		.expect("builder starts")
		.index("i", Value::Int(1))
		.expect("index binds")
		.finish()
		.expect_err("v was never supplied");
	assert!(matches!(err, SchemaError::MissingField { field, .. } if field == "v"));
}

#[test]
fn declared_type_is_enforced_on_bind() {
	let registry = fixture_registry();
	let err = Builder::new(&registry, "Holder")
		.expect("builder starts")
		.dependent("k1", Value::Int(3))
		.expect_err("k1 expects an Inner record");
	match err {
		SchemaError::DeclaredTypeMismatch { field, expected, got, .. } => {
			assert_eq!(field, "k1");
			assert_eq!(expected, "Inner");
			assert_eq!(got, "int");
		}
		other => panic!("expected DeclaredTypeMismatch, got {other:?}"),
	}
}

#[test]
fn make_overwrites_and_revalidates() {
	let registry = fixture_registry();

	// Default Holder carries Inner{i = 0}, which satisfies y + n = 0.
	let value = make(&registry, "Holder", &[]).expect("zero default validates");
	assert!(matches!(value, Value::Record(_)));

	let bad = inner(&registry, 5, 0);
	let err = make(&registry, "Holder", &[("k1", bad)]).expect_err("override is re-validated");
	assert!(matches!(err, SchemaError::InvalidValue { field, .. } if field == "k1.i"));
}

#[test]
fn make_rejects_unknown_override_names() {
	let registry = fixture_registry();
	let err = make(&registry, "Inner", &[("ghost", Value::Int(1))]).expect_err("unknown override");
	assert!(matches!(err, SchemaError::UnknownField { field, .. } if field == "ghost"));
}

#[test]
fn make_rejects_index_overrides() {
	let registry = fixture_registry();
	let err = make(&registry, "Inner", &[("i", Value::Int(1))]).expect_err("index fields are not overridable");
	assert!(matches!(err, SchemaError::WrongFieldKind { field, .. } if field == "i"));
}
