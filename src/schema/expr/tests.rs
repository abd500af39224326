use crate::schema::SchemaError;
use crate::schema::defaults::make_record;
use crate::schema::expr::{Env, Expr, evaluate};
use crate::schema::registry::{DeclaredType, FieldDef, Registry, RegistryBuilder, TypeDef};
use crate::schema::value::Value;

fn point_registry() -> Registry {
	RegistryBuilder::new()
		.ty(TypeDef::record(
			"Pt",
			vec![
				FieldDef::index("i", DeclaredType::Int),
				FieldDef::dependent("x", DeclaredType::Int),
				FieldDef::dependent("y", DeclaredType::Str),
			],
			Vec::new(),
		))
		.finish()
		.expect("registry builds")
}

#[test]
fn addition_wraps_at_i64_max() {
	let registry = point_registry();
	let expr = Expr::add(Expr::Int(i64::MAX), Expr::Int(1));
	let value = evaluate(&registry, "Pt", &expr, &Env::new()).expect("evaluates");
	assert!(matches!(value, Value::Int(v) if v == i64::MIN));
}

#[test]
fn multiplication_wraps() {
	let registry = point_registry();
	let expr = Expr::mul(Expr::Int(i64::MAX), Expr::Int(2));
	let value = evaluate(&registry, "Pt", &expr, &Env::new()).expect("evaluates");
	assert!(matches!(value, Value::Int(v) if v == -2));
}

#[test]
fn negation_of_i64_min_wraps_to_itself() {
	let registry = point_registry();
	let expr = Expr::neg(Expr::Int(i64::MIN));
	let value = evaluate(&registry, "Pt", &expr, &Env::new()).expect("evaluates");
	assert!(matches!(value, Value::Int(v) if v == i64::MIN));
}

#[test]
fn string_addition_concatenates() {
	let registry = point_registry();
	let expr = Expr::add(Expr::str("foo"), Expr::str("bar"));
	let value = evaluate(&registry, "Pt", &expr, &Env::new()).expect("evaluates");
	assert!(matches!(value, Value::Str(v) if v.as_ref() == "foobar"));
}

#[test]
fn unbound_path_reports_owner_and_path() {
	let registry = point_registry();
	let err = evaluate(&registry, "Pt", &Expr::path("nope"), &Env::new()).expect_err("path is unbound");
	match err {
		SchemaError::UnboundField { type_name, path } => {
			assert_eq!(type_name, "Pt");
			assert_eq!(path, "nope");
		}
		other => panic!("expected UnboundField, got {other:?}"),
	}
}

#[test]
fn record_binding_exposes_dotted_paths() {
	let registry = point_registry();
	let point = make_record(&registry, "Pt", &[("x", Value::Int(4))]).expect("point builds");

	let mut env = Env::new();
	env.bind("p", &point);

	let x = evaluate(&registry, "Pt", &Expr::path("p.x"), &env).expect("nested path resolves");
	assert!(matches!(x, Value::Int(4)));
	let i = evaluate(&registry, "Pt", &Expr::path("p.i"), &env).expect("index path resolves");
	assert!(matches!(i, Value::Int(0)));
}

#[test]
fn equality_over_witnesses_is_deep() {
	let registry = point_registry();
	let env = Env::new();

	let same = Expr::eq(
		Expr::witness("Pt", vec![("x", Expr::Int(1))]),
		Expr::witness("Pt", vec![("x", Expr::Int(1))]),
	);
	assert!(matches!(evaluate(&registry, "Pt", &same, &env).expect("evaluates"), Value::Bool(true)));

	let different = Expr::eq(
		Expr::witness("Pt", vec![("x", Expr::Int(1))]),
		Expr::witness("Pt", vec![("x", Expr::Int(2))]),
	);
	assert!(matches!(evaluate(&registry, "Pt", &different, &env).expect("evaluates"), Value::Bool(false)));
}

#[test]
fn and_short_circuits_without_evaluating_rhs() {
	let registry = point_registry();
	let expr = Expr::and(Expr::Bool(false), Expr::path("missing"));
	let value = evaluate(&registry, "Pt", &expr, &Env::new()).expect("lhs decides");
	assert!(matches!(value, Value::Bool(false)));
}

#[test]
fn or_short_circuits_without_evaluating_rhs() {
	let registry = point_registry();
	let expr = Expr::or(Expr::Bool(true), Expr::path("missing"));
	let value = evaluate(&registry, "Pt", &expr, &Env::new()).expect("lhs decides");
	assert!(matches!(value, Value::Bool(true)));
}

#[test]
fn negating_a_string_is_a_type_mismatch() {
	let registry = point_registry();
	let err = evaluate(&registry, "Pt", &Expr::neg(Expr::str("oops")), &Env::new()).expect_err("mismatch");
	assert!(matches!(err, SchemaError::EvalTypeMismatch { expected: "int", .. }));
}
