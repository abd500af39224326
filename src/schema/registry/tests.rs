use crate::schema::SchemaError;
use crate::schema::expr::Expr;
use crate::schema::registry::{Constraint, DeclaredType, FieldDef, RegistryBuilder, RegistryDefect, TypeDef, UnionArm};

fn mirror_variant(name: &str) -> TypeDef {
	TypeDef::record(
		name,
		vec![FieldDef::index("n", DeclaredType::Int), FieldDef::dependent("f", DeclaredType::Int)],
		Vec::new(),
	)
}

#[test]
fn duplicate_type_names_are_rejected() {
	let err = RegistryBuilder::new()
		.ty(TypeDef::record("A", Vec::new(), Vec::new()))
		.ty(TypeDef::record("A", Vec::new(), Vec::new()))
		.finish()
		.expect_err("duplicate rejected");
	assert!(matches!(err, SchemaError::DuplicateType { name } if name == "A"));
}

#[test]
fn unknown_field_type_is_rejected() {
	let err = RegistryBuilder::new()
		.ty(TypeDef::record(
			"A",
			vec![FieldDef::dependent("x", DeclaredType::Named("Missing".into()))],
			Vec::new(),
		))
		.finish()
		.expect_err("unknown type rejected");
	assert!(matches!(err, SchemaError::TypeNotFound { name } if name == "Missing"));
}

#[test]
fn duplicate_field_names_are_rejected() {
	let err = RegistryBuilder::new()
		.ty(TypeDef::record(
			"A",
			vec![FieldDef::index("x", DeclaredType::Int), FieldDef::dependent("x", DeclaredType::Int)],
			Vec::new(),
		))
		.finish()
		.expect_err("duplicate field rejected");
	assert!(matches!(err, SchemaError::DuplicateField { field, .. } if field == "x"));
}

#[test]
fn constraint_with_unresolvable_path_fails_at_build() {
	let err = RegistryBuilder::new()
		.ty(TypeDef::record(
			"A",
			vec![FieldDef::dependent("x", DeclaredType::Int)],
			vec![Constraint::new("y", Expr::Int(0))],
		))
		.finish()
		.expect_err("unbound target rejected");
	assert!(matches!(err, SchemaError::UnboundField { type_name, path } if type_name == "A" && path == "y"));
}

#[test]
fn constraint_path_through_nested_record_resolves() {
	RegistryBuilder::new()
		.ty(TypeDef::record("Inner", vec![FieldDef::index("i", DeclaredType::Int)], Vec::new()))
		.ty(TypeDef::record(
			"Outer",
			vec![
				FieldDef::index("x", DeclaredType::Int),
				FieldDef::dependent("a", DeclaredType::Named("Inner".into())),
			],
			vec![Constraint::new("a.i", Expr::path("x"))],
		))
		.finish()
		.expect("nested path resolves");
}

#[test]
fn constraint_expression_paths_are_checked_too() {
	let err = RegistryBuilder::new()
		.ty(TypeDef::record(
			"A",
			vec![FieldDef::dependent("x", DeclaredType::Int)],
			vec![Constraint::new("x", Expr::add(Expr::path("ghost"), Expr::Int(1)))],
		))
		.finish()
		.expect_err("expression path rejected");
	assert!(matches!(err, SchemaError::UnboundField { path, .. } if path == "ghost"));
}

#[test]
fn arms_after_catch_all_are_flagged_unreachable() {
	let registry = RegistryBuilder::new()
		.ty(mirror_variant("V1"))
		.ty(mirror_variant("V2"))
		.ty(TypeDef::union(
			"U",
			vec![FieldDef::index("n", DeclaredType::Int)],
			vec![
				UnionArm::new(Expr::Bool(true), &["V1"]),
				UnionArm::new(Expr::eq(Expr::path("n"), Expr::Int(1)), &["V2"]),
			],
		))
		.finish()
		.expect("dead arm is a defect, not an error");

	assert_eq!(
		registry.defects(),
		&[RegistryDefect::UnreachableArm {
			union: "U".into(),
			arm: 1,
		}]
	);
}

#[test]
fn variant_must_mirror_union_index_fields() {
	let err = RegistryBuilder::new()
		.ty(TypeDef::record("Bare", vec![FieldDef::dependent("f", DeclaredType::Int)], Vec::new()))
		.ty(TypeDef::union(
			"U",
			vec![FieldDef::index("n", DeclaredType::Int)],
			vec![UnionArm::new(Expr::Bool(true), &["Bare"])],
		))
		.finish()
		.expect_err("mismatched variant rejected");
	assert!(matches!(err, SchemaError::VariantIndexMismatch { union, variant } if union == "U" && variant == "Bare"));
}

#[test]
fn arm_without_variants_is_rejected() {
	let err = RegistryBuilder::new()
		.ty(TypeDef::union(
			"U",
			vec![FieldDef::index("n", DeclaredType::Int)],
			vec![UnionArm::new(Expr::Bool(true), &[])],
		))
		.finish()
		.expect_err("empty arm rejected");
	assert!(matches!(err, SchemaError::EmptyUnionArm { arm: 0, .. }));
}

#[test]
fn guard_paths_resolve_against_index_fields_only() {
	let err = RegistryBuilder::new()
		.ty(mirror_variant("V1"))
		.ty(TypeDef::union(
			"U",
			vec![FieldDef::index("n", DeclaredType::Int)],
			vec![UnionArm::new(Expr::eq(Expr::path("f"), Expr::Int(1)), &["V1"])],
		))
		.finish()
		.expect_err("guard over dependent field rejected");
	assert!(matches!(err, SchemaError::UnboundField { path, .. } if path == "f"));
}

#[test]
fn union_index_declarations_must_be_index_kind() {
	let err = RegistryBuilder::new()
		.ty(TypeDef::union(
			"U",
			vec![FieldDef::dependent("n", DeclaredType::Int)],
			vec![],
		))
		.finish()
		.expect_err("dependent index slot rejected");
	assert!(matches!(err, SchemaError::WrongFieldKind { field, .. } if field == "n"));
}
