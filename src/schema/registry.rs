use std::collections::{HashMap, HashSet};

use crate::schema::expr::Expr;
use crate::schema::path::FieldPath;
use crate::schema::{Result, SchemaError};

/// Declared type of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
	/// Signed 64-bit integer with wraparound arithmetic.
	Int,
	/// Boolean.
	Bool,
	/// Text.
	Str,
	/// Another registry type, by name.
	Named(Box<str>),
}

impl DeclaredType {
	/// Human-readable label for error messages.
	pub fn label(&self) -> String {
		match self {
			DeclaredType::Int => "int".to_owned(),
			DeclaredType::Bool => "bool".to_owned(),
			DeclaredType::Str => "str".to_owned(),
			DeclaredType::Named(name) => name.to_string(),
		}
	}
}

/// Whether a field is an index or a dependent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
	/// Fixed at construction, participates in union dispatch.
	Index,
	/// Must satisfy a declared constraint, participates in shape equality.
	Dependent,
}

/// One declared field of a record or union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
	/// Field name.
	pub name: Box<str>,
	/// Index or dependent.
	pub kind: FieldKind,
	/// Declared type.
	pub ty: DeclaredType,
}

impl FieldDef {
	/// Declare an index field.
	pub fn index(name: &str, ty: DeclaredType) -> Self {
		Self {
			name: name.to_owned().into_boxed_str(),
			kind: FieldKind::Index,
			ty,
		}
	}

	/// Declare a dependent field.
	pub fn dependent(name: &str, ty: DeclaredType) -> Self {
		Self {
			name: name.to_owned().into_boxed_str(),
			kind: FieldKind::Dependent,
			ty,
		}
	}
}

/// One construction-time constraint: the value at `field` must match `expr`.
#[derive(Debug, Clone)]
pub struct Constraint {
	/// Dotted path of the constrained field.
	pub field: Box<str>,
	/// Expression producing the expected value.
	pub expr: Expr,
}

impl Constraint {
	/// Declare a constraint on a dotted field path.
	pub fn new(field: &str, expr: Expr) -> Self {
		Self {
			field: field.to_owned().into_boxed_str(),
			expr,
		}
	}
}

/// Record type body: ordered fields plus constraints.
#[derive(Debug, Clone)]
pub struct RecordDef {
	/// Ordered field declarations, index fields first by convention.
	pub fields: Vec<FieldDef>,
	/// Constraints checked in declaration order.
	pub constraints: Vec<Constraint>,
}

/// One guarded arm of a union.
#[derive(Debug, Clone)]
pub struct UnionArm {
	/// Boolean guard over the union's index fields.
	pub guard: Expr,
	/// Record types acceptable as payload when this guard matches first.
	pub variants: Vec<Box<str>>,
}

impl UnionArm {
	/// Declare an arm accepting the listed variant records.
	pub fn new(guard: Expr, variants: &[&str]) -> Self {
		Self {
			guard,
			variants: variants.iter().map(|v| (*v).to_owned().into_boxed_str()).collect(),
		}
	}
}

/// Union type body: shared index fields plus guarded arms.
#[derive(Debug, Clone)]
pub struct UnionDef {
	/// Index fields every variant mirrors.
	pub index: Vec<FieldDef>,
	/// Guard/variant arms, dispatched first-match in declaration order.
	pub arms: Vec<UnionArm>,
}

/// Body of a declared type.
#[derive(Debug, Clone)]
pub enum TypeBody {
	/// Record with constraints.
	Record(RecordDef),
	/// Tagged union with guarded dispatch.
	Union(UnionDef),
}

/// One declared value type.
#[derive(Debug, Clone)]
pub struct TypeDef {
	/// Type name, unique within the registry.
	pub name: Box<str>,
	/// Record or union body.
	pub body: TypeBody,
}

impl TypeDef {
	/// Declare a record type.
	pub fn record(name: &str, fields: Vec<FieldDef>, constraints: Vec<Constraint>) -> Self {
		Self {
			name: name.to_owned().into_boxed_str(),
			body: TypeBody::Record(RecordDef { fields, constraints }),
		}
	}

	/// Declare a union type.
	pub fn union(name: &str, index: Vec<FieldDef>, arms: Vec<UnionArm>) -> Self {
		Self {
			name: name.to_owned().into_boxed_str(),
			body: TypeBody::Union(UnionDef { index, arms }),
		}
	}
}

/// Non-fatal declaration defect recorded while building a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryDefect {
	/// Arm can never be selected because an earlier guard is the literal `true`.
	UnreachableArm {
		/// Owning union name.
		union: Box<str>,
		/// Zero-based position of the dead arm.
		arm: usize,
	},
}

/// Immutable set of declared value types.
///
/// Built once via [`RegistryBuilder`]; construction, equality, and rendering
/// all read type metadata from here without mutating it.
#[derive(Debug)]
pub struct Registry {
	types: Vec<TypeDef>,
	by_name: HashMap<Box<str>, usize>,
	defects: Vec<RegistryDefect>,
}

impl Registry {
	/// Look up a type definition by name.
	pub fn get(&self, name: &str) -> Option<&TypeDef> {
		self.by_name.get(name).map(|idx| &self.types[*idx])
	}

	/// Look up a type definition, failing with `TypeNotFound`.
	pub fn require(&self, name: &str) -> Result<&TypeDef> {
		self.get(name).ok_or_else(|| SchemaError::TypeNotFound { name: name.to_owned() })
	}

	/// All declared types in declaration order.
	pub fn types(&self) -> &[TypeDef] {
		&self.types
	}

	/// Declaration defects recorded at build time.
	pub fn defects(&self) -> &[RegistryDefect] {
		&self.defects
	}
}

/// Accumulates type declarations and validates them into a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
	types: Vec<TypeDef>,
}

impl RegistryBuilder {
	/// Start an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add one type declaration.
	pub fn ty(mut self, def: TypeDef) -> Self {
		self.types.push(def);
		self
	}

	/// Validate all declarations and freeze the registry.
	///
	/// Fatal defects (duplicate names, unknown type references, unresolvable
	/// constraint or guard paths, variant index mismatches) fail here rather
	/// than at construction time. Dead union arms are recorded as
	/// [`RegistryDefect::UnreachableArm`] without failing the build.
	pub fn finish(self) -> Result<Registry> {
		let mut by_name = HashMap::new();
		for (idx, def) in self.types.iter().enumerate() {
			if by_name.insert(def.name.clone(), idx).is_some() {
				return Err(SchemaError::DuplicateType { name: def.name.to_string() });
			}
		}

		let registry = Registry {
			types: self.types,
			by_name,
			defects: Vec::new(),
		};

		let mut defects = Vec::new();
		for def in &registry.types {
			match &def.body {
				TypeBody::Record(rec) => check_record(&registry, &def.name, rec)?,
				TypeBody::Union(uni) => check_union(&registry, &def.name, uni, &mut defects)?,
			}
		}

		Ok(Registry { defects, ..registry })
	}
}

fn check_record(registry: &Registry, owner: &str, rec: &RecordDef) -> Result<()> {
	check_fields(registry, owner, &rec.fields)?;
	for constraint in &rec.constraints {
		resolve_path(registry, owner, &rec.fields, &constraint.field)?;
		check_expr(registry, owner, &rec.fields, &constraint.expr)?;
	}
	Ok(())
}

fn check_union(registry: &Registry, owner: &str, uni: &UnionDef, defects: &mut Vec<RegistryDefect>) -> Result<()> {
	check_fields(registry, owner, &uni.index)?;
	for field in &uni.index {
		if field.kind != FieldKind::Index {
			return Err(SchemaError::WrongFieldKind {
				type_name: owner.to_owned(),
				field: field.name.to_string(),
				expected: "an index field",
			});
		}
	}

	let mut catch_all = None;
	for (idx, arm) in uni.arms.iter().enumerate() {
		if let Some(first) = catch_all {
			if first < idx {
				defects.push(RegistryDefect::UnreachableArm {
					union: owner.to_owned().into_boxed_str(),
					arm: idx,
				});
			}
		} else if matches!(arm.guard, Expr::Bool(true)) {
			catch_all = Some(idx);
		}

		check_expr(registry, owner, &uni.index, &arm.guard)?;

		if arm.variants.is_empty() {
			return Err(SchemaError::EmptyUnionArm {
				union: owner.to_owned(),
				arm: idx,
			});
		}
		for variant in &arm.variants {
			check_variant(registry, owner, uni, variant)?;
		}
	}

	Ok(())
}

fn check_variant(registry: &Registry, owner: &str, uni: &UnionDef, variant: &str) -> Result<()> {
	let def = registry.get(variant).ok_or_else(|| SchemaError::TypeNotFound { name: variant.to_owned() })?;
	let TypeBody::Record(rec) = &def.body else {
		return Err(SchemaError::NotARecord { name: variant.to_owned() });
	};

	let mirrored: Vec<&FieldDef> = rec.fields.iter().filter(|field| field.kind == FieldKind::Index).collect();
	let matches = mirrored.len() == uni.index.len()
		&& mirrored
			.iter()
			.zip(&uni.index)
			.all(|(got, want)| got.name == want.name && got.ty == want.ty);
	if !matches {
		return Err(SchemaError::VariantIndexMismatch {
			union: owner.to_owned(),
			variant: variant.to_owned(),
		});
	}

	Ok(())
}

fn check_fields(registry: &Registry, owner: &str, fields: &[FieldDef]) -> Result<()> {
	let mut seen = HashSet::new();
	for field in fields {
		if !seen.insert(field.name.clone()) {
			return Err(SchemaError::DuplicateField {
				type_name: owner.to_owned(),
				field: field.name.to_string(),
			});
		}
		if let DeclaredType::Named(name) = &field.ty {
			registry.require(name)?;
		}
	}
	Ok(())
}

/// Statically resolve a dotted path against a field list.
///
/// Paths may traverse nested record fields but stop at union fields, whose
/// interior layout depends on the active variant.
pub(crate) fn resolve_path<'r>(registry: &'r Registry, owner: &str, fields: &'r [FieldDef], raw: &str) -> Result<&'r FieldDef> {
	let unbound = || SchemaError::UnboundField {
		type_name: owner.to_owned(),
		path: raw.to_owned(),
	};

	let path = FieldPath::parse(raw)?;
	let mut current = fields;
	let mut resolved = None;

	for (pos, segment) in path.segments.iter().enumerate() {
		let field = current.iter().find(|field| field.name == *segment).ok_or_else(unbound)?;
		if pos + 1 < path.segments.len() {
			let DeclaredType::Named(name) = &field.ty else {
				return Err(unbound());
			};
			let def = registry.get(name).ok_or_else(unbound)?;
			let TypeBody::Record(rec) = &def.body else {
				return Err(unbound());
			};
			current = &rec.fields;
		}
		resolved = Some(field);
	}

	resolved.ok_or_else(unbound)
}

fn check_expr(registry: &Registry, owner: &str, fields: &[FieldDef], expr: &Expr) -> Result<()> {
	match expr {
		Expr::Int(_) | Expr::Bool(_) | Expr::Str(_) => Ok(()),
		Expr::Path(path) => resolve_path(registry, owner, fields, path).map(|_| ()),
		Expr::Unary(_, inner) => check_expr(registry, owner, fields, inner),
		Expr::Binary(_, lhs, rhs) => {
			check_expr(registry, owner, fields, lhs)?;
			check_expr(registry, owner, fields, rhs)
		}
		Expr::Witness(witness) => {
			let def = registry.require(&witness.type_name)?;
			let target = match (&def.body, &witness.variant) {
				(TypeBody::Record(_), None) => witness.type_name.clone(),
				(TypeBody::Record(_), Some(variant)) => {
					return Err(SchemaError::NotAUnion {
						name: format!("{} (variant {variant} requested)", witness.type_name),
					});
				}
				(TypeBody::Union(uni), Some(variant)) => {
					if !uni.arms.iter().any(|arm| arm.variants.iter().any(|v| v.as_ref() == variant.as_ref())) {
						return Err(SchemaError::UnknownVariant {
							union: witness.type_name.to_string(),
							variant: variant.to_string(),
						});
					}
					variant.clone()
				}
				// Variant resolved at runtime by the all-zero index guards.
				(TypeBody::Union(_), None) => witness.type_name.clone(),
			};

			if let TypeBody::Record(rec) = &registry.require(&target)?.body {
				for (name, _) in &witness.overrides {
					let field = rec.fields.iter().find(|field| field.name == *name).ok_or_else(|| SchemaError::UnknownField {
						type_name: target.to_string(),
						field: name.to_string(),
					})?;
					if field.kind != FieldKind::Dependent {
						return Err(SchemaError::WrongFieldKind {
							type_name: target.to_string(),
							field: name.to_string(),
							expected: "a dependent field",
						});
					}
				}
			}

			for (_, value) in &witness.overrides {
				check_expr(registry, owner, fields, value)?;
			}
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests;
