mod cmp;
mod construct;
mod defaults;
mod desc;
mod error;
mod expr;
mod path;
mod registry;
mod render;
mod value;

/// Full and shape equality over validated values.
pub use cmp::{full_equals, same_shape};
/// Two-phase construction and one-shot entry points.
pub use construct::{Builder, Inputs, construct};
/// Default instances and witness factories.
pub use defaults::{default_value, make, make_record, make_union, zero_of};
/// Serialized registry and value descriptions.
pub use desc::{ArmDesc, ConstraintDesc, ExprDesc, FieldDesc, FieldKindDesc, RegistryDesc, TypeDesc, TypeRefDesc, ValueDesc, build_value, load_registry};
/// Error and result aliases.
pub use error::{Result, SchemaError};
/// Constraint expression trees and evaluation.
pub use expr::{BinOp, Env, Expr, UnaryOp, WitnessExpr, evaluate};
/// Dotted field path parser.
pub use path::FieldPath;
/// Type metadata and registry construction.
pub use registry::{
	Constraint, DeclaredType, FieldDef, FieldKind, RecordDef, Registry, RegistryBuilder, RegistryDefect, TypeBody, TypeDef, UnionArm, UnionDef,
};
/// Depth-bounded value rendering.
pub use render::{render, render_depth};
/// Constructed runtime value types.
pub use value::{FieldValue, RecordValue, UnionValue, Value};
