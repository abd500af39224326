use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors produced while building registries, constructing values, and
/// evaluating constraint expressions.
#[derive(Debug, Error)]
pub enum SchemaError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Registry or value description was not valid JSON.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// A declared constraint failed during construction.
	#[error("constraint failed for {field}: expected {expected}, actual {actual}")]
	InvalidValue {
		/// Dotted path of the offending field.
		field: String,
		/// Rendered value the constraint expression produced.
		expected: String,
		/// Rendered value actually bound at the field path.
		actual: String,
	},
	/// No union guard matched, or the payload did not fit the selected arm.
	#[error("unresolved variant for {type_name}: {detail}")]
	UnresolvedVariant {
		/// Union type being constructed.
		type_name: String,
		/// What went wrong during dispatch.
		detail: String,
	},
	/// A constraint or guard referenced a field path that does not resolve.
	///
	/// This is a type-definition defect, raised while the registry is built.
	#[error("unbound field path {path} referenced by {type_name}")]
	UnboundField {
		/// Type whose constraint or guard holds the bad reference.
		type_name: String,
		/// Offending dotted path.
		path: String,
	},
	/// Requested type name is not declared in the registry.
	#[error("type not found: {name}")]
	TypeNotFound {
		/// Requested type name.
		name: String,
	},
	/// Two type declarations share one name.
	#[error("duplicate type: {name}")]
	DuplicateType {
		/// Duplicated type name.
		name: String,
	},
	/// Two field declarations on one type share one name.
	#[error("duplicate field {field} on {type_name}")]
	DuplicateField {
		/// Owning type name.
		type_name: String,
		/// Duplicated field name.
		field: String,
	},
	/// Caller named a field the type does not declare.
	#[error("unknown field {field} on {type_name}")]
	UnknownField {
		/// Owning type name.
		type_name: String,
		/// Requested field name.
		field: String,
	},
	/// Field exists but has the wrong kind for the requested operation.
	#[error("field {field} on {type_name} is not {expected}")]
	WrongFieldKind {
		/// Owning type name.
		type_name: String,
		/// Offending field name.
		field: String,
		/// Kind the operation required.
		expected: &'static str,
	},
	/// A write-once construction setter was called twice for one field.
	#[error("field {field} on {type_name} is already bound")]
	FieldRebound {
		/// Owning type name.
		type_name: String,
		/// Rebound field name.
		field: String,
	},
	/// Construction finished without supplying a declared field.
	#[error("field {field} on {type_name} was not supplied")]
	MissingField {
		/// Owning type name.
		type_name: String,
		/// Missing field name.
		field: String,
	},
	/// Supplied value does not match the field's declared type.
	#[error("field {field} on {type_name} expects {expected}, got {got}")]
	DeclaredTypeMismatch {
		/// Owning type name.
		type_name: String,
		/// Offending field name.
		field: String,
		/// Declared type label.
		expected: String,
		/// Runtime kind of the supplied value.
		got: &'static str,
	},
	/// Union construction finished without a variant payload.
	#[error("no payload supplied for union {type_name}")]
	MissingPayload {
		/// Union type being constructed.
		type_name: String,
	},
	/// Operation requires a record type.
	#[error("type {name} is not a record")]
	NotARecord {
		/// Requested type name.
		name: String,
	},
	/// Operation requires a union type.
	#[error("type {name} is not a union")]
	NotAUnion {
		/// Requested type name.
		name: String,
	},
	/// Variant name is not declared by any arm of the union.
	#[error("variant {variant} is not declared by union {union}")]
	UnknownVariant {
		/// Owning union name.
		union: String,
		/// Requested variant name.
		variant: String,
	},
	/// Variant record's index fields do not mirror the union's.
	#[error("variant {variant} does not mirror the index fields of union {union}")]
	VariantIndexMismatch {
		/// Owning union name.
		union: String,
		/// Offending variant name.
		variant: String,
	},
	/// Union arm declares no acceptable variants.
	#[error("arm {arm} of union {union} declares no variants")]
	EmptyUnionArm {
		/// Owning union name.
		union: String,
		/// Zero-based arm position.
		arm: usize,
	},
	/// Expression evaluated to an unexpected runtime kind.
	#[error("expression type mismatch: expected {expected}, got {got}")]
	EvalTypeMismatch {
		/// Required runtime kind.
		expected: &'static str,
		/// Actual runtime kind.
		got: String,
	},
	/// Field path expression syntax is invalid.
	#[error("invalid field path: {path}")]
	InvalidFieldPath {
		/// Original path string.
		path: String,
	},
}
