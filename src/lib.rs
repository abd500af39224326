//! Runtime for schema values with dependent fields: construction-time
//! constraint checking, guarded union dispatch, two named equalities, and
//! depth-bounded rendering.

/// Registry metadata, value construction, equality, and rendering.
pub mod schema;
