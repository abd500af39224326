/// Registry load and validation command.
pub mod check;
/// Value construction command.
pub mod construct;
/// Default instance rendering command.
pub mod defaults;
