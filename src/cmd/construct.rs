use std::fs;
use std::path::PathBuf;

use depval::schema::{Result, ValueDesc, build_value, load_registry, render_depth};

/// Construct a value from a JSON input file and render it.
pub fn run(registry_path: PathBuf, input_path: PathBuf, depth: u32) -> Result<()> {
	let registry = load_registry(&registry_path)?;
	let text = fs::read_to_string(&input_path)?;
	let desc: ValueDesc = serde_json::from_str(&text)?;

	let value = build_value(&registry, &desc)?;

	println!("path: {}", input_path.display());
	println!("type: {}", value.type_label());
	println!("value: {}", render_depth(&value, depth));

	Ok(())
}
