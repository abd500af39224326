use std::path::PathBuf;

use depval::schema::{Result, default_value, load_registry, render_depth};

/// Render the default instance of one or all registry types.
pub fn run(path: PathBuf, type_name: Option<String>, depth: u32) -> Result<()> {
	let registry = load_registry(&path)?;

	match type_name {
		Some(name) => {
			let value = default_value(&registry, &name)?;
			println!("{name}: {}", render_depth(&value, depth));
		}
		None => {
			for def in registry.types() {
				let value = default_value(&registry, &def.name)?;
				println!("{}: {}", def.name, render_depth(&value, depth));
			}
		}
	}

	Ok(())
}
