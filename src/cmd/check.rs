use std::path::PathBuf;

use depval::schema::{FieldKind, RegistryDefect, Result, TypeBody, load_registry};

/// Load a registry description, validate it, and print type summaries.
pub fn run(path: PathBuf) -> Result<()> {
	let registry = load_registry(&path)?;

	println!("path: {}", path.display());
	println!("types: {}", registry.types().len());

	for def in registry.types() {
		match &def.body {
			TypeBody::Record(rec) => {
				let index = rec.fields.iter().filter(|field| field.kind == FieldKind::Index).count();
				println!(
					"  record {}: {} index, {} dependent, {} constraints",
					def.name,
					index,
					rec.fields.len() - index,
					rec.constraints.len()
				);
			}
			TypeBody::Union(uni) => {
				println!("  union {}: {} index, {} arms", def.name, uni.index.len(), uni.arms.len());
			}
		}
	}

	for defect in registry.defects() {
		let RegistryDefect::UnreachableArm { union, arm } = defect;
		println!("warning: arm {arm} of union {union} is unreachable");
	}

	Ok(())
}
