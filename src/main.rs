#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "depval", about = "Dependent-field schema value tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Check {
		registry: PathBuf,
	},
	Defaults {
		registry: PathBuf,
		#[arg(long = "type")]
		type_name: Option<String>,
		#[arg(long, default_value_t = 1)]
		depth: u32,
	},
	Construct {
		registry: PathBuf,
		input: PathBuf,
		#[arg(long, default_value_t = 1)]
		depth: u32,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> depval::schema::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Check { registry } => cmd::check::run(registry),
		Commands::Defaults { registry, type_name, depth } => cmd::defaults::run(registry, type_name, depth),
		Commands::Construct { registry, input, depth } => cmd::construct::run(registry, input, depth),
	}
}
