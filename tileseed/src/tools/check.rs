use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tileseed::plan::load_plan;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// seed specification (YAML)
	#[arg()]
	seed_spec: PathBuf,

	/// tile service configuration with grids and caches (YAML)
	#[arg()]
	service_config: PathBuf,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let plan = load_plan(&arguments.seed_spec, &arguments.service_config)?;

	println!(
		"{} {} seed and {} cleanup jobs",
		"specification ok:".green().bold(),
		plan.seeds.len(),
		plan.cleanups.len()
	);
	Ok(())
}
