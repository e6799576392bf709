use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tileseed::core::{Coverage, time::format_timestamp};
use tileseed::plan::{SeedPlan, load_plan};

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// seed specification (YAML)
	#[arg()]
	seed_spec: PathBuf,

	/// tile service configuration with grids and caches (YAML)
	#[arg()]
	service_config: PathBuf,

	/// output format
	#[arg(long, short, value_enum, default_value = "table")]
	format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
	Table,
	Yaml,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let plan = load_plan(&arguments.seed_spec, &arguments.service_config)?;

	match arguments.format {
		Format::Table => print_plan(&plan)?,
		Format::Yaml => print!("{}", serde_yaml_ng::to_string(&plan)?),
	}
	Ok(())
}

fn print_plan(plan: &SeedPlan) -> Result<()> {
	if plan.is_empty() {
		println!("{}", "nothing to do".yellow().bold());
		return Ok(());
	}

	if !plan.seeds.is_empty() {
		println!("{}", "seed jobs:".white().bold());
		for task in &plan.seeds {
			println!("  {}:", task.name.white().bold());
			println!("    tiles: {} on {}", task.cache_name.bright_magenta(), task.grid_name.bright_magenta());
			println!("    store: {}", task.tile_manager.store);
			println!("    levels: {}", format_levels(&task.levels).bright_cyan());
			if let Some(threshold) = task.refresh_before {
				println!("    refresh before: {}", format_timestamp(threshold)?.bright_cyan());
			}
			println!("    coverage: {}", format_coverage(task.coverage.as_ref()));
		}
	}

	if !plan.cleanups.is_empty() {
		println!("{}", "cleanup jobs:".white().bold());
		for task in &plan.cleanups {
			println!("  {}:", task.name.white().bold());
			println!("    tiles: {} on {}", task.cache_name.bright_magenta(), task.grid_name.bright_magenta());
			println!("    store: {}", task.tile_manager.store);
			println!("    levels: {}", format_levels(&task.levels).bright_cyan());
			println!("    remove before: {}", format_timestamp(task.remove_before)?.bright_cyan());
			println!("    coverage: {}", format_coverage(task.coverage.as_ref()));
		}
	}
	Ok(())
}

fn format_coverage(coverage: Option<&Coverage>) -> String {
	match coverage {
		Some(coverage) => format!("{:?}", coverage.extent()),
		None => String::from("whole grid"),
	}
}

/// Collapses consecutive levels into ranges, e.g. `[0, 1, 2, 5]` becomes `0-2,5`.
fn format_levels(levels: &[u8]) -> String {
	let mut parts = Vec::new();
	let mut iter = levels.iter().copied().peekable();
	while let Some(start) = iter.next() {
		let mut end = start;
		while let Some(&next) = iter.peek() {
			if Some(next) != end.checked_add(1) {
				break;
			}
			end = next;
			iter.next();
		}
		if start == end {
			parts.push(start.to_string());
		} else {
			parts.push(format!("{start}-{end}"));
		}
	}
	if parts.is_empty() { String::from("none") } else { parts.join(",") }
}
