mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Expand a seed specification into seed and cleanup jobs
	Plan(tools::plan::Subcommand),

	/// Validate a seed specification against a tile service
	Check(tools::check::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	// set the log level from the verbosity flag
	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Plan(arguments) => tools::plan::run(arguments),
		Commands::Check(arguments) => tools::check::run(arguments),
	}
}
