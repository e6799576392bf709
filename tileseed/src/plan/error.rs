use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Reasons a seed or cleanup entry cannot be resolved into jobs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
	#[error("grid '{grid}' is not defined for all caches of '{entry}'")]
	GridNotForCaches { entry: String, grid: String },

	#[error("caches of '{entry}' require identical grids")]
	GridMismatch { entry: String },

	#[error("'{entry}' selects grids but references no caches")]
	NoCaches { entry: String },

	#[error("no coverage '{name}' configured")]
	UnknownCoverage { name: String },

	#[error("no cache '{name}' configured")]
	UnknownCache { name: String },

	#[error("no view '{name}' configured")]
	UnknownView { name: String },

	#[error("no grid '{name}' configured")]
	UnknownGrid { name: String },

	#[error("'{value}' is not a valid timestamp")]
	InvalidTimestamp { value: String },

	#[error("'{entry}' configures both 'levels' and 'resolutions'")]
	LevelsAndResolutions { entry: String },

	#[error("coverage '{name}' is invalid: {reason}")]
	InvalidCoverage { name: String, reason: String },
}

/// All entries that failed to resolve, with what went wrong for each.
///
/// Entries are isolated during planning: one broken entry does not stop
/// the others from being checked, but any failure discards the plan.
#[derive(Debug)]
pub struct PlanErrors {
	pub failures: Vec<(String, anyhow::Error)>,
}

impl PlanErrors {
	#[must_use]
	pub fn new(failures: Vec<(String, anyhow::Error)>) -> PlanErrors {
		PlanErrors { failures }
	}
}

impl Display for PlanErrors {
	fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
		let noun = if self.failures.len() == 1 { "entry" } else { "entries" };
		writeln!(f, "{} {noun} cannot be resolved:", self.failures.len())?;
		for (entry, error) in &self.failures {
			writeln!(f, "  {entry}: {error:#}")?;
		}
		Ok(())
	}
}

impl std::error::Error for PlanErrors {}
