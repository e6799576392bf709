//! Turning a seed specification into concrete jobs.
//!
//! [`build_plan`] resolves every entry of a [`SpecFile`] against a
//! [`TileService`] and returns the expanded [`SeedPlan`]. Entries are
//! resolved independently; if any of them fail, the collected failures
//! come back as one [`PlanErrors`] and no plan is produced.

mod builder;
mod error;
mod legacy;
mod levels;
mod registry;
mod task;
mod timestamp;

pub use builder::ModernPlanner;
pub use error::{PlanError, PlanErrors};
pub use legacy::LegacyPlanner;
pub use levels::LevelSelector;
pub use registry::GridRegistry;
pub use task::{CleanupTask, SeedPlan, SeedTask};
pub use timestamp::resolve_before;

use crate::config::{ServiceConfig, SpecFile, TileService};
use anyhow::Result;
use std::path::Path;

/// Expands a seed specification into seed and cleanup jobs.
pub fn build_plan(spec: &SpecFile, service: &TileService) -> Result<SeedPlan> {
	match spec {
		SpecFile::Modern(spec) => ModernPlanner::new(spec, service).build(),
		SpecFile::Legacy(spec) => LegacyPlanner::new(spec, service).build(),
	}
}

/// Loads a seed specification and a tile-service configuration and plans the jobs.
pub fn load_plan(spec_path: &Path, service_path: &Path) -> Result<SeedPlan> {
	let service = ServiceConfig::from_path(service_path)?.resolve()?;
	let spec = SpecFile::from_path(spec_path)?;
	let plan = build_plan(&spec, &service)?;
	log::info!(
		"planned {} seed and {} cleanup jobs from {spec_path:?}",
		plan.seeds.len(),
		plan.cleanups.len()
	);
	Ok(plan)
}
