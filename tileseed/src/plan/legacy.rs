use super::{CleanupTask, LevelSelector, PlanError, PlanErrors, SeedPlan, SeedTask, resolve_before};
use crate::config::{LegacySeedConfig, LegacySpec, TileService};
use anyhow::{Context, Result};

/// Expands a seed specification in the legacy `views` layout into jobs.
///
/// Legacy entries are keyed by cache name and reference views. Every view
/// seeds each matching grid of the cache; a `remove_before` threshold
/// additionally plans a full-range cleanup per grid.
pub struct LegacyPlanner<'a> {
	spec: &'a LegacySpec,
	service: &'a TileService,
}

impl<'a> LegacyPlanner<'a> {
	#[must_use]
	pub fn new(spec: &'a LegacySpec, service: &'a TileService) -> LegacyPlanner<'a> {
		LegacyPlanner { spec, service }
	}

	pub fn build(self) -> Result<SeedPlan> {
		let mut plan = SeedPlan::default();
		let mut failures = Vec::new();

		for (cache_name, entry) in &self.spec.seeds {
			match self.entry_tasks(cache_name, entry) {
				Ok((seeds, cleanups)) => {
					plan.seeds.extend(seeds);
					plan.cleanups.extend(cleanups);
				}
				Err(error) => failures.push((format!("seeds/{cache_name}"), error)),
			}
		}

		if failures.is_empty() {
			Ok(plan)
		} else {
			Err(PlanErrors::new(failures).into())
		}
	}

	fn entry_tasks(
		&self,
		cache_name: &str,
		entry: &LegacySeedConfig,
	) -> Result<(Vec<SeedTask>, Vec<CleanupTask>)> {
		let remove_before = entry.remove_before.as_ref().map(resolve_before).transpose()?;
		let pairs = self
			.service
			.grid_managers(cache_name)
			.ok_or_else(|| PlanError::UnknownCache {
				name: cache_name.to_string(),
			})?;

		let mut seeds = Vec::new();
		let mut cleanups = Vec::new();
		for view_name in &entry.views {
			let view = self
				.spec
				.views
				.get(view_name)
				.ok_or_else(|| PlanError::UnknownView {
					name: view_name.clone(),
				})?;
			let coverage = view
				.coverage()
				.with_context(|| format!("view '{view_name}' has an invalid coverage"))?;
			let srs_filter = view
				.srs_filter()
				.with_context(|| format!("view '{view_name}' has an invalid srs filter"))?;
			let [from, to] = view.level;

			for (grid, manager) in &pairs {
				if let Some(filter) = &srs_filter {
					if !filter.contains(&grid.srs()) {
						continue;
					}
				}
				let grid_name = self
					.service
					.grids()
					.name_of(grid)
					.ok_or_else(|| PlanError::UnknownGrid {
						name: format!("{grid:?}"),
					})?;
				let task_coverage = coverage
					.as_ref()
					.map(|coverage| {
						coverage
							.transform_to(grid.srs())
							.with_context(|| format!("cannot use the coverage of view '{view_name}' on grid '{grid_name}'"))
					})
					.transpose()?;

				seeds.push(SeedTask {
					name: view_name.clone(),
					cache_name: cache_name.to_string(),
					grid_name: grid_name.to_string(),
					tile_manager: manager.clone(),
					levels: (from..=to).collect(),
					refresh_before: remove_before,
					coverage: task_coverage,
				});

				// a removal threshold also plans a full cleanup per grid
				if let Some(remove_before) = remove_before {
					cleanups.push(CleanupTask {
						name: view_name.clone(),
						cache_name: cache_name.to_string(),
						grid_name: grid_name.to_string(),
						tile_manager: manager.clone(),
						levels: LevelSelector::full_range(grid),
						remove_before,
						coverage: None,
					});
				}
			}
		}
		log::debug!(
			"legacy seed entry '{cache_name}' expands into {} seed and {} cleanup jobs",
			seeds.len(),
			cleanups.len()
		);
		Ok((seeds, cleanups))
	}
}
