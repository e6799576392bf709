use super::{CleanupTask, LevelSelector, PlanError, PlanErrors, SeedPlan, SeedTask, resolve_before};
use crate::config::{CacheBinding, CleanupEntryConfig, SeedEntryConfig, SeedSpec, TileService};
use anyhow::{Context, Result};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tileseed_core::Coverage;
use tileseed_core::time::now;

/// Expands a seed specification in the current layout into jobs.
///
/// Entries resolve independently; failures are collected and reported
/// together after every entry was checked.
pub struct ModernPlanner<'a> {
	spec: &'a SeedSpec,
	service: &'a TileService,
	coverages: BTreeMap<String, Arc<Coverage>>,
}

impl<'a> ModernPlanner<'a> {
	#[must_use]
	pub fn new(spec: &'a SeedSpec, service: &'a TileService) -> ModernPlanner<'a> {
		ModernPlanner {
			spec,
			service,
			coverages: BTreeMap::new(),
		}
	}

	pub fn build(mut self) -> Result<SeedPlan> {
		let spec = self.spec;
		let mut plan = SeedPlan::default();
		let mut failures = Vec::new();

		for (name, entry) in &spec.seeds {
			match self.seed_entry_tasks(name, entry) {
				Ok(tasks) => plan.seeds.extend(tasks),
				Err(error) => failures.push((format!("seeds/{name}"), error)),
			}
		}
		for (name, entry) in &spec.cleanup {
			match self.cleanup_entry_tasks(name, entry) {
				Ok(tasks) => plan.cleanups.extend(tasks),
				Err(error) => failures.push((format!("cleanup/{name}"), error)),
			}
		}

		if failures.is_empty() {
			Ok(plan)
		} else {
			Err(PlanErrors::new(failures).into())
		}
	}

	fn seed_entry_tasks(&mut self, name: &str, entry: &SeedEntryConfig) -> Result<Vec<SeedTask>> {
		let caches = self.entry_caches(&entry.caches)?;
		let grids = applicable_grids(name, entry.grids.as_deref(), &caches)?;
		let selector = LevelSelector::from_config(name, entry.levels.as_ref(), entry.resolutions.as_ref())?;
		let coverage = self.resolve_coverages(&entry.coverages)?;
		let refresh_before = entry.refresh_before.as_ref().map(resolve_before).transpose()?;

		if grids.is_empty() || caches.is_empty() {
			log::warn!("seed entry '{name}' expands into no jobs");
		}

		let mut tasks = Vec::new();
		for grid_name in &grids {
			let grid = self
				.service
				.grids()
				.grid_of(grid_name)
				.ok_or_else(|| PlanError::UnknownGrid { name: grid_name.clone() })?;
			let levels = match &selector {
				Some(selector) => selector.for_grid(grid),
				None => LevelSelector::full_range(grid),
			};
			if levels.is_empty() {
				log::warn!("seed entry '{name}' selects no levels of grid '{grid_name}'");
			}
			// without a coverage the whole grid is seeded
			let task_coverage = match &coverage {
				Some(coverage) => coverage
					.transform_to(grid.srs())
					.with_context(|| format!("cannot use the coverage of '{name}' on grid '{grid_name}'"))?,
				None => Coverage::from_bbox(*grid.bbox(), grid.srs()),
			};
			for cache_name in entry.caches.iter().unique() {
				let binding = caches
					.get(cache_name)
					.ok_or_else(|| PlanError::UnknownCache { name: cache_name.clone() })?;
				let manager = binding.get(grid_name).ok_or_else(|| PlanError::GridNotForCaches {
					entry: name.to_string(),
					grid: grid_name.clone(),
				})?;
				tasks.push(SeedTask {
					name: name.to_string(),
					cache_name: cache_name.clone(),
					grid_name: grid_name.clone(),
					tile_manager: manager.clone(),
					levels: levels.clone(),
					refresh_before,
					coverage: Some(task_coverage.clone()),
				});
			}
		}
		log::debug!("seed entry '{name}' expands into {} jobs", tasks.len());
		Ok(tasks)
	}

	fn cleanup_entry_tasks(&mut self, name: &str, entry: &CleanupEntryConfig) -> Result<Vec<CleanupTask>> {
		let caches = self.entry_caches(&entry.caches)?;
		let grids = applicable_grids(name, entry.grids.as_deref(), &caches)?;
		let selector = LevelSelector::from_config(name, entry.levels.as_ref(), entry.resolutions.as_ref())?;
		let coverage = self.resolve_coverages(&entry.coverages)?;
		// without a threshold everything not refreshed since this moment goes
		let remove_before = match &entry.remove_before {
			Some(param) => resolve_before(param)?,
			None => now(),
		};

		if grids.is_empty() || caches.is_empty() {
			log::warn!("cleanup entry '{name}' expands into no jobs");
		}

		let mut tasks = Vec::new();
		for grid_name in &grids {
			let grid = self
				.service
				.grids()
				.grid_of(grid_name)
				.ok_or_else(|| PlanError::UnknownGrid { name: grid_name.clone() })?;
			let levels = match &selector {
				Some(selector) => selector.for_grid(grid),
				None => LevelSelector::full_range(grid),
			};
			let task_coverage = coverage
				.as_ref()
				.map(|coverage| {
					coverage
						.transform_to(grid.srs())
						.with_context(|| format!("cannot use the coverage of '{name}' on grid '{grid_name}'"))
				})
				.transpose()?;
			for cache_name in entry.caches.iter().unique() {
				let binding = caches
					.get(cache_name)
					.ok_or_else(|| PlanError::UnknownCache { name: cache_name.clone() })?;
				let manager = binding.get(grid_name).ok_or_else(|| PlanError::GridNotForCaches {
					entry: name.to_string(),
					grid: grid_name.clone(),
				})?;
				tasks.push(CleanupTask {
					name: name.to_string(),
					cache_name: cache_name.clone(),
					grid_name: grid_name.clone(),
					tile_manager: manager.clone(),
					levels: levels.clone(),
					remove_before,
					coverage: task_coverage.clone(),
				});
			}
		}
		log::debug!("cleanup entry '{name}' expands into {} jobs", tasks.len());
		Ok(tasks)
	}

	/// Looks up every cache the entry references.
	fn entry_caches(&self, cache_names: &[String]) -> Result<BTreeMap<String, &'a CacheBinding>, PlanError> {
		let mut caches = BTreeMap::new();
		for name in cache_names.iter().unique() {
			let binding = self
				.service
				.cache(name)
				.ok_or_else(|| PlanError::UnknownCache { name: name.clone() })?;
			caches.insert(name.clone(), binding);
		}
		Ok(caches)
	}

	/// Resolves one named coverage, building it at most once per plan.
	fn resolve_coverage(&mut self, name: &str) -> Result<Arc<Coverage>, PlanError> {
		if let Some(coverage) = self.coverages.get(name) {
			return Ok(coverage.clone());
		}
		let config = self
			.spec
			.coverages
			.get(name)
			.ok_or_else(|| PlanError::UnknownCoverage { name: name.to_string() })?;
		let coverage = config.build().map_err(|error| PlanError::InvalidCoverage {
			name: name.to_string(),
			reason: format!("{error:#}"),
		})?;
		let coverage = Arc::new(coverage);
		self.coverages.insert(name.to_string(), coverage.clone());
		Ok(coverage)
	}

	/// Combines the referenced coverages of one entry into a single one,
	/// or `None` if the entry references no coverages.
	fn resolve_coverages(&mut self, names: &[String]) -> Result<Option<Coverage>, PlanError> {
		if names.is_empty() {
			return Ok(None);
		}
		let parts = names
			.iter()
			.map(|name| self.resolve_coverage(name).map(|coverage| (*coverage).clone()))
			.collect::<Result<Vec<_>, PlanError>>()?;
		Ok(Some(Coverage::union(parts).expect("parts are never empty")))
	}
}

/// The grids an entry works on.
///
/// With an explicit `grids` list every named grid must be available in
/// all referenced caches. Without one the caches must agree on a single
/// grid set, which is used completely.
fn applicable_grids(
	entry: &str,
	explicit: Option<&[String]>,
	caches: &BTreeMap<String, &CacheBinding>,
) -> Result<Vec<String>, PlanError> {
	match explicit {
		Some(names) => {
			let mut sets = caches.values().map(|binding| binding.keys().collect::<BTreeSet<_>>());
			let Some(first) = sets.next() else {
				return Err(PlanError::NoCaches {
					entry: entry.to_string(),
				});
			};
			let available = sets.fold(first, |acc, set| acc.intersection(&set).copied().collect());
			let mut grids = Vec::new();
			for name in names.iter().unique() {
				if !available.contains(name) {
					return Err(PlanError::GridNotForCaches {
						entry: entry.to_string(),
						grid: name.clone(),
					});
				}
				grids.push(name.clone());
			}
			Ok(grids)
		}
		None => {
			let mut bindings = caches.values();
			let Some(first) = bindings.next() else {
				return Ok(Vec::new());
			};
			let reference: BTreeSet<&String> = first.keys().collect();
			for binding in bindings {
				let set: BTreeSet<&String> = binding.keys().collect();
				if set != reference {
					return Err(PlanError::GridMismatch {
						entry: entry.to_string(),
					});
				}
			}
			Ok(reference.into_iter().cloned().collect())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::ServiceConfig;
	use pretty_assertions::assert_eq;

	const SERVICE: &str = "
grids:
  coarse:
    srs: 'EPSG:3857'
    levels: 8
  webmercator:
    srs: 'EPSG:3857'
    levels: 19
  wgs84:
    srs: 'EPSG:4326'
    levels: 18
caches:
  osm:
    grids: [webmercator, wgs84]
    store: 'file://cache_data/osm'
  roads:
    grids: [webmercator, wgs84]
    store: 'file://cache_data/roads'
  overview:
    grids: [coarse]
    store: 'file://cache_data/overview'
";

	fn service() -> TileService {
		ServiceConfig::from_string(SERVICE).unwrap().resolve().unwrap()
	}

	fn entry_caches<'s>(service: &'s TileService, names: &[&str]) -> BTreeMap<String, &'s CacheBinding> {
		names
			.iter()
			.map(|name| (name.to_string(), service.cache(name).unwrap()))
			.collect()
	}

	#[test]
	fn common_grids_of_identical_caches() {
		let service = service();
		let caches = entry_caches(&service, &["osm", "roads"]);
		let grids = applicable_grids("e", None, &caches).unwrap();
		assert_eq!(grids, ["webmercator", "wgs84"]);
	}

	#[test]
	fn differing_grid_sets_are_rejected() {
		let service = service();
		let caches = entry_caches(&service, &["osm", "overview"]);
		let error = applicable_grids("e", None, &caches).unwrap_err();
		assert_eq!(
			error,
			PlanError::GridMismatch {
				entry: "e".to_string()
			}
		);
	}

	#[test]
	fn explicit_grids_must_be_available_everywhere() {
		let service = service();
		let caches = entry_caches(&service, &["osm", "roads"]);

		let grids = applicable_grids("e", Some(&["wgs84".to_string()]), &caches).unwrap();
		assert_eq!(grids, ["wgs84"]);

		let error = applicable_grids("e", Some(&["coarse".to_string()]), &caches).unwrap_err();
		assert_eq!(
			error,
			PlanError::GridNotForCaches {
				entry: "e".to_string(),
				grid: "coarse".to_string()
			}
		);
	}

	#[test]
	fn explicit_grids_keep_their_order() {
		let service = service();
		let caches = entry_caches(&service, &["osm"]);
		let named = ["wgs84".to_string(), "webmercator".to_string(), "wgs84".to_string()];
		let grids = applicable_grids("e", Some(&named), &caches).unwrap();
		assert_eq!(grids, ["wgs84", "webmercator"]);
	}

	#[test]
	fn explicit_grids_without_caches_are_an_error() {
		let error = applicable_grids("e", Some(&["wgs84".to_string()]), &BTreeMap::new()).unwrap_err();
		assert_eq!(error, PlanError::NoCaches { entry: "e".to_string() });

		// without explicit grids an entry without caches is just empty
		assert_eq!(applicable_grids("e", None, &BTreeMap::new()).unwrap(), Vec::<String>::new());
	}

	#[test]
	fn coverages_resolve_once_per_plan() {
		let spec: SeedSpec = serde_yaml_ng::from_str(
			"
coverages:
  germany:
    bbox: [5.4, 47.2, 15.1, 55.0]
",
		)
		.unwrap();
		let service = service();
		let mut planner = ModernPlanner::new(&spec, &service);

		let first = planner.resolve_coverage("germany").unwrap();
		let second = planner.resolve_coverage("germany").unwrap();
		assert!(Arc::ptr_eq(&first, &second));

		let error = planner.resolve_coverage("atlantis").unwrap_err();
		assert_eq!(
			error,
			PlanError::UnknownCoverage {
				name: "atlantis".to_string()
			}
		);
	}

	#[test]
	fn multiple_coverages_become_a_union() {
		let spec: SeedSpec = serde_yaml_ng::from_str(
			"
coverages:
  north: {bbox: [0.0, 50.0, 10.0, 60.0]}
  south: {bbox: [0.0, 40.0, 10.0, 50.0]}
",
		)
		.unwrap();
		let service = service();
		let mut planner = ModernPlanner::new(&spec, &service);

		let coverage = planner
			.resolve_coverages(&["north".to_string(), "south".to_string()])
			.unwrap()
			.unwrap();
		assert_eq!(coverage.extent().as_tuple(), (0.0, 40.0, 10.0, 60.0));

		assert_eq!(planner.resolve_coverages(&[]).unwrap(), None);
	}
}
