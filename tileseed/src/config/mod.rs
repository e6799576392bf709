//! Seed and tile-service configuration.
//!
//! Two YAML files drive the planner:
//! - [`SpecFile`]: the seed specification with seeding and cleanup entries.
//!   Both the current layout ([`SeedSpec`]) and the legacy `views` layout
//!   ([`LegacySpec`]) are supported; the format is detected while loading.
//! - [`ServiceConfig`]: the grids and caches of the tile service the
//!   specification refers to.

mod coverage;
mod legacy;
mod seed;
mod service;

pub use coverage::CoverageConfig;
pub use legacy::{LegacySeedConfig, LegacySpec, ViewConfig};
pub use seed::{BeforeParam, CleanupEntryConfig, LevelsParam, ResolutionsParam, SeedEntryConfig, SeedSpec};
pub use service::{CacheBinding, CacheConfig, GridConfig, ServiceConfig, TileService};

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A loaded seed specification in either of the two supported layouts.
///
/// A top-level `views` key marks the legacy layout; everything else
/// parses as the current one.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecFile {
	Modern(SeedSpec),
	Legacy(LegacySpec),
}

impl SpecFile {
	pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
		let mut text = String::new();
		reader.read_to_string(&mut text)?;
		Self::from_string(&text)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(text)?;
		if value.is_null() {
			return Ok(SpecFile::Modern(SeedSpec::default()));
		}
		if value.get("views").is_some() {
			Ok(SpecFile::Legacy(serde_yaml_ng::from_value(value)?))
		} else {
			Ok(SpecFile::Modern(serde_yaml_ng::from_value(value)?))
		}
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("cannot open {path:?}"))?;
		Self::from_reader(BufReader::new(file)).with_context(|| format!("cannot parse {path:?}"))
	}
}
