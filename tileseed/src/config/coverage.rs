use anyhow::Result;
use serde::Deserialize;
use tileseed_core::{BBox, Coverage, Srs};

/// A named coverage definition in a seed specification.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CoverageConfig {
	/// Covered area as `[west, south, east, north]`.
	pub bbox: [f64; 4],

	/// Reference system of `bbox`, defaults to `EPSG:4326`.
	pub srs: Option<String>,
}

impl CoverageConfig {
	pub fn build(&self) -> Result<Coverage> {
		let srs = match &self.srs {
			Some(text) => Srs::parse(text)?,
			None => Srs::WGS84,
		};
		Ok(Coverage::from_bbox(BBox::from_array(self.bbox)?, srs))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn build_with_default_srs() {
		let config: CoverageConfig = serde_yaml_ng::from_str("bbox: [5.4, 47.2, 15.1, 55.0]").unwrap();
		let coverage = config.build().unwrap();
		assert_eq!(
			coverage,
			Coverage::from_bbox(BBox::new(5.4, 47.2, 15.1, 55.0).unwrap(), Srs::WGS84)
		);
	}

	#[test]
	fn build_with_explicit_srs() {
		let config: CoverageConfig =
			serde_yaml_ng::from_str("bbox: [600000, 5200000, 1700000, 7400000]\nsrs: 'EPSG:3857'").unwrap();
		assert_eq!(config.build().unwrap().extent().x_min, 600_000.0);
	}

	#[test]
	fn build_rejects_bad_input() {
		let config = CoverageConfig {
			bbox: [15.1, 47.2, 5.4, 55.0],
			srs: None,
		};
		assert!(config.build().is_err());

		let config = CoverageConfig {
			bbox: [5.4, 47.2, 15.1, 55.0],
			srs: Some("EPSG:nope".to_string()),
		};
		assert!(config.build().is_err());
	}
}
