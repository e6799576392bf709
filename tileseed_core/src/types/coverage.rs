use crate::types::{BBox, Srs};
use anyhow::{Result, ensure};
use serde::Serialize;

/// The area of interest of a seeding or cleanup job.
///
/// A coverage is either a single bounding box in some spatial reference
/// system or a union of several coverages. Unions keep their parts as
/// loaded; parts may use different reference systems until the coverage
/// is transformed into a common one with [`transform_to`](Self::transform_to).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
	Bbox { bbox: BBox, srs: Srs },
	Union(Vec<Coverage>),
}

impl Coverage {
	#[must_use]
	pub fn from_bbox(bbox: BBox, srs: Srs) -> Coverage {
		Coverage::Bbox { bbox, srs }
	}

	/// Combines multiple coverages into one. A single part collapses into
	/// itself instead of a one-element union.
	pub fn union(mut parts: Vec<Coverage>) -> Result<Coverage> {
		ensure!(!parts.is_empty(), "coverage union needs at least one part");
		if parts.len() == 1 {
			return Ok(parts.remove(0));
		}
		Ok(Coverage::Union(parts))
	}

	/// Returns the same coverage expressed in the reference system `to`.
	pub fn transform_to(&self, to: Srs) -> Result<Coverage> {
		match self {
			Coverage::Bbox { bbox, srs } => Ok(Coverage::Bbox {
				bbox: srs.transform_bbox(to, bbox)?,
				srs: to,
			}),
			Coverage::Union(parts) => Ok(Coverage::Union(
				parts.iter().map(|part| part.transform_to(to)).collect::<Result<Vec<_>>>()?,
			)),
		}
	}

	/// The smallest bounding box covering all parts.
	///
	/// Only meaningful when all parts share one reference system, which
	/// [`transform_to`](Self::transform_to) guarantees.
	#[must_use]
	pub fn extent(&self) -> BBox {
		match self {
			Coverage::Bbox { bbox, .. } => *bbox,
			Coverage::Union(parts) => {
				let mut iter = parts.iter().map(Coverage::extent);
				let first = iter.next().expect("union is never empty");
				iter.fold(first, |acc, bbox| acc.extended(&bbox))
			}
		}
	}

	/// Checks whether any part of the coverage overlaps `bbox`.
	#[must_use]
	pub fn intersects(&self, bbox: &BBox) -> bool {
		match self {
			Coverage::Bbox { bbox: own, .. } => own.intersects(bbox),
			Coverage::Union(parts) => parts.iter().any(|part| part.intersects(bbox)),
		}
	}

	/// Checks whether a single part of the coverage fully contains `bbox`.
	#[must_use]
	pub fn contains(&self, bbox: &BBox) -> bool {
		match self {
			Coverage::Bbox { bbox: own, .. } => own.contains(bbox),
			Coverage::Union(parts) => parts.iter().any(|part| part.contains(bbox)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn bbox(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> BBox {
		BBox::new(x_min, y_min, x_max, y_max).unwrap()
	}

	#[test]
	fn test_union_collapses_single_part() {
		let part = Coverage::from_bbox(bbox(0.0, 0.0, 1.0, 1.0), Srs::WGS84);
		assert_eq!(Coverage::union(vec![part.clone()]).unwrap(), part);
		assert!(Coverage::union(vec![]).is_err());
	}

	#[test]
	fn test_extent() {
		let coverage = Coverage::union(vec![
			Coverage::from_bbox(bbox(0.0, 0.0, 10.0, 10.0), Srs::WGS84),
			Coverage::from_bbox(bbox(-5.0, 2.0, 3.0, 20.0), Srs::WGS84),
		])
		.unwrap();
		assert_eq!(coverage.extent(), bbox(-5.0, 0.0, 10.0, 20.0));
	}

	#[test]
	fn test_transform_to() {
		let coverage = Coverage::from_bbox(bbox(-180.0, -90.0, 180.0, 90.0), Srs::WGS84);
		let transformed = coverage.transform_to(Srs::WEB_MERCATOR).unwrap();
		let extent = transformed.extent();
		assert!((extent.x_min + 20_037_508.34).abs() < 0.01);
		assert!((extent.x_max - 20_037_508.34).abs() < 0.01);

		// identity transform keeps the coverage untouched
		assert_eq!(coverage.transform_to(Srs::WGS84).unwrap(), coverage);
	}

	#[test]
	fn test_intersects() {
		let coverage = Coverage::union(vec![
			Coverage::from_bbox(bbox(0.0, 0.0, 1.0, 1.0), Srs::WGS84),
			Coverage::from_bbox(bbox(5.0, 5.0, 6.0, 6.0), Srs::WGS84),
		])
		.unwrap();
		assert!(coverage.intersects(&bbox(0.5, 0.5, 0.6, 0.6)));
		assert!(coverage.intersects(&bbox(5.5, 5.5, 7.0, 7.0)));
		assert!(!coverage.intersects(&bbox(2.0, 2.0, 3.0, 3.0)));
	}

	#[test]
	fn test_contains() {
		let coverage = Coverage::union(vec![
			Coverage::from_bbox(bbox(0.0, 0.0, 1.0, 1.0), Srs::WGS84),
			Coverage::from_bbox(bbox(5.0, 5.0, 6.0, 6.0), Srs::WGS84),
		])
		.unwrap();
		assert!(coverage.contains(&bbox(0.2, 0.2, 0.8, 0.8)));
		// spanning both parts is not contained in either single part
		assert!(!coverage.contains(&bbox(0.5, 0.5, 5.5, 5.5)));
	}
}
