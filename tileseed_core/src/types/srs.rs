use crate::types::BBox;
use anyhow::{Result, bail, ensure};
use serde::{Serialize, Serializer};
use std::fmt::{Debug, Display};
use std::str::FromStr;

static MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;
static MAX_MERCATOR_LNG: f64 = 180.0;
static RADIUS: f64 = 6_378_137.0; // meters

/// Half the circumference of the spherical-mercator world in meters.
static MERCATOR_EXTENT: f64 = 20_037_508.342_789_244;

/// A spatial reference system identified by its EPSG code.
///
/// Coordinate transformations are supported between the two systems that tile
/// grids commonly use: WGS84 (`EPSG:4326`) and spherical Web Mercator
/// (`EPSG:3857`). Other codes can be parsed and compared, but transforming
/// between them returns an error.
///
/// # Examples
///
/// ```
/// use tileseed_core::Srs;
///
/// let srs = Srs::parse("EPSG:3857").unwrap();
/// assert_eq!(srs, Srs::WEB_MERCATOR);
/// assert_eq!(srs.to_string(), "EPSG:3857");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Srs(u32);

impl Srs {
	/// Geographic coordinates in degrees, `EPSG:4326`.
	pub const WGS84: Srs = Srs(4326);
	/// Spherical Web Mercator in meters, `EPSG:3857`.
	pub const WEB_MERCATOR: Srs = Srs(3857);

	#[must_use]
	pub fn from_epsg(code: u32) -> Srs {
		Srs(code)
	}

	/// Parses a spatial reference from a string like `"EPSG:4326"`.
	///
	/// The `EPSG:` prefix is matched case-insensitively and may be omitted.
	pub fn parse(text: &str) -> Result<Srs> {
		let text = text.trim();
		let code = text
			.strip_prefix("EPSG:")
			.or_else(|| text.strip_prefix("epsg:"))
			.unwrap_or(text);
		match code.parse::<u32>() {
			Ok(code) => Ok(Srs(code)),
			Err(_) => bail!("'{text}' is not a valid spatial reference, expected e.g. 'EPSG:4326'"),
		}
	}

	#[must_use]
	pub fn code(&self) -> u32 {
		self.0
	}

	/// Returns the full extent of this reference system, if it is known.
	#[must_use]
	pub fn known_extent(&self) -> Option<BBox> {
		match *self {
			Srs::WGS84 => Some(BBox {
				x_min: -180.0,
				y_min: -90.0,
				x_max: 180.0,
				y_max: 90.0,
			}),
			Srs::WEB_MERCATOR => Some(BBox {
				x_min: -MERCATOR_EXTENT,
				y_min: -MERCATOR_EXTENT,
				x_max: MERCATOR_EXTENT,
				y_max: MERCATOR_EXTENT,
			}),
			_ => None,
		}
	}

	/// Transforms a single point from this reference system into `to`.
	///
	/// Latitudes are clamped to the valid Web Mercator domain
	/// (`-85.05112877980659° ≤ lat ≤ 85.05112877980659°`) before projecting.
	pub fn transform_point(&self, to: Srs, x: f64, y: f64) -> Result<(f64, f64)> {
		if *self == to {
			return Ok((x, y));
		}
		match (*self, to) {
			(Srs::WGS84, Srs::WEB_MERCATOR) => {
				let lon = x.clamp(-MAX_MERCATOR_LNG, MAX_MERCATOR_LNG);
				let lat = y.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
				let phi = lat.to_radians();
				Ok((
					RADIUS * lon.to_radians(),
					RADIUS * ((std::f64::consts::FRAC_PI_4 + phi / 2.0).tan()).ln(),
				))
			}
			(Srs::WEB_MERCATOR, Srs::WGS84) => {
				let x = x.clamp(-MERCATOR_EXTENT, MERCATOR_EXTENT);
				let y = y.clamp(-MERCATOR_EXTENT, MERCATOR_EXTENT);
				let lat = 2.0 * (y / RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2;
				Ok(((x / RADIUS).to_degrees(), lat.to_degrees()))
			}
			_ => bail!("cannot transform coordinates from {self} to {to}"),
		}
	}

	/// Transforms a bounding box from this reference system into `to`.
	///
	/// Both supported projections are monotonic per axis, so transforming the
	/// two corners is sufficient.
	pub fn transform_bbox(&self, to: Srs, bbox: &BBox) -> Result<BBox> {
		if *self == to {
			return Ok(*bbox);
		}
		let (x_min, y_min) = self.transform_point(to, bbox.x_min, bbox.y_min)?;
		let (x_max, y_max) = self.transform_point(to, bbox.x_max, bbox.y_max)?;
		ensure!(
			x_min <= x_max && y_min <= y_max,
			"transforming {bbox:?} from {self} to {to} produced an inverted bbox"
		);
		Ok(BBox {
			x_min,
			y_min,
			x_max,
			y_max,
		})
	}
}

impl Display for Srs {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "EPSG:{}", self.0)
	}
}

impl Debug for Srs {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		Display::fmt(self, f)
	}
}

impl FromStr for Srs {
	type Err = anyhow::Error;
	fn from_str(text: &str) -> Result<Srs> {
		Srs::parse(text)
	}
}

impl Serialize for Srs {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}
