use anyhow::{Result, ensure};
use serde::{Serialize, Serializer};
use std::fmt::Debug;

/// An axis-aligned bounding box in the units of some spatial reference system:
/// degrees for geographic systems, meters for projected ones.
///
/// The box is defined by four `f64` values:
/// - `x_min` (west): minimum x coordinate.
/// - `y_min` (south): minimum y coordinate.
/// - `x_max` (east): maximum x coordinate.
/// - `y_max` (north): maximum y coordinate.
///
/// # Examples
///
/// ```
/// use tileseed_core::BBox;
///
/// let bbox = BBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
/// assert_eq!(bbox.as_tuple(), (-10.0, -5.0, 10.0, 5.0));
/// assert_eq!(bbox.width(), 20.0);
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct BBox {
	pub x_min: f64,
	pub y_min: f64,
	pub x_max: f64,
	pub y_max: f64,
}

impl BBox {
	/// Creates a new `BBox` from four `f64` values: `west, south, east, north`.
	///
	/// Returns an error if any coordinate is not finite or if a minimum
	/// exceeds its maximum.
	///
	/// # Examples
	/// ```
	/// use tileseed_core::BBox;
	///
	/// let bbox = BBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
	/// assert_eq!(bbox.x_min, -10.0);
	/// assert!(BBox::new(10.0, -5.0, -10.0, 5.0).is_err());
	/// ```
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<BBox> {
		BBox {
			x_min,
			y_min,
			x_max,
			y_max,
		}
		.checked()
	}

	/// Creates a new `BBox` from an array in the order `[west, south, east, north]`.
	pub fn from_array(values: [f64; 4]) -> Result<BBox> {
		BBox::new(values[0], values[1], values[2], values[3])
	}

	fn checked(self) -> Result<BBox> {
		ensure!(
			self.as_array().iter().all(|v| v.is_finite()),
			"bbox values must be finite, got {self:?}"
		);
		ensure!(
			self.x_min <= self.x_max,
			"x_min ({}) must not exceed x_max ({})",
			self.x_min,
			self.x_max
		);
		ensure!(
			self.y_min <= self.y_max,
			"y_min ({}) must not exceed y_max ({})",
			self.y_min,
			self.y_max
		);
		Ok(self)
	}

	/// Returns the bounding box as a fixed-size array `[west, south, east, north]`.
	#[must_use]
	pub fn as_array(&self) -> [f64; 4] {
		[self.x_min, self.y_min, self.x_max, self.y_max]
	}

	/// Returns the bounding box as a tuple `(x_min, y_min, x_max, y_max)`.
	#[must_use]
	pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
		(self.x_min, self.y_min, self.x_max, self.y_max)
	}

	#[must_use]
	pub fn width(&self) -> f64 {
		self.x_max - self.x_min
	}

	#[must_use]
	pub fn height(&self) -> f64 {
		self.y_max - self.y_min
	}

	/// Expands the bounding box in place so that it also covers `other`.
	///
	/// # Examples
	/// ```
	/// use tileseed_core::BBox;
	///
	/// let mut bbox1 = BBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
	/// let bbox2 = BBox::new(-12.0, -3.0, 8.0, 6.0).unwrap();
	/// bbox1.extend(&bbox2);
	/// assert_eq!(bbox1.as_tuple(), (-12.0, -5.0, 10.0, 6.0));
	/// ```
	pub fn extend(&mut self, other: &BBox) {
		self.x_min = self.x_min.min(other.x_min);
		self.y_min = self.y_min.min(other.y_min);
		self.x_max = self.x_max.max(other.x_max);
		self.y_max = self.y_max.max(other.y_max);
	}

	/// Non-mutating version of [`extend`](Self::extend).
	#[must_use]
	pub fn extended(mut self, other: &BBox) -> BBox {
		self.extend(other);
		self
	}

	/// Checks whether `self` and `other` share any area. Boxes that only
	/// touch at an edge or corner count as intersecting.
	#[must_use]
	pub fn intersects(&self, other: &BBox) -> bool {
		self.x_min <= other.x_max
			&& self.x_max >= other.x_min
			&& self.y_min <= other.y_max
			&& self.y_max >= other.y_min
	}

	/// Checks whether `other` lies completely inside `self`, borders included.
	#[must_use]
	pub fn contains(&self, other: &BBox) -> bool {
		self.x_min <= other.x_min
			&& self.x_max >= other.x_max
			&& self.y_min <= other.y_min
			&& self.y_max >= other.y_max
	}
}

impl Debug for BBox {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"BBox({}, {}, {}, {})",
			self.x_min, self.y_min, self.x_max, self.y_max
		)
	}
}

impl Serialize for BBox {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.as_array().serialize(serializer)
	}
}
