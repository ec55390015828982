//! Axis-aligned bounding regions for camera framing.

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    pub min: Coordinate,
    pub max: Coordinate,
}

/// How a map camera should show a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraFraming {
    /// Everything sits on one spot; center on it.
    Center(Coordinate),
    /// Fit the viewport to the region.
    Fit(BoundingRegion),
}

impl BoundingRegion {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min.latitude + self.max.latitude) / 2.0,
            (self.min.longitude + self.max.longitude) / 2.0,
        )
    }

    /// True when the region collapses to a single point.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        point.latitude >= self.min.latitude
            && point.latitude <= self.max.latitude
            && point.longitude >= self.min.longitude
            && point.longitude <= self.max.longitude
    }

    /// Grows each side by `fraction` of the span, staying within valid range.
    pub fn padded(&self, fraction: f64) -> Self {
        let lat_margin = (self.max.latitude - self.min.latitude) * fraction;
        let lon_margin = (self.max.longitude - self.min.longitude) * fraction;

        Self {
            min: Coordinate::new(self.min.latitude - lat_margin, self.min.longitude - lon_margin)
                .sanitized(),
            max: Coordinate::new(self.max.latitude + lat_margin, self.max.longitude + lon_margin)
                .sanitized(),
        }
    }

    pub fn framing(&self) -> CameraFraming {
        if self.is_degenerate() {
            CameraFraming::Center(self.min)
        } else {
            CameraFraming::Fit(*self)
        }
    }
}

/// Component-wise min/max over the valid points of `path`.
///
/// Invalid points are skipped; `None` when nothing valid remains.
pub fn bounds(path: &[Coordinate]) -> Option<BoundingRegion> {
    let mut valid = path.iter().filter(|point| point.is_valid());
    let first = *valid.next()?;

    Some(valid.fold(
        BoundingRegion {
            min: first,
            max: first,
        },
        |region, point| BoundingRegion {
            min: Coordinate::new(
                region.min.latitude.min(point.latitude),
                region.min.longitude.min(point.longitude),
            ),
            max: Coordinate::new(
                region.max.latitude.max(point.latitude),
                region.max.longitude.max(point.longitude),
            ),
        },
    ))
}
