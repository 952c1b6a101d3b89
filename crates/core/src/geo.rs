//! Geolocation of photos.
//!
//! The client acquires a position asynchronously and reports one of three
//! outcomes. Only [`LocationFix::Acquired`] attaches coordinates to a photo;
//! a denied or unavailable fix is recorded as "no location" rather than as an
//! error.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting coordinates outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::validation(format!(
                "Latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::validation(format!(
                "Longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Outcome of a geolocation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum LocationFix {
    Acquired { latitude: f64, longitude: f64 },
    /// The user refused the permission prompt.
    Denied,
    /// No position source, or it timed out.
    #[default]
    Unavailable,
}

impl LocationFix {
    /// Resolve the fix into the optional location stored on a photo.
    pub fn into_point(self) -> Result<Option<GeoPoint>, CoreError> {
        match self {
            Self::Acquired {
                latitude,
                longitude,
            } => GeoPoint::new(latitude, longitude).map(Some),
            Self::Denied | Self::Unavailable => Ok(None),
        }
    }
}
