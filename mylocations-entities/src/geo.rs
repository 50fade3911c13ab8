use itertools::Itertools;
use std::{fmt, str::FromStr};
use thiserror::Error;

const LAT_DEG_MIN: f64 = -90.0;
const LAT_DEG_MAX: f64 = 90.0;
const LNG_DEG_MIN: f64 = -180.0;
const LNG_DEG_MAX: f64 = 180.0;

/// A geographical position in degrees as reported by a location provider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(lat: LAT, lng: LNG) -> Self {
        let (lat, lng) = (lat.into(), lng.into());
        debug_assert!((LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat));
        debug_assert!((LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng));
        Self { lat, lng }
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Result<Self, CoordinateError> {
        let (lat, lng) = (lat.into(), lng.into());
        if !(LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !(LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng) {
            return Err(CoordinateError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }

    pub const fn lat(self) -> f64 {
        self.lat
    }

    pub const fn lng(self) -> f64 {
        self.lng
    }

    pub fn is_valid(self) -> bool {
        (LAT_DEG_MIN..=LAT_DEG_MAX).contains(&self.lat)
            && (LNG_DEG_MIN..=LNG_DEG_MAX).contains(&self.lng)
    }

    pub fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn to_lat_lng_rad(self) -> (f64, f64) {
        (self.lat.to_radians(), self.lng.to_radians())
    }

    /// Latitude with 8 fractional digits.
    pub fn lat_label(self) -> String {
        format!("{:.8}", self.lat)
    }

    /// Longitude with 8 fractional digits.
    pub fn lng_label(self) -> String {
        format!("{:.8}", self.lng)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Invalid latitude degrees: {0}")]
    Latitude(f64),
    #[error("Invalid longitude degrees: {0}")]
    Longitude(f64),
    #[error("Failed to parse coordinate: {0}")]
    Parse(String),
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((lat_str, lng_str)) = s.split(',').collect_tuple() else {
            return Err(CoordinateError::Parse(s.to_string()));
        };
        match (lat_str.trim().parse::<f64>(), lng_str.trim().parse::<f64>()) {
            (Ok(lat), Ok(lng)) => Self::try_from_lat_lng_deg(lat, lng),
            _ => Err(CoordinateError::Parse(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Distance(pub f64);

impl Distance {
    pub const fn infinite() -> Self {
        Self(f64::INFINITY)
    }

    pub const fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    pub const fn to_meters(self) -> f64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 >= 0.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

const MEAN_EARTH_RADIUS: Distance = Distance::from_meters(6_371_200.0);

impl Coordinate {
    /// Great-circle distance on a sphere with the mean earth radius.
    ///
    /// Uses the Vincenty form of the central angle, which stays accurate for
    /// both tiny and antipodal separations.
    pub fn distance(p1: Coordinate, p2: Coordinate) -> Option<Distance> {
        if !(p1.is_valid() && p2.is_valid()) {
            return None;
        }
        let (phi1, lambda1) = p1.to_lat_lng_rad();
        let (phi2, lambda2) = p2.to_lat_lng_rad();
        let delta_lambda = lambda2 - lambda1;

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let (sin_phi2, cos_phi2) = phi2.sin_cos();
        let (sin_dl, cos_dl) = delta_lambda.sin_cos();

        let y = (cos_phi2 * sin_dl).hypot(cos_phi1 * sin_phi2 - sin_phi1 * cos_phi2 * cos_dl);
        let x = sin_phi1 * sin_phi2 + cos_phi1 * cos_phi2 * cos_dl;
        let central_angle = y.atan2(x);

        Some(Distance::from_meters(
            central_angle * MEAN_EARTH_RADIUS.to_meters(),
        ))
    }

    pub fn distance_to(self, other: Coordinate) -> Option<Distance> {
        Self::distance(self, other)
    }
}
