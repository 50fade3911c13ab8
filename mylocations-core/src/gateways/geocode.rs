use mylocations_entities::{address::Address, geo::Coordinate};
use thiserror::Error;

/// Identifies one reverse geocoding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeocodeRequestId(u64);

impl GeocodeRequestId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u64 {
        self.0
    }

    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("no placemark found")]
    NoResult,
    #[error("no geocoding service configured")]
    NotConfigured,
    #[error("{0}")]
    Service(String),
}

pub type GeocodeResult = Result<Address, GeocodeError>;

pub trait ReverseGeocodingGateway {
    /// Start resolving `pos` into an address.
    ///
    /// The result must be handed to
    /// [`CurrentLocation::handle_geocode_completed`](crate::current_location::CurrentLocation::handle_geocode_completed)
    /// together with `id`.
    fn reverse_geocode(&self, id: GeocodeRequestId, pos: Coordinate);
}
