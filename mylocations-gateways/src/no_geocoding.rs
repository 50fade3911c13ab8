use crate::event::{self, Event, EventSender};
use mylocations_core::gateways::geocode::{GeocodeError, GeocodeRequestId, ReverseGeocodingGateway};
use mylocations_entities::geo::Coordinate;

/// Used when no geocoding service is configured: every request fails.
#[derive(Debug, Clone)]
pub struct NoGeocoding {
    tx: EventSender,
}

impl NoGeocoding {
    pub fn new(tx: EventSender) -> Self {
        Self { tx }
    }
}

impl ReverseGeocodingGateway for NoGeocoding {
    fn reverse_geocode(&self, id: GeocodeRequestId, pos: Coordinate) {
        log::debug!("Cannot resolve the address of {pos} because no geocoding gateway was configured");
        event::send(
            &self.tx,
            Event::GeocodeCompleted {
                id,
                result: Err(GeocodeError::NotConfigured),
            },
        );
    }
}
