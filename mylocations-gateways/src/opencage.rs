use crate::event::{self, Event, EventSender};
use ::geocoding::{Opencage as OpencageClient, Point};
use mylocations_core::gateways::geocode::{
    GeocodeError, GeocodeRequestId, GeocodeResult, ReverseGeocodingGateway,
};
use mylocations_entities::{address::Address, geo::Coordinate};
use serde_json::Value;
use std::collections::HashMap;

const HOUSE_NUMBER_KEYS: &[&str] = &["house_number"];
const STREET_KEYS: &[&str] = &["road", "street", "pedestrian", "footway", "path"];
const LOCALITY_KEYS: &[&str] = &["city", "town", "village", "hamlet", "municipality"];
const STATE_KEYS: &[&str] = &["state_code", "state", "province"];
const POSTCODE_KEYS: &[&str] = &["postcode"];
const COUNTRY_KEYS: &[&str] = &["country"];

/// Reverse geocoding with the OpenCage API.
///
/// Requests are blocking HTTP calls and run on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct OpenCage {
    api_key: String,
    tx: EventSender,
}

impl OpenCage {
    pub fn new(api_key: String, tx: EventSender) -> Self {
        Self { api_key, tx }
    }
}

impl ReverseGeocodingGateway for OpenCage {
    fn reverse_geocode(&self, id: GeocodeRequestId, pos: Coordinate) {
        let api_key = self.api_key.clone();
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = oc_reverse_geocode(api_key, pos);
            event::send(&tx, Event::GeocodeCompleted { id, result });
        });
    }
}

fn oc_reverse_geocode(oc_api_key: String, pos: Coordinate) -> GeocodeResult {
    let oc_req = OpencageClient::new(oc_api_key);
    let point = Point::new(pos.lng(), pos.lat());
    match oc_req.reverse_full(&point) {
        Ok(res) => {
            let address = res
                .results
                .first()
                .map(|r| address_from_components(&r.components))
                .filter(|addr| !addr.is_empty());
            if let Some(address) = address {
                log::debug!("Resolved address of {pos}: {address:?}");
                Ok(address)
            } else {
                log::info!("No address found for {pos}");
                Err(GeocodeError::NoResult)
            }
        }
        Err(err) => {
            log::warn!("Failed to resolve address of {pos}: {err}");
            Err(GeocodeError::Service(err.to_string()))
        }
    }
}

fn component(components: &HashMap<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| components.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn address_from_components(components: &HashMap<String, Value>) -> Address {
    Address {
        sub_thoroughfare: component(components, HOUSE_NUMBER_KEYS),
        thoroughfare: component(components, STREET_KEYS),
        locality: component(components, LOCALITY_KEYS),
        administrative_area: component(components, STATE_KEYS),
        postal_code: component(components, POSTCODE_KEYS),
        country: component(components, COUNTRY_KEYS),
    }
}
