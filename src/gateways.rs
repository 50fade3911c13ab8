use crate::config::{Config, GeocodingGateway};
use mylocations_core::{
    entities::Coordinate,
    gateways::geocode::{GeocodeRequestId, ReverseGeocodingGateway},
};
use mylocations_gateways::{event::EventSender, no_geocoding::NoGeocoding, opencage::OpenCage};

pub fn geocoding_gateway(cfg: &Config, tx: EventSender) -> GeocodingGw {
    match &cfg.geocoding.gateway {
        Some(GeocodingGateway::OpenCage { api_key }) => {
            GeocodingGw::new(OpenCage::new(api_key.clone(), tx))
        }
        None => {
            log::warn!("Addresses can not be resolved without a geocoding gateway");
            GeocodingGw::new(NoGeocoding::new(tx))
        }
    }
}

pub struct GeocodingGw(Box<dyn ReverseGeocodingGateway + Send + Sync + 'static>);

impl GeocodingGw {
    pub fn new<G>(gw: G) -> Self
    where
        G: ReverseGeocodingGateway + Send + Sync + 'static,
    {
        Self(Box::new(gw))
    }
}

impl ReverseGeocodingGateway for GeocodingGw {
    fn reverse_geocode(&self, id: GeocodeRequestId, pos: Coordinate) {
        self.0.reverse_geocode(id, pos);
    }
}
