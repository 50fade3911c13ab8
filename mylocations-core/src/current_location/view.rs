use super::*;

pub const MSG_START: &str = "Tap 'Get My Location' to Start";
pub const MSG_SEARCHING: &str = "Searching...";
pub const MSG_SERVICES_DISABLED: &str = "Location Services Disabled";
pub const MSG_LOCATION_ERROR: &str = "Error Getting Location";
pub const MSG_SEARCHING_ADDRESS: &str = "Searching for Address...";
pub const MSG_NO_ADDRESS: &str = "No Address Found";

pub const BUTTON_GET_LOCATION: &str = "Get My Location";
pub const BUTTON_STOP: &str = "Stop";

/// What the current location screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentLocationView {
    pub message: String,
    pub latitude: String,
    pub longitude: String,
    pub address: String,
    pub tag_button_visible: bool,
    pub get_button_title: &'static str,
}

impl<P, G, T> CurrentLocation<P, G, T>
where
    P: LocationProvider,
    G: ReverseGeocodingGateway,
    T: TimerGateway,
{
    pub fn view(&self) -> CurrentLocationView {
        let get_button_title = if self.updating_location {
            BUTTON_STOP
        } else {
            BUTTON_GET_LOCATION
        };
        match &self.location {
            Some(fix) => CurrentLocationView {
                message: String::new(),
                latitude: fix.pos.lat_label(),
                longitude: fix.pos.lng_label(),
                address: self.address_text(),
                tag_button_visible: true,
                get_button_title,
            },
            None => CurrentLocationView {
                message: self.status_message().to_string(),
                latitude: String::new(),
                longitude: String::new(),
                address: String::new(),
                tag_button_visible: false,
                get_button_title,
            },
        }
    }

    fn address_text(&self) -> String {
        if let Some(address) = &self.address {
            address.to_multi_line_string()
        } else if self.pending_geocode.is_some() {
            MSG_SEARCHING_ADDRESS.to_string()
        } else if self.last_geocoding_error.is_some() {
            MSG_NO_ADDRESS.to_string()
        } else {
            String::new()
        }
    }

    fn status_message(&self) -> &'static str {
        match &self.last_location_error {
            Some(Error::AuthorizationDenied | Error::ProviderUnavailable) => MSG_SERVICES_DISABLED,
            Some(_) => MSG_LOCATION_ERROR,
            None if !self.provider.location_services_enabled() => MSG_SERVICES_DISABLED,
            None if self.updating_location => MSG_SEARCHING,
            None => MSG_START,
        }
    }
}
