use crate::gateways::{geocode::GeocodeError, location::LocationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Location services are not authorized for this app")]
    AuthorizationDenied,
    #[error("Location services are disabled")]
    ProviderUnavailable,
    #[error("The location is currently unknown")]
    TransientFixUnknown,
    #[error("Timed out while searching for a location")]
    Timeout,
    #[error("No address found: {0}")]
    GeocodeFailure(#[from] GeocodeError),
    #[error("Error getting location: {0}")]
    Provider(String),
    #[error("No location has been found yet")]
    NoLocation,
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
}

impl From<LocationError> for Error {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::LocationUnknown => Self::TransientFixUnknown,
            LocationError::Denied => Self::AuthorizationDenied,
            LocationError::Other(msg) => Self::Provider(msg),
        }
    }
}

impl Error {
    /// Errors that only mean "try again later" and are never shown.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientFixUnknown)
    }
}
