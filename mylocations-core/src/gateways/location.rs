use mylocations_entities::geo::Distance;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl AuthorizationStatus {
    pub fn is_denied(self) -> bool {
        matches!(self, Self::Denied | Self::Restricted)
    }
}

/// Failures reported by a location provider while streaming.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The provider could not determine a location right now but keeps trying.
    #[error("Location currently unknown")]
    LocationUnknown,
    #[error("Access to location services denied")]
    Denied,
    #[error("{0}")]
    Other(String),
}

/// A source of location fixes.
///
/// Fixes and failures are not returned from these methods. They are
/// delivered asynchronously to [`CurrentLocation`](crate::current_location::CurrentLocation).
pub trait LocationProvider {
    fn authorization_status(&self) -> AuthorizationStatus;
    fn request_when_in_use_authorization(&self);
    fn location_services_enabled(&self) -> bool;
    fn set_desired_accuracy(&self, accuracy: Distance);
    fn start_updating_location(&self);
    fn stop_updating_location(&self);
}
