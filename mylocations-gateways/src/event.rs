use mylocations_core::gateways::{
    geocode::{GeocodeRequestId, GeocodeResult},
    location::{AuthorizationStatus, LocationError},
    timer::TimerId,
};
use mylocations_entities::fix::LocationFix;
use tokio::sync::mpsc;

/// Callbacks from the gateways, delivered to the event loop.
#[derive(Debug)]
pub enum Event {
    AuthorizationChanged(AuthorizationStatus),
    LocationsUpdated(Vec<LocationFix>),
    LocationFailed(LocationError),
    GeocodeCompleted {
        id: GeocodeRequestId,
        result: GeocodeResult,
    },
    TimedOut(TimerId),
    /// The provider has nothing more to deliver.
    TrackFinished,
}

pub type EventSender = mpsc::UnboundedSender<Event>;
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

pub(crate) fn send(tx: &EventSender, event: Event) {
    if tx.send(event).is_err() {
        log::debug!("Event loop has already finished");
    }
}
