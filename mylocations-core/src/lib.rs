//! # mylocations-core
//!
//! Acquisition of the current location and the form for tagging it.
//!
//! Nothing in here talks to a platform directly: location updates,
//! reverse geocoding and timeouts are requested through the traits in
//! [`gateways`] and their results are fed back into the controllers by
//! whoever runs the event loop.

pub mod current_location;
pub mod gateways;
pub mod location_details;

mod error;

pub use self::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub mod entities {
    pub use mylocations_entities::{
        address::*, category::*, fix::*, geo::*, tagged_location::*, time::*,
    };
}
