//! Gateway implementations that feed the acquisition controller.
//!
//! All gateways report back through one [`EventSender`](event::EventSender),
//! so the event loop handles every callback in delivery order.

pub mod event;
pub mod no_geocoding;
pub mod opencage;
pub mod replay;
pub mod timer;
