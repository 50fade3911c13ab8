#![deny(missing_debug_implementations)]
#![cfg_attr(test, deny(warnings))]

//! # mylocations-entities
//!
//! Reusable, agnostic domain entities for MyLocations.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod address;
pub mod category;
pub mod fix;
pub mod geo;
pub mod tagged_location;
pub mod time;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
