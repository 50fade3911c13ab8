pub mod geocode;
pub mod location;
pub mod timer;
