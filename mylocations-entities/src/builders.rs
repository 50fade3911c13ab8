pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{address_builder::*, fix_builder::*};

pub mod fix_builder {

    use super::*;
    use crate::{fix::*, geo::*, time::*};

    #[derive(Debug)]
    pub struct LocationFixBuild {
        fix: LocationFix,
    }

    impl LocationFixBuild {
        pub fn pos(mut self, lat: f64, lng: f64) -> Self {
            self.fix.pos = Coordinate::from_lat_lng_deg(lat, lng);
            self
        }
        pub fn accuracy(mut self, meters: f64) -> Self {
            self.fix.horizontal_accuracy = meters;
            self
        }
        pub fn at_seconds(mut self, seconds: i64) -> Self {
            self.fix.timestamp = Timestamp::from_seconds(seconds);
            self
        }
        pub fn at(mut self, timestamp: Timestamp) -> Self {
            self.fix.timestamp = timestamp;
            self
        }
        pub fn finish(self) -> LocationFix {
            self.fix
        }
    }

    impl Builder for LocationFix {
        type Build = LocationFixBuild;
        fn build() -> Self::Build {
            LocationFixBuild {
                fix: LocationFix::new(
                    Coordinate::from_lat_lng_deg(0.0, 0.0),
                    0.0,
                    Timestamp::from_millis(0),
                ),
            }
        }
    }
}

pub mod address_builder {

    use super::*;
    use crate::address::*;

    #[derive(Debug)]
    pub struct AddressBuild {
        addr: Address,
    }

    impl AddressBuild {
        pub fn house_number(mut self, x: &str) -> Self {
            self.addr.sub_thoroughfare = Some(x.into());
            self
        }
        pub fn street(mut self, x: &str) -> Self {
            self.addr.thoroughfare = Some(x.into());
            self
        }
        pub fn city(mut self, x: &str) -> Self {
            self.addr.locality = Some(x.into());
            self
        }
        pub fn state(mut self, x: &str) -> Self {
            self.addr.administrative_area = Some(x.into());
            self
        }
        pub fn zip(mut self, x: &str) -> Self {
            self.addr.postal_code = Some(x.into());
            self
        }
        pub fn country(mut self, x: &str) -> Self {
            self.addr.country = Some(x.into());
            self
        }
        pub fn finish(self) -> Address {
            self.addr
        }
    }

    impl Builder for Address {
        type Build = AddressBuild;
        fn build() -> Self::Build {
            AddressBuild {
                addr: Address::default(),
            }
        }
    }

    #[test]
    fn empty_address() {
        assert!(Address::default().is_empty());
        assert!(!Address::build().house_number("x").finish().is_empty());
        assert!(!Address::build().street("x").finish().is_empty());
        assert!(!Address::build().city("x").finish().is_empty());
        assert!(!Address::build().state("x").finish().is_empty());
        assert!(!Address::build().zip("x").finish().is_empty());
        assert!(!Address::build().country("x").finish().is_empty());
    }
}
