use super::*;
use crate::gateways::geocode::GeocodeError;
use mylocations_entities::builders::*;
use rand::prelude::*;
use std::{
    cell::{Cell, RefCell},
    time::Duration,
};

#[derive(Debug)]
pub struct MockProvider {
    pub status: Cell<AuthorizationStatus>,
    pub services_enabled: Cell<bool>,
    pub authorization_requests: Cell<usize>,
    pub desired_accuracy: Cell<Option<Distance>>,
    pub updating: Cell<bool>,
    pub starts: Cell<usize>,
    pub stops: Cell<usize>,
}

impl MockProvider {
    fn with_status(status: AuthorizationStatus) -> Self {
        Self {
            status: Cell::new(status),
            services_enabled: Cell::new(true),
            authorization_requests: Cell::new(0),
            desired_accuracy: Cell::new(None),
            updating: Cell::new(false),
            starts: Cell::new(0),
            stops: Cell::new(0),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::with_status(AuthorizationStatus::AuthorizedWhenInUse)
    }
}

impl LocationProvider for MockProvider {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status.get()
    }
    fn request_when_in_use_authorization(&self) {
        self.authorization_requests
            .set(self.authorization_requests.get() + 1);
    }
    fn location_services_enabled(&self) -> bool {
        self.services_enabled.get()
    }
    fn set_desired_accuracy(&self, accuracy: Distance) {
        self.desired_accuracy.set(Some(accuracy));
    }
    fn start_updating_location(&self) {
        self.updating.set(true);
        self.starts.set(self.starts.get() + 1);
    }
    fn stop_updating_location(&self) {
        self.updating.set(false);
        self.stops.set(self.stops.get() + 1);
    }
}

#[derive(Debug, Default)]
pub struct MockGeocoder {
    pub requests: RefCell<Vec<(GeocodeRequestId, Coordinate)>>,
}

impl MockGeocoder {
    fn last_request(&self) -> GeocodeRequestId {
        self.requests.borrow().last().unwrap().0
    }
    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl ReverseGeocodingGateway for MockGeocoder {
    fn reverse_geocode(&self, id: GeocodeRequestId, pos: Coordinate) {
        self.requests.borrow_mut().push((id, pos));
    }
}

#[derive(Debug, Default)]
pub struct MockTimer {
    pub scheduled: RefCell<Vec<(TimerId, Duration)>>,
    pub cancelled: RefCell<Vec<TimerId>>,
}

impl MockTimer {
    fn last_scheduled(&self) -> TimerId {
        self.scheduled.borrow().last().unwrap().0
    }
}

impl TimerGateway for MockTimer {
    fn schedule(&self, after: Duration) -> TimerId {
        let id = TimerId::from_raw(self.scheduled.borrow().len() as u64 + 1);
        self.scheduled.borrow_mut().push((id, after));
        id
    }
    fn cancel(&self, id: TimerId) {
        self.cancelled.borrow_mut().push(id);
    }
}

type Controller = CurrentLocation<MockProvider, MockGeocoder, MockTimer>;

fn controller_with(provider: MockProvider) -> Controller {
    CurrentLocation::new(
        provider,
        MockGeocoder::default(),
        MockTimer::default(),
        Settings::default(),
    )
}

fn started() -> Controller {
    let mut c = controller_with(MockProvider::default());
    assert_eq!(Ok(Activation::Started), c.start());
    c
}

fn fix(accuracy: f64, at_seconds: i64) -> LocationFix {
    LocationFix::build()
        .pos(52.5163, 13.3777)
        .accuracy(accuracy)
        .at_seconds(at_seconds)
        .finish()
}

fn deliver(c: &mut Controller, fix: LocationFix) -> FixDisposition {
    c.handle_locations_updated(&[fix], fix.timestamp)
}

fn some_address() -> Address {
    Address::build()
        .house_number("1")
        .street("Pariser Platz")
        .city("Berlin")
        .zip("10117")
        .country("Germany")
        .finish()
}

#[test]
fn initial_state() {
    let c = controller_with(MockProvider::default());
    assert_eq!(AcquisitionState::Idle, c.state());
    let view = c.view();
    assert_eq!(MSG_START, view.message);
    assert_eq!(BUTTON_GET_LOCATION, view.get_button_title);
    assert!(!view.tag_button_visible);
}

#[test]
fn start_subscribes_and_arms_timeout() {
    let c = started();
    assert!(c.provider().updating.get());
    assert_eq!(Some(DEFAULT_DESIRED_ACCURACY), c.provider().desired_accuracy.get());
    assert_eq!(
        vec![(TimerId::from_raw(1), Duration::from_secs(60))],
        *c.timer().scheduled.borrow()
    );
    assert_eq!(AcquisitionState::Acquiring, c.state());
    let view = c.view();
    assert_eq!(MSG_SEARCHING, view.message);
    assert_eq!(BUTTON_STOP, view.get_button_title);
}

#[test]
fn start_with_denied_authorization() {
    for status in [AuthorizationStatus::Denied, AuthorizationStatus::Restricted] {
        let mut c = controller_with(MockProvider::with_status(status));
        assert_eq!(Err(Error::AuthorizationDenied), c.start());
        assert_eq!(0, c.provider().starts.get());
        assert!(c.timer().scheduled.borrow().is_empty());
        assert_eq!(AcquisitionState::Idle, c.state());
        assert_eq!(MSG_SERVICES_DISABLED, c.view().message);
    }
}

#[test]
fn start_with_disabled_services() {
    let provider = MockProvider::default();
    provider.services_enabled.set(false);
    let mut c = controller_with(provider);
    assert_eq!(Err(Error::ProviderUnavailable), c.start());
    assert_eq!(0, c.provider().starts.get());
    assert_eq!(MSG_SERVICES_DISABLED, c.view().message);
}

#[test]
fn start_with_undetermined_authorization_is_deferred() {
    let mut c = controller_with(MockProvider::with_status(
        AuthorizationStatus::NotDetermined,
    ));
    assert_eq!(Ok(Activation::AuthorizationRequested), c.start());
    assert_eq!(1, c.provider().authorization_requests.get());
    assert_eq!(0, c.provider().starts.get());

    c.provider()
        .status
        .set(AuthorizationStatus::AuthorizedWhenInUse);
    assert_eq!(
        Ok(Some(Activation::Started)),
        c.handle_authorization_changed(AuthorizationStatus::AuthorizedWhenInUse)
    );
    assert!(c.is_updating_location());

    // Only resumes once
    assert_eq!(
        Ok(None),
        c.handle_authorization_changed(AuthorizationStatus::AuthorizedAlways)
    );
}

#[test]
fn deferred_start_denied_by_user() {
    let mut c = controller_with(MockProvider::with_status(
        AuthorizationStatus::NotDetermined,
    ));
    c.start().unwrap();
    c.provider().status.set(AuthorizationStatus::Denied);
    assert_eq!(
        Err(Error::AuthorizationDenied),
        c.handle_authorization_changed(AuthorizationStatus::Denied)
    );
    assert_eq!(0, c.provider().starts.get());
}

#[test]
fn authorization_change_without_pending_start() {
    let mut c = controller_with(MockProvider::default());
    assert_eq!(
        Ok(None),
        c.handle_authorization_changed(AuthorizationStatus::AuthorizedAlways)
    );
    assert!(!c.is_updating_location());
}

#[test]
fn refine_until_desired_accuracy() {
    let mut c = started();
    assert_eq!(FixDisposition::Accepted, deliver(&mut c, fix(50.0, 100)));
    assert_eq!(FixDisposition::Accepted, deliver(&mut c, fix(30.0, 101)));
    assert!(c.is_updating_location());
    let last = fix(10.0, 102);
    assert_eq!(FixDisposition::Final, deliver(&mut c, last));
    assert!(!c.is_updating_location());
    assert!(!c.provider().updating.get());
    assert_eq!(Some(&last), c.location());
    assert_eq!(vec![TimerId::from_raw(1)], *c.timer().cancelled.borrow());

    // No more fixes are accepted
    assert_eq!(FixDisposition::Ignored, deliver(&mut c, fix(5.0, 103)));
    assert_eq!(Some(&last), c.location());
}

#[test]
fn only_last_fix_of_a_batch_is_evaluated() {
    let mut c = started();
    let batch = [fix(5.0, 100), fix(40.0, 100)];
    assert_eq!(
        FixDisposition::Accepted,
        c.handle_locations_updated(&batch, Timestamp::from_seconds(100))
    );
    assert_eq!(40.0, c.location().unwrap().horizontal_accuracy);
    assert_eq!(
        FixDisposition::Ignored,
        c.handle_locations_updated(&[], Timestamp::from_seconds(100))
    );
}

#[test]
fn drop_stale_fixes() {
    let mut c = started();
    let now = Timestamp::from_seconds(100);
    assert_eq!(
        FixDisposition::Stale,
        c.handle_locations_updated(&[fix(5.0, 94)], now)
    );
    assert!(c.location().is_none());
    assert_eq!(
        FixDisposition::Accepted,
        c.handle_locations_updated(&[fix(50.0, 95)], now)
    );
}

#[test]
fn drop_fixes_with_negative_accuracy() {
    let mut c = started();
    assert_eq!(FixDisposition::Invalid, deliver(&mut c, fix(-1.0, 100)));
    assert!(c.location().is_none());
    assert!(c.geocoder().requests.borrow().is_empty());
}

#[test]
fn keep_more_accurate_fix() {
    let mut c = started();
    deliver(&mut c, fix(30.0, 100));
    assert_eq!(FixDisposition::Rejected, deliver(&mut c, fix(30.0, 101)));
    assert_eq!(FixDisposition::Rejected, deliver(&mut c, fix(80.0, 102)));
    assert_eq!(30.0, c.location().unwrap().horizontal_accuracy);
    assert_eq!(
        Timestamp::from_seconds(100),
        c.location().unwrap().timestamp
    );
}

#[test]
fn retained_fix_never_gets_worse() {
    let mut rng = StdRng::seed_from_u64(4711);
    for _ in 0..50 {
        let mut c = started();
        let mut retained = vec![];
        for t in 0..100 {
            if !c.is_updating_location() {
                break;
            }
            let lat = 52.0 + rng.gen_range(-0.001..0.001);
            let lng = 13.0 + rng.gen_range(-0.001..0.001);
            let fix = LocationFix::build()
                .pos(lat, lng)
                .accuracy(rng.gen_range(-5.0..200.0))
                .at_seconds(1000 + t)
                .finish();
            let age = rng.gen_range(0..8);
            let now = Timestamp::from_seconds(1000 + t + age);
            let disposition = c.handle_locations_updated(&[fix], now);
            if age > 5 {
                assert_eq!(FixDisposition::Stale, disposition);
            }
            if let Some(current) = c.location() {
                assert!(retained
                    .iter()
                    .all(|r: &LocationFix| current.horizontal_accuracy <= r.horizontal_accuracy));
                retained.push(*current);
            }
        }
    }
}

#[test]
fn stop_when_position_settles() {
    let mut c = started();
    deliver(&mut c, fix(30.0, 100));
    // same position, not more accurate, but not long enough
    assert_eq!(FixDisposition::Rejected, deliver(&mut c, fix(30.0, 110)));
    assert!(c.is_updating_location());
    assert_eq!(FixDisposition::Settled, deliver(&mut c, fix(35.0, 111)));
    assert!(!c.is_updating_location());
    assert_eq!(AcquisitionState::Stopped, c.state());
    assert_eq!(
        Timestamp::from_seconds(100),
        c.location().unwrap().timestamp
    );
}

#[test]
fn do_not_settle_while_moving() {
    let mut c = started();
    deliver(&mut c, fix(30.0, 100));
    let moved = LocationFix::build()
        .pos(52.5263, 13.3777)
        .accuracy(40.0)
        .at_seconds(120)
        .finish();
    assert_eq!(FixDisposition::Rejected, deliver(&mut c, moved));
    assert!(c.is_updating_location());
}

#[test]
fn geocode_once_per_cycle() {
    let mut c = started();
    deliver(&mut c, fix(50.0, 100));
    assert_eq!(1, c.geocoder().request_count());
    assert_eq!(AcquisitionState::ResolvingAddress, c.state());
    assert_eq!(MSG_SEARCHING_ADDRESS, c.view().address);

    deliver(&mut c, fix(40.0, 101));
    deliver(&mut c, fix(30.0, 102));
    assert_eq!(1, c.geocoder().request_count());
    assert_eq!(30.0, c.location().unwrap().horizontal_accuracy);

    let id = c.geocoder().last_request();
    assert!(c.handle_geocode_completed(id, Ok(some_address())));
    assert_eq!(AcquisitionState::Refining, c.state());
    assert_eq!(
        "1 Pariser Platz\nBerlin 10117",
        c.view().address
    );

    deliver(&mut c, fix(20.0, 103));
    assert_eq!(2, c.geocoder().request_count());
}

#[test]
fn final_fix_at_new_position_supersedes_pending_request() {
    let mut c = started();
    deliver(&mut c, fix(50.0, 100));
    let first = c.geocoder().last_request();

    let final_fix = LocationFix::build()
        .pos(52.5164, 13.3777)
        .accuracy(5.0)
        .at_seconds(101)
        .finish();
    assert_eq!(FixDisposition::Final, deliver(&mut c, final_fix));
    assert_eq!(2, c.geocoder().request_count());
    let second = c.geocoder().last_request();
    assert_ne!(first, second);
    assert_eq!(final_fix.pos, c.geocoder().requests.borrow()[1].1);

    // stale result is dropped
    assert!(!c.handle_geocode_completed(first, Ok(Address::default())));
    assert!(c.address().is_none());
    assert!(c.is_resolving_address());

    // completion after streaming stopped is still applied
    assert!(c.handle_geocode_completed(second, Ok(some_address())));
    assert_eq!(Some(&some_address()), c.address());
    assert!(!c.is_resolving_address());
}

#[test]
fn final_fix_at_same_position_keeps_pending_request() {
    let mut c = started();
    deliver(&mut c, fix(50.0, 100));
    assert_eq!(FixDisposition::Final, deliver(&mut c, fix(5.0, 101)));
    assert_eq!(1, c.geocoder().request_count());
}

#[test]
fn geocode_failure_is_not_fatal() {
    let mut c = started();
    deliver(&mut c, fix(50.0, 100));
    let id = c.geocoder().last_request();
    assert!(c.handle_geocode_completed(id, Err(GeocodeError::NoResult)));
    assert!(c.address().is_none());
    assert_eq!(
        Some(&Error::GeocodeFailure(GeocodeError::NoResult)),
        c.last_geocoding_error()
    );
    assert!(c.is_updating_location());
    let view = c.view();
    assert_eq!(MSG_NO_ADDRESS, view.address);
    assert!(view.tag_button_visible);
}

#[test]
fn timeout_without_fix() {
    let mut c = started();
    let timer = c.timer().last_scheduled();
    assert_eq!(Err(Error::Timeout), c.handle_timeout(timer));
    assert!(!c.is_updating_location());
    assert_eq!(Some(&Error::Timeout), c.last_location_error());
    assert_eq!(MSG_LOCATION_ERROR, c.view().message);
    // fires only once
    assert_eq!(Ok(()), c.handle_timeout(timer));
}

#[test]
fn timeout_with_fix_is_a_no_op() {
    let mut c = started();
    deliver(&mut c, fix(50.0, 100));
    let timer = c.timer().last_scheduled();
    assert_eq!(Ok(()), c.handle_timeout(timer));
    assert!(c.is_updating_location());
    assert!(c.last_location_error().is_none());
}

#[test]
fn cancelled_timer_is_ignored() {
    let mut c = started();
    let timer = c.timer().last_scheduled();
    c.stop();
    assert_eq!(vec![timer], *c.timer().cancelled.borrow());
    assert_eq!(Ok(()), c.handle_timeout(timer));
    assert!(c.last_location_error().is_none());
}

#[test]
fn stop_is_idempotent() {
    let mut c = started();
    c.stop();
    c.stop();
    assert_eq!(1, c.provider().stops.get());
    assert_eq!(1, c.timer().cancelled.borrow().len());
    assert_eq!(AcquisitionState::Stopped, c.state());
    assert_eq!(FixDisposition::Ignored, deliver(&mut c, fix(5.0, 100)));
}

#[test]
fn get_location_toggles() {
    let mut c = controller_with(MockProvider::default());
    assert_eq!(Ok(Activation::Started), c.get_location());
    assert_eq!(Ok(Activation::AlreadyUpdating), c.start());
    assert_eq!(Ok(Activation::Stopped), c.get_location());
    assert!(!c.is_updating_location());
    assert_eq!(Ok(Activation::Started), c.get_location());
    assert_eq!(2, c.provider().starts.get());
}

#[test]
fn restart_clears_previous_results() {
    let mut c = started();
    deliver(&mut c, fix(5.0, 100));
    let id = c.geocoder().last_request();
    c.handle_geocode_completed(id, Ok(some_address()));
    assert!(c.location().is_some());
    c.start().unwrap();
    assert!(c.location().is_none());
    assert!(c.address().is_none());
    assert_eq!(MSG_SEARCHING, c.view().message);
}

#[test]
fn restart_drops_request_of_previous_session() {
    let mut c = started();
    deliver(&mut c, fix(50.0, 100));
    let first = c.geocoder().last_request();
    assert!(c.is_resolving_address());

    assert_eq!(Ok(Activation::Stopped), c.get_location());
    assert_eq!(Ok(Activation::Started), c.get_location());
    assert!(!c.is_resolving_address());

    let moved = LocationFix::build()
        .pos(48.7755, 9.1827)
        .accuracy(50.0)
        .at_seconds(300)
        .finish();
    assert_eq!(FixDisposition::Accepted, deliver(&mut c, moved));
    assert_eq!(2, c.geocoder().request_count());
    let second = c.geocoder().last_request();
    assert_eq!(moved.pos, c.geocoder().requests.borrow()[1].1);

    // the address of the old position must not be attached to the new one
    assert!(!c.handle_geocode_completed(first, Ok(some_address())));
    assert!(c.address().is_none());
    let details = c.tag_location(Timestamp::from_seconds(301)).unwrap();
    assert_eq!(moved.pos, details.pos());
    assert!(details.address().is_none());

    assert!(c.handle_geocode_completed(second, Ok(Address::default())));
    assert!(!c.is_resolving_address());
}

#[test]
fn transient_provider_error_is_swallowed() {
    let mut c = started();
    assert_eq!(Ok(()), c.handle_location_error(LocationError::LocationUnknown));
    assert!(c.is_updating_location());
    assert!(c.last_location_error().is_none());
}

#[test]
fn provider_failure_stops_updating() {
    let mut c = started();
    assert_eq!(
        Err(Error::AuthorizationDenied),
        c.handle_location_error(LocationError::Denied)
    );
    assert!(!c.is_updating_location());
    assert_eq!(MSG_SERVICES_DISABLED, c.view().message);

    let mut c = started();
    assert_eq!(
        Err(Error::Provider("network".into())),
        c.handle_location_error(LocationError::Other("network".into()))
    );
    assert_eq!(MSG_LOCATION_ERROR, c.view().message);
}

#[test]
fn accepted_fix_clears_location_error() {
    let mut c = started();
    c.handle_location_error(LocationError::Other("network".into()))
        .unwrap_err();
    c.start().unwrap();
    deliver(&mut c, fix(50.0, 100));
    assert!(c.last_location_error().is_none());
}

#[test]
fn view_with_fix() {
    let mut c = started();
    deliver(
        &mut c,
        LocationFix::build()
            .pos(37.33233141, -122.0312186)
            .accuracy(65.0)
            .at_seconds(100)
            .finish(),
    );
    let view = c.view();
    assert_eq!("", view.message);
    assert_eq!("37.33233141", view.latitude);
    assert_eq!("-122.03121860", view.longitude);
    assert!(view.tag_button_visible);
    assert_eq!(BUTTON_STOP, view.get_button_title);
}

#[test]
fn tag_location_requires_fix() {
    let c = started();
    assert_eq!(
        Err(Error::NoLocation),
        c.tag_location(Timestamp::from_seconds(200)).map(|_| ())
    );
}

#[test]
fn tag_location_passes_position_and_address() {
    let mut c = started();
    let last = fix(5.0, 100);
    deliver(&mut c, last);
    let id = c.geocoder().last_request();
    c.handle_geocode_completed(id, Ok(some_address()));
    let details = c.tag_location(Timestamp::from_seconds(200)).unwrap();
    assert_eq!(last.pos, details.pos());
    assert_eq!(Some(&some_address()), details.address());
    assert_eq!(Category::NoCategory, details.category());
}
