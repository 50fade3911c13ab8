//! Acquisition of the current location.
//!
//! [`CurrentLocation`] streams fixes from a [`LocationProvider`] until one is
//! accurate enough, the position settles or a timeout expires. Every accepted
//! fix is reverse geocoded, with at most one request in flight.

use crate::{
    entities::*,
    gateways::{
        geocode::{GeocodeRequestId, GeocodeResult, ReverseGeocodingGateway},
        location::{AuthorizationStatus, LocationError, LocationProvider},
        timer::{TimerGateway, TimerId},
    },
    location_details::LocationDetails,
    Error, Result,
};

mod settings;
mod view;

pub use self::{settings::*, view::*};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    /// Never started.
    Idle,
    /// Streaming, no usable fix yet.
    Acquiring,
    /// Streaming with a current fix.
    Refining,
    /// Waiting for the address of the current fix.
    ResolvingAddress,
    /// Streaming has ended.
    Stopped,
}

/// Result of a request to start or stop acquiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Started,
    /// Authorization has been requested, acquisition resumes when it is granted.
    AuthorizationRequested,
    AlreadyUpdating,
    Stopped,
}

/// What happened to a delivered location update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixDisposition {
    /// Not streaming or nothing delivered.
    Ignored,
    /// Older than the allowed fix age.
    Stale,
    /// Negative accuracy radius.
    Invalid,
    /// Not more accurate than the current fix.
    Rejected,
    /// Became the current fix.
    Accepted,
    /// Became the current fix and is accurate enough to stop.
    Final,
    /// Not more accurate, but the position settled and streaming stopped.
    Settled,
}

#[derive(Debug)]
pub struct CurrentLocation<P, G, T> {
    provider: P,
    geocoder: G,
    timer: T,
    settings: Settings,

    location: Option<LocationFix>,
    started: bool,
    updating_location: bool,
    deferred_start: bool,
    last_location_error: Option<Error>,
    timeout: Option<TimerId>,

    address: Option<Address>,
    pending_geocode: Option<GeocodeRequestId>,
    last_geocode_id: GeocodeRequestId,
    last_geocoding_error: Option<Error>,
}

impl<P, G, T> CurrentLocation<P, G, T>
where
    P: LocationProvider,
    G: ReverseGeocodingGateway,
    T: TimerGateway,
{
    pub fn new(provider: P, geocoder: G, timer: T, settings: Settings) -> Self {
        Self {
            provider,
            geocoder,
            timer,
            settings,
            location: None,
            started: false,
            updating_location: false,
            deferred_start: false,
            last_location_error: None,
            timeout: None,
            address: None,
            pending_geocode: None,
            last_geocode_id: GeocodeRequestId::from_raw(0),
            last_geocoding_error: None,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn location(&self) -> Option<&LocationFix> {
        self.location.as_ref()
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn last_location_error(&self) -> Option<&Error> {
        self.last_location_error.as_ref()
    }

    pub fn last_geocoding_error(&self) -> Option<&Error> {
        self.last_geocoding_error.as_ref()
    }

    pub fn is_updating_location(&self) -> bool {
        self.updating_location
    }

    pub fn is_resolving_address(&self) -> bool {
        self.pending_geocode.is_some()
    }

    pub fn state(&self) -> AcquisitionState {
        if self.updating_location {
            if self.location.is_none() {
                AcquisitionState::Acquiring
            } else if self.pending_geocode.is_some() {
                AcquisitionState::ResolvingAddress
            } else {
                AcquisitionState::Refining
            }
        } else if self.started {
            AcquisitionState::Stopped
        } else {
            AcquisitionState::Idle
        }
    }

    /// The "Get My Location" button: stops while updating, starts otherwise.
    pub fn get_location(&mut self) -> Result<Activation> {
        if self.updating_location {
            self.stop();
            Ok(Activation::Stopped)
        } else {
            self.start()
        }
    }

    pub fn start(&mut self) -> Result<Activation> {
        let status = self.provider.authorization_status();
        if status == AuthorizationStatus::NotDetermined {
            log::info!("Requesting authorization to use location services");
            self.deferred_start = true;
            self.provider.request_when_in_use_authorization();
            return Ok(Activation::AuthorizationRequested);
        }
        if status.is_denied() {
            log::warn!("Location services are not authorized ({status:?})");
            self.last_location_error = Some(Error::AuthorizationDenied);
            return Err(Error::AuthorizationDenied);
        }
        if !self.provider.location_services_enabled() {
            log::warn!("Location services are disabled");
            self.last_location_error = Some(Error::ProviderUnavailable);
            return Err(Error::ProviderUnavailable);
        }
        if self.updating_location {
            return Ok(Activation::AlreadyUpdating);
        }

        self.location = None;
        self.last_location_error = None;
        self.address = None;
        self.pending_geocode = None;
        self.last_geocoding_error = None;

        self.provider
            .set_desired_accuracy(self.settings.desired_accuracy);
        self.provider.start_updating_location();
        self.started = true;
        self.updating_location = true;
        self.timeout = Some(self.timer.schedule(self.settings.timeout));
        log::info!(
            "Started updating location (desired accuracy = {}, timeout = {:?})",
            self.settings.desired_accuracy,
            self.settings.timeout
        );
        Ok(Activation::Started)
    }

    /// Resumes a start that was waiting for the user's decision.
    pub fn handle_authorization_changed(
        &mut self,
        status: AuthorizationStatus,
    ) -> Result<Option<Activation>> {
        if !self.deferred_start || status == AuthorizationStatus::NotDetermined {
            return Ok(None);
        }
        self.deferred_start = false;
        log::debug!("Authorization changed to {status:?}");
        self.start().map(Some)
    }

    /// Stops streaming. Calling it again has no effect.
    pub fn stop(&mut self) {
        if !self.updating_location {
            return;
        }
        if let Some(timer) = self.timeout.take() {
            self.timer.cancel(timer);
        }
        self.provider.stop_updating_location();
        self.updating_location = false;
        log::info!("Stopped updating location");
    }

    /// Evaluates the most recent of the delivered fixes.
    pub fn handle_locations_updated(
        &mut self,
        fixes: &[LocationFix],
        now: Timestamp,
    ) -> FixDisposition {
        if !self.updating_location {
            log::debug!("Ignoring location update while not updating");
            return FixDisposition::Ignored;
        }
        let Some(new_fix) = fixes.last().copied() else {
            return FixDisposition::Ignored;
        };
        log::debug!(
            "Location update: {} (accuracy = {} m)",
            new_fix.pos,
            new_fix.horizontal_accuracy
        );

        let age = now - new_fix.timestamp;
        if age > self.settings.max_fix_age {
            log::debug!("Dropping cached fix that is {age} old");
            return FixDisposition::Stale;
        }
        if !new_fix.has_valid_accuracy() {
            return FixDisposition::Invalid;
        }

        let distance = self
            .location
            .as_ref()
            .and_then(|current| new_fix.distance_from(current))
            .unwrap_or_else(Distance::infinite);

        if let Some(current) = self.location {
            if !new_fix.is_more_accurate_than(&current) {
                return self.check_settled(&new_fix, &current, distance);
            }
            log::debug!("New fix is {distance} from the previous one");
        }

        self.last_location_error = None;
        self.location = Some(new_fix);

        let accurate_enough =
            new_fix.horizontal_accuracy <= self.settings.desired_accuracy.to_meters();
        if accurate_enough {
            log::info!(
                "Found location with accuracy {} m",
                new_fix.horizontal_accuracy
            );
            self.stop();
            if distance > Distance::from_meters(0.0) {
                // The final position moved: its address supersedes any pending one.
                self.pending_geocode = None;
            }
        }

        if self.pending_geocode.is_none() {
            self.request_address(new_fix.pos);
        }

        if accurate_enough {
            FixDisposition::Final
        } else {
            FixDisposition::Accepted
        }
    }

    fn check_settled(
        &mut self,
        new_fix: &LocationFix,
        current: &LocationFix,
        distance: Distance,
    ) -> FixDisposition {
        if distance < self.settings.stable_distance {
            let interval = new_fix.timestamp - current.timestamp;
            if interval > self.settings.stable_interval {
                log::info!("Position did not change for {interval}, done");
                self.stop();
                return FixDisposition::Settled;
            }
        }
        FixDisposition::Rejected
    }

    fn request_address(&mut self, pos: Coordinate) {
        let id = self.last_geocode_id.next();
        self.last_geocode_id = id;
        self.pending_geocode = Some(id);
        log::debug!("Reverse geocoding {pos} (request #{})", id.to_raw());
        self.geocoder.reverse_geocode(id, pos);
    }

    /// Stores the outcome of a reverse geocoding request.
    ///
    /// Returns `false` if the request had been superseded.
    pub fn handle_geocode_completed(&mut self, id: GeocodeRequestId, result: GeocodeResult) -> bool {
        if self.pending_geocode != Some(id) {
            log::debug!("Ignoring result of superseded geocoding request #{}", id.to_raw());
            return false;
        }
        self.pending_geocode = None;
        match result {
            Ok(address) => {
                log::debug!("Found address: {}", address.to_single_line_string());
                self.address = Some(address);
                self.last_geocoding_error = None;
            }
            Err(err) => {
                log::warn!("Reverse geocoding failed: {err}");
                self.address = None;
                self.last_geocoding_error = Some(Error::GeocodeFailure(err));
            }
        }
        true
    }

    pub fn handle_location_error(&mut self, err: LocationError) -> Result<()> {
        if !self.updating_location {
            return Ok(());
        }
        let err = Error::from(err);
        if err.is_transient() {
            log::debug!("{err}, continue searching");
            return Ok(());
        }
        log::warn!("Location provider failed: {err}");
        self.last_location_error = Some(err.clone());
        self.stop();
        Err(err)
    }

    /// Gives up if nothing was found in time.
    pub fn handle_timeout(&mut self, timer: TimerId) -> Result<()> {
        if self.timeout != Some(timer) {
            log::debug!("Ignoring expired timer {}", timer.to_raw());
            return Ok(());
        }
        self.timeout = None;
        if self.location.is_some() {
            return Ok(());
        }
        log::warn!("Timed out");
        self.stop();
        self.last_location_error = Some(Error::Timeout);
        Err(Error::Timeout)
    }

    /// Opens the details form for the current location.
    pub fn tag_location(&self, now: Timestamp) -> Result<LocationDetails> {
        let fix = self.location.as_ref().ok_or(Error::NoLocation)?;
        Ok(LocationDetails::new(fix.pos, self.address.clone(), now))
    }
}
