//! Location provider that replays a recorded track.

use crate::event::{self, Event, EventSender};
use duration_str::{deserialize_duration, deserialize_option_duration};
use mylocations_core::gateways::location::{AuthorizationStatus, LocationError, LocationProvider};
use mylocations_entities::{
    fix::LocationFix,
    geo::{Coordinate, CoordinateError, Distance},
    time::Timestamp,
};
use serde::Deserialize;
use std::{
    fs, io,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("update #{index}: {source}")]
    Position {
        index: usize,
        source: CoordinateError,
    },
    #[error("update #{0} needs either lat/lng/accuracy or an error")]
    Incomplete(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawAuthorization {
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl From<RawAuthorization> for AuthorizationStatus {
    fn from(from: RawAuthorization) -> Self {
        use RawAuthorization as R;
        match from {
            R::NotDetermined => Self::NotDetermined,
            R::Restricted => Self::Restricted,
            R::Denied => Self::Denied,
            R::AuthorizedWhenInUse => Self::AuthorizedWhenInUse,
            R::AuthorizedAlways => Self::AuthorizedAlways,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawLocationError {
    LocationUnknown,
    Denied,
    Network,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawTrack {
    authorization: Option<RawAuthorization>,
    services_enabled: Option<bool>,
    /// Answer given when the app asks for authorization.
    grant_on_request: Option<bool>,
    #[serde(default, rename = "update")]
    updates: Vec<RawUpdate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawUpdate {
    #[serde(deserialize_with = "deserialize_duration")]
    after: Duration,
    lat: Option<f64>,
    lng: Option<f64>,
    accuracy: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    age: Option<Duration>,
    error: Option<RawLocationError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackItem {
    Fix {
        pos: Coordinate,
        accuracy: Distance,
        age: Duration,
    },
    Failure(LocationError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackUpdate {
    pub after: Duration,
    pub item: TrackItem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub authorization: AuthorizationStatus,
    pub services_enabled: bool,
    pub grant_on_request: bool,
    pub updates: Vec<TrackUpdate>,
}

impl Track {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TrackError> {
        let path = path.as_ref();
        log::info!("Loading track from {}", path.display());
        fs::read_to_string(path)?.parse()
    }
}

impl std::str::FromStr for Track {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let RawTrack {
            authorization,
            services_enabled,
            grant_on_request,
            updates,
        } = toml::from_str(s)?;
        let updates = updates
            .into_iter()
            .enumerate()
            .map(|(index, raw)| track_update(index, raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            authorization: authorization
                .map(Into::into)
                .unwrap_or(AuthorizationStatus::AuthorizedWhenInUse),
            services_enabled: services_enabled.unwrap_or(true),
            grant_on_request: grant_on_request.unwrap_or(true),
            updates,
        })
    }
}

fn track_update(index: usize, raw: RawUpdate) -> Result<TrackUpdate, TrackError> {
    let RawUpdate {
        after,
        lat,
        lng,
        accuracy,
        age,
        error,
    } = raw;
    let item = match (error, lat, lng, accuracy) {
        (Some(err), _, _, _) => TrackItem::Failure(match err {
            RawLocationError::LocationUnknown => LocationError::LocationUnknown,
            RawLocationError::Denied => LocationError::Denied,
            RawLocationError::Network => LocationError::Other("network unavailable".into()),
        }),
        (None, Some(lat), Some(lng), Some(accuracy)) => {
            let pos = Coordinate::try_from_lat_lng_deg(lat, lng)
                .map_err(|source| TrackError::Position { index, source })?;
            TrackItem::Fix {
                pos,
                accuracy: Distance::from_meters(accuracy),
                age: age.unwrap_or_default(),
            }
        }
        _ => return Err(TrackError::Incomplete(index)),
    };
    Ok(TrackUpdate { after, item })
}

#[derive(Debug)]
struct State {
    authorization: AuthorizationStatus,
    desired_accuracy: Option<Distance>,
    task: Option<JoinHandle<()>>,
}

/// Plays back a [`Track`] as if it was reported by a device.
#[derive(Debug, Clone)]
pub struct ReplayProvider {
    track: Arc<Track>,
    state: Arc<Mutex<State>>,
    tx: EventSender,
}

impl ReplayProvider {
    pub fn new(track: Track, tx: EventSender) -> Self {
        let state = State {
            authorization: track.authorization,
            desired_accuracy: None,
            task: None,
        };
        Self {
            track: Arc::new(track),
            state: Arc::new(Mutex::new(state)),
            tx,
        }
    }

    pub fn desired_accuracy(&self) -> Option<Distance> {
        self.lock().desired_accuracy
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means a replay task panicked, the state is still usable.
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl LocationProvider for ReplayProvider {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.lock().authorization
    }

    fn request_when_in_use_authorization(&self) {
        let status = if self.track.grant_on_request {
            AuthorizationStatus::AuthorizedWhenInUse
        } else {
            AuthorizationStatus::Denied
        };
        self.lock().authorization = status;
        log::info!("Authorization answered with {status:?}");
        event::send(&self.tx, Event::AuthorizationChanged(status));
    }

    fn location_services_enabled(&self) -> bool {
        self.track.services_enabled
    }

    fn set_desired_accuracy(&self, accuracy: Distance) {
        self.lock().desired_accuracy = Some(accuracy);
    }

    fn start_updating_location(&self) {
        let track = Arc::clone(&self.track);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            for update in &track.updates {
                tokio::time::sleep(update.after).await;
                let event = match &update.item {
                    TrackItem::Fix { pos, accuracy, age } => {
                        let timestamp = Timestamp::now() - time_span(*age);
                        Event::LocationsUpdated(vec![LocationFix::new(
                            *pos,
                            accuracy.to_meters(),
                            timestamp,
                        )])
                    }
                    TrackItem::Failure(err) => Event::LocationFailed(err.clone()),
                };
                event::send(&tx, event);
            }
            event::send(&tx, Event::TrackFinished);
        });
        if let Some(previous) = self.lock().task.replace(task) {
            previous.abort();
        }
    }

    fn stop_updating_location(&self) {
        if let Some(task) = self.lock().task.take() {
            task.abort();
        }
    }
}

fn time_span(age: Duration) -> ::time::Duration {
    ::time::Duration::milliseconds(age.as_millis() as i64)
}
