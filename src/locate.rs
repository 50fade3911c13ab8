//! Event loop of the `locate` command.
//!
//! The gateways report everything through one channel. The loop hands each
//! event to the controller and redraws the screen whenever it changed.

use crate::{
    config::Config,
    gateways::{self, GeocodingGw},
};
use mylocations_core::{
    current_location::{AcquisitionState, CurrentLocation, CurrentLocationView},
    entities::{TaggedLocationDraft, Timestamp},
    location_details::{FormOutcome, LocationDetailsView},
    Error,
};
use mylocations_gateways::{
    event::{self, Event},
    replay::{ReplayProvider, Track},
    timer::TokioTimer,
};

type Controller = CurrentLocation<ReplayProvider, GeocodingGw, TokioTimer>;

/// What the user enters in the details form.
#[derive(Debug, Default, Clone)]
pub struct FormInput {
    pub description: Option<String>,
    /// Display name of the category, see [`Category::name`](mylocations_core::entities::Category::name).
    pub category: Option<String>,
}

/// Replays `track` until a location was found and tags it.
///
/// Returns `None` if no location could be determined.
pub async fn locate(
    cfg: &Config,
    track: Track,
    input: FormInput,
) -> Result<Option<TaggedLocationDraft>, Error> {
    let (tx, mut rx) = event::channel();
    let provider = ReplayProvider::new(track, tx.clone());
    let geocoder = gateways::geocoding_gateway(cfg, tx.clone());
    let timer = TokioTimer::new(tx);
    let mut controller = CurrentLocation::new(provider, geocoder, timer, cfg.acquisition.clone());

    let mut screen = Screen::default();
    screen.render(controller.view());

    let started = controller.get_location();
    screen.render(controller.view());
    if let Err(err) = started {
        log::warn!("Could not start: {err}");
        return Ok(None);
    }

    while !is_finished(&controller) {
        let Some(event) = rx.recv().await else {
            break;
        };
        let handled = dispatch(&mut controller, event);
        screen.render(controller.view());
        if let Err(err) = handled {
            log::warn!("{err}");
            if controller.location().is_none() && !controller.is_updating_location() {
                return Ok(None);
            }
        }
    }

    let mut details = match controller.tag_location(Timestamp::now()) {
        Ok(details) => details,
        Err(err) => {
            log::warn!("{err}");
            return Ok(None);
        }
    };
    let FormInput {
        description,
        category,
    } = input;
    if let Some(description) = description {
        details.set_description(description);
    }
    if let Some(name) = category {
        details.choose_category(&name)?;
    }
    print_details(&details.view());
    match details.done() {
        FormOutcome::Done(draft) => Ok(Some(draft)),
        FormOutcome::Cancelled => Ok(None),
    }
}

fn is_finished(controller: &Controller) -> bool {
    controller.state() == AcquisitionState::Stopped && !controller.is_resolving_address()
}

fn dispatch(controller: &mut Controller, event: Event) -> Result<(), Error> {
    match event {
        Event::AuthorizationChanged(status) => {
            if let Some(activation) = controller.handle_authorization_changed(status)? {
                log::debug!("Resumed after authorization: {activation:?}");
            }
        }
        Event::LocationsUpdated(fixes) => {
            let disposition = controller.handle_locations_updated(&fixes, Timestamp::now());
            log::debug!("Location update: {disposition:?}");
        }
        Event::LocationFailed(err) => controller.handle_location_error(err)?,
        Event::GeocodeCompleted { id, result } => {
            controller.handle_geocode_completed(id, result);
        }
        Event::TimedOut(timer) => controller.handle_timeout(timer)?,
        Event::TrackFinished => {
            // Nothing more will be delivered.
            if controller.is_updating_location() && controller.location().is_some() {
                log::info!("Track finished, keep the current location");
                controller.stop();
            }
        }
    }
    Ok(())
}

#[derive(Default)]
struct Screen {
    last: Option<CurrentLocationView>,
}

impl Screen {
    fn render(&mut self, view: CurrentLocationView) {
        if self.last.as_ref() == Some(&view) {
            return;
        }
        print_current_location(&view);
        self.last = Some(view);
    }
}

fn print_current_location(view: &CurrentLocationView) {
    if view.message.is_empty() {
        println!("Latitude:  {}", view.latitude);
        println!("Longitude: {}", view.longitude);
        let mut lines = view.address.lines();
        println!("Address:   {}", lines.next().unwrap_or_default());
        for line in lines {
            println!("           {line}");
        }
    } else {
        println!("{}", view.message);
    }
    if view.tag_button_visible {
        println!("[{}] [Tag Location]", view.get_button_title);
    } else {
        println!("[{}]", view.get_button_title);
    }
    println!();
}

fn print_details(view: &LocationDetailsView) {
    println!("Description: {}", view.description);
    println!("Category:    {}", view.category);
    println!("Latitude:    {}", view.latitude);
    println!("Longitude:   {}", view.longitude);
    println!("Address:     {}", view.address);
    println!("Date:        {}", view.date);
}
