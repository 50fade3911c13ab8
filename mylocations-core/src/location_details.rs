use crate::{current_location::MSG_NO_ADDRESS, entities::*, Error, Result};

/// What the details form shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDetailsView {
    pub description: String,
    pub category: &'static str,
    pub latitude: String,
    pub longitude: String,
    pub address: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Done(TaggedLocationDraft),
    Cancelled,
}

/// Form for describing and categorizing a location before tagging it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDetails {
    pos: Coordinate,
    address: Option<Address>,
    description: String,
    category: Category,
    date: Timestamp,
}

impl LocationDetails {
    pub fn new(pos: Coordinate, address: Option<Address>, date: Timestamp) -> Self {
        Self {
            pos,
            address,
            description: String::new(),
            category: Category::default(),
            date,
        }
    }

    pub fn pos(&self) -> Coordinate {
        self.pos
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn select_category(&mut self, category: Category) {
        self.category = category;
    }

    /// Picks a category by its display name.
    pub fn choose_category(&mut self, name: &str) -> Result<()> {
        let category = name
            .parse::<Category>()
            .map_err(|_| Error::UnknownCategory(name.to_string()))?;
        self.select_category(category);
        Ok(())
    }

    pub fn view(&self) -> LocationDetailsView {
        let address = self
            .address
            .as_ref()
            .map(Address::to_single_line_string)
            .unwrap_or_else(|| MSG_NO_ADDRESS.to_string());
        LocationDetailsView {
            description: self.description.clone(),
            category: self.category.name(),
            latitude: self.pos.lat_label(),
            longitude: self.pos.lng_label(),
            address,
            date: self.date.to_date_time_label(),
        }
    }

    // TODO: hand the draft to a store once tagged locations are persisted
    pub fn done(self) -> FormOutcome {
        let Self {
            pos,
            address,
            description,
            category,
            date,
        } = self;
        log::info!("Tagged location {pos} as '{}'", category.name());
        FormOutcome::Done(TaggedLocationDraft {
            pos,
            address,
            description,
            category,
            created_at: date,
        })
    }

    pub fn cancel(self) -> FormOutcome {
        log::debug!("Discarding location details");
        FormOutcome::Cancelled
    }
}
