use crate::{address::Address, category::Category, geo::Coordinate, time::Timestamp};

/// A location the user is about to tag.
///
/// Only lives while the details form is open, there is no store for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedLocationDraft {
    pub pos: Coordinate,
    pub address: Option<Address>,
    pub description: String,
    pub category: Category,
    pub created_at: Timestamp,
}
