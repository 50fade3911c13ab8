use strum::{AsRefStr, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// The categories a tagged location can be filed under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, IntoStaticStr, EnumIter, EnumCount, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    #[default]
    #[strum(serialize = "No Category")]
    NoCategory,
    #[strum(serialize = "Apple Store")]
    AppleStore,
    Bar,
    Bookstore,
    Club,
    #[strum(serialize = "Grocery Store")]
    GroceryStore,
    #[strum(serialize = "Historic Building")]
    HistoricBuilding,
    House,
    #[strum(serialize = "Icecream Vendor")]
    IcecreamVendor,
    Landmark,
    Park,
}

impl Category {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}
