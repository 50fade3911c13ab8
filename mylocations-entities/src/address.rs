use itertools::Itertools;

/// Structured postal address as produced by reverse geocoding.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    /// House number
    pub sub_thoroughfare    : Option<String>,
    /// Street
    pub thoroughfare        : Option<String>,
    /// City or town
    pub locality            : Option<String>,
    /// State or province
    pub administrative_area : Option<String>,
    pub postal_code         : Option<String>,
    pub country             : Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.sub_thoroughfare.is_none()
            && self.thoroughfare.is_none()
            && self.locality.is_none()
            && self.administrative_area.is_none()
            && self.postal_code.is_none()
            && self.country.is_none()
    }

    /// Street line, e.g. `"42 Main Street"`.
    pub fn street_line(&self) -> String {
        [&self.sub_thoroughfare, &self.thoroughfare]
            .into_iter()
            .flatten()
            .join(" ")
    }

    /// City line, e.g. `"Springfield IL 62701"`.
    pub fn city_line(&self) -> String {
        [&self.locality, &self.administrative_area, &self.postal_code]
            .into_iter()
            .flatten()
            .join(" ")
    }

    /// Two lines: street and city.
    pub fn to_multi_line_string(&self) -> String {
        format!("{}\n{}", self.street_line(), self.city_line())
    }

    /// All parts on one line separated by commas, empty parts skipped.
    pub fn to_single_line_string(&self) -> String {
        let country = self.country.clone().unwrap_or_default();
        [self.street_line(), self.city_line(), country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .join(", ")
    }
}
