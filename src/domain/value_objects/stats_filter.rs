//! Stats query filter.

use serde::Deserialize;

use crate::domain::entities::Session;

/// Optional country/page restriction for a stats query.
///
/// A missing or empty value places no restriction on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatsFilter {
    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub page: Option<String>,
}

impl StatsFilter {
    pub fn new(country: Option<&str>, page: Option<&str>) -> Self {
        Self {
            country: country.map(str::to_owned),
            page: page.map(str::to_owned),
        }
    }

    /// Effective country restriction.
    pub fn country(&self) -> Option<&str> {
        self.country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Effective page restriction.
    pub fn page(&self) -> Option<&str> {
        self.page
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// True when the filter restricts nothing.
    pub fn is_unrestricted(&self) -> bool {
        self.country().is_none() && self.page().is_none()
    }

    /// Country codes compare ASCII case-insensitively.
    pub fn matches_country(&self, country: &str) -> bool {
        self.country()
            .map_or(true, |wanted| wanted.eq_ignore_ascii_case(country))
    }

    /// A session matches when its latest country matches and its journey
    /// includes the requested page.
    pub fn matches(&self, session: &Session) -> bool {
        self.matches_country(&session.country)
            && self.page().map_or(true, |page| session.visited(page))
    }
}
