//! Partner record type and seed data.

use serde::{Deserialize, Serialize};

/// A business partner and where they are located.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl Partner {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city: city.into(),
            country: country.into(),
        }
    }

    /// The partner's location as "City, Country".
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// Development seed data covering a spread of global locations.
pub(crate) fn seed_partners() -> Vec<Partner> {
    vec![
        Partner::new("BP001", "Acme Corp", "New York", "USA"),
        Partner::new("BP002", "TechVentures GmbH", "Berlin", "Germany"),
        Partner::new("BP003", "Global Innovations Ltd", "London", "UK"),
        Partner::new("BP004", "Pacific Solutions", "Tokyo", "Japan"),
        Partner::new("BP005", "Nordic Systems AB", "Stockholm", "Sweden"),
        Partner::new("BP006", "Alpine Technologies SA", "Zurich", "Switzerland"),
        Partner::new("BP007", "Southern Cross Enterprises", "Sydney", "Australia"),
        Partner::new("BP008", "Maple Leaf Industries", "Toronto", "Canada"),
        Partner::new("BP009", "Dragon Tech Co", "Shanghai", "China"),
        Partner::new("BP010", "Sunset Digital", "San Francisco", "USA"),
    ]
}
