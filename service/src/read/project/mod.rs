//! [`Project`]-related read definitions.

pub mod cluster;
pub mod export;
pub mod stats;

use crate::domain::{
    project::{MarketSector, Status},
    Project,
};

pub use self::{cluster::Cluster, export::Export, stats::Stats};

/// Filter narrowing a list of [`Project`]s.
///
/// An empty filter matches every [`Project`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    /// [`MarketSector`]s to match any of. Empty means all of them.
    pub sectors: Vec<MarketSector>,

    /// [`Status`]es to match any of. Empty means all of them.
    pub statuses: Vec<Status>,

    /// Text to search for, case-insensitively, in the title, city, client,
    /// description and building type.
    pub search: Option<Search>,
}

impl Filter {
    /// Checks whether the provided [`Project`] passes this [`Filter`].
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        let d = &project.details;
        if !self.sectors.is_empty() && !self.sectors.contains(&d.market_sector)
        {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&d.status) {
            return false;
        }
        let Some(search) = &self.search else {
            return true;
        };
        [
            Some(AsRef::<str>::as_ref(&d.title)),
            Some(d.city.as_ref()),
            Some(d.client.as_ref()),
            Some(d.description.as_ref()),
            d.building_type.as_ref().map(AsRef::<str>::as_ref),
        ]
        .into_iter()
        .flatten()
        .any(|text| search.found_in(text))
    }
}

/// Non-blank text to search for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Search(String);

impl Search {
    /// Creates a new [`Search`] out of the provided text, if it's not blank.
    #[must_use]
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let text = text.as_ref().trim();
        (!text.is_empty()).then(|| Self(text.to_lowercase()))
    }

    /// Checks whether this [`Search`] text is contained in the provided one,
    /// ignoring case.
    #[must_use]
    pub fn found_in(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.0)
    }
}

impl AsRef<str> for Search {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! [`Project`]s to be used in tests.

    use common::DateTime;

    use crate::domain::{
        project::{
            self, City, Client, Compensation, Coordinates, Description,
            Details, MarketSector, Status, Title, Year,
        },
        Project,
    };

    /// Builds a [`Project`] with the provided title located at the given
    /// coordinates, with everything else defaulted.
    pub(crate) fn project(
        title: &str,
        latitude: f64,
        longitude: f64,
    ) -> Project {
        Project {
            id: project::Id::new(),
            details: details(title, latitude, longitude),
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        }
    }

    /// Builds [`Details`] with the provided title located at the given
    /// coordinates, with everything else defaulted.
    pub(crate) fn details(
        title: &str,
        latitude: f64,
        longitude: f64,
    ) -> Details {
        Details {
            title: Title::new(title).unwrap(),
            address: None,
            city: City::new("Albany").unwrap(),
            coordinates: Coordinates::new(latitude, longitude).unwrap(),
            market_sector: MarketSector::default(),
            building_type: None,
            description: Description::new(title).unwrap(),
            mini_description: None,
            client: Client::new("State of New York").unwrap(),
            project_manager: None,
            status: Status::default(),
            compensation: Compensation::ZERO,
            year: Year::new(2020).unwrap(),
            featured: false,
            recent: false,
            image_urls: vec![],
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::project::{BuildingType, MarketSector, Status};

    use super::{fixture, Filter, Search};

    #[test]
    fn empty_filter_matches_everything() {
        let p = fixture::project("Main Hall", 42.0, -73.0);

        assert!(Filter::default().matches(&p));
    }

    #[test]
    fn matches_any_of_sectors_and_statuses() {
        let mut p = fixture::project("Main Hall", 42.0, -73.0);
        p.details.market_sector = MarketSector::Housing;
        p.details.status = Status::Dormant;

        let filter = Filter {
            sectors: vec![MarketSector::Education, MarketSector::Housing],
            statuses: vec![Status::Dormant],
            search: None,
        };
        assert!(filter.matches(&p));

        let filter = Filter {
            statuses: vec![Status::Active, Status::Inactive],
            ..filter
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn searches_case_insensitively() {
        let mut p = fixture::project("Main Hall", 42.0, -73.0);
        p.details.building_type = Some(BuildingType::new("Dormitory").unwrap());

        for text in ["main", "ALBANY", "state of", "dorm"] {
            let filter = Filter {
                search: Search::new(text),
                ..Filter::default()
            };
            assert!(filter.matches(&p), "`{text}` not found");
        }

        let filter = Filter {
            search: Search::new("bridge"),
            ..Filter::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn blank_search_is_none() {
        assert_eq!(Search::new("  "), None);
        assert_eq!(Search::new(" Hall ").unwrap().as_ref(), "hall");
    }
}
