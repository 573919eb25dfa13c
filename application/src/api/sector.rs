//! [`MarketSector`]-related definitions.

use juniper::{graphql_object, GraphQLEnum};
use service::domain;

use crate::Context;

/// Market sector a `Project` belongs to.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum MarketSector {
    /// Commercial buildings.
    Commercial,

    /// Schools, colleges and universities.
    Education,

    /// Government facilities.
    Government,

    /// Manufacturing and distribution facilities.
    Manufacturing,

    /// Mixed use developments.
    MixedUse,

    /// Parks and recreation.
    Parks,

    /// Housing.
    Housing,

    /// Professional offices.
    Professional,

    /// Industrial and manufacturing facilities.
    Industrial,

    /// Research and development facilities.
    Research,
}

impl From<domain::project::MarketSector> for MarketSector {
    fn from(sector: domain::project::MarketSector) -> Self {
        use domain::project::MarketSector as S;
        match sector {
            S::Commercial => Self::Commercial,
            S::Education => Self::Education,
            S::Government => Self::Government,
            S::Manufacturing => Self::Manufacturing,
            S::MixedUse => Self::MixedUse,
            S::Parks => Self::Parks,
            S::Housing => Self::Housing,
            S::Professional => Self::Professional,
            S::Industrial => Self::Industrial,
            S::Research => Self::Research,
        }
    }
}

impl From<MarketSector> for domain::project::MarketSector {
    fn from(sector: MarketSector) -> Self {
        use MarketSector as S;
        match sector {
            S::Commercial => Self::Commercial,
            S::Education => Self::Education,
            S::Government => Self::Government,
            S::Manufacturing => Self::Manufacturing,
            S::MixedUse => Self::MixedUse,
            S::Parks => Self::Parks,
            S::Housing => Self::Housing,
            S::Professional => Self::Professional,
            S::Industrial => Self::Industrial,
            S::Research => Self::Research,
        }
    }
}

/// Presentation of a [`MarketSector`] for the map legend.
#[derive(Clone, Copy, Debug)]
pub struct Info(domain::project::MarketSector);

impl Info {
    /// Returns [`Info`] of all the [`MarketSector`]s, in the legend order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        domain::project::MarketSector::ALL
            .iter()
            .copied()
            .map(Self)
            .collect()
    }
}

/// Presentation of a `MarketSector` for the map legend.
#[graphql_object(name = "MarketSectorInfo", context = Context)]
impl Info {
    /// `MarketSector` being presented.
    #[must_use]
    pub fn sector(&self) -> MarketSector {
        self.0.into()
    }

    /// Stable textual identifier, as used in CSV files.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.0.id()
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Marker color, as a `#rrggbb` hex.
    #[must_use]
    pub fn color(&self) -> &'static str {
        self.0.color()
    }
}

#[cfg(test)]
mod spec {
    use service::domain::project;

    use super::{Info, MarketSector};

    #[test]
    fn lists_every_sector_once() {
        let all = Info::all();

        assert_eq!(all.len(), project::MarketSector::ALL.len());
        assert_eq!(all.first().map(Info::id), Some("commercial"));
    }

    #[test]
    fn round_trips_sectors() {
        for sector in project::MarketSector::ALL {
            let api = MarketSector::from(*sector);

            assert_eq!(project::MarketSector::from(api), *sector);
        }
    }
}
