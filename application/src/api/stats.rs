//! [`Stats`]-related definitions.

use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use rust_decimal::Decimal;
use service::read;

use crate::{api::scalar, AsError as _, Context, Error};

/// Summary of a list of `Project`s.
#[derive(Clone, Copy, Debug)]
pub struct Stats {
    /// Underlying [`read::project::Stats`].
    stats: read::project::Stats,

    /// Indicator whether money figures are shown.
    show_money: bool,
}

impl Stats {
    /// Wraps the provided [`read::project::Stats`], hiding money figures
    /// unless `show_money` is set.
    #[must_use]
    pub const fn new(stats: read::project::Stats, show_money: bool) -> Self {
        Self { stats, show_money }
    }
}

/// Summary of a list of `Project`s.
#[graphql_object(name = "ProjectStats", context = Context)]
impl Stats {
    /// Number of `Project`s.
    pub fn count(&self) -> Result<i32, Error> {
        i32::try_from(self.stats.count).map_err(|e| e.into_error())
    }

    /// Number of `ACTIVE` `Project`s.
    pub fn active(&self) -> Result<i32, Error> {
        i32::try_from(self.stats.active).map_err(|e| e.into_error())
    }

    /// Number of distinct cities.
    pub fn cities(&self) -> Result<i32, Error> {
        i32::try_from(self.stats.cities).map_err(|e| e.into_error())
    }

    /// Sum of all the compensations.
    ///
    /// Visible to the administrator only, `null` otherwise.
    #[must_use]
    pub fn total_compensation(&self) -> Option<Money> {
        self.show_money
            .then_some(self.stats.total_compensation.into())
    }

    /// Mean compensation, rounded to cents.
    ///
    /// Visible to the administrator only, `null` otherwise.
    #[must_use]
    pub fn average_compensation(&self) -> Option<Money> {
        self.show_money
            .then_some(self.stats.average_compensation.into())
    }
}

/// Amount of money, as a decimal string.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<Decimal>)]
pub struct Money(Decimal);
