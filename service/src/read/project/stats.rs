//! [`Stats`] definitions.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::domain::{project::Status, Project};

/// Summary statistics over a list of [`Project`]s.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of [`Project`]s.
    pub count: usize,

    /// Number of [`Status::Active`] [`Project`]s.
    pub active: usize,

    /// Number of distinct cities, compared case-insensitively.
    pub cities: usize,

    /// Sum of all the compensations.
    pub total_compensation: Decimal,

    /// Mean compensation, or zero if there are no [`Project`]s.
    pub average_compensation: Decimal,
}

impl Stats {
    /// Calculates [`Stats`] of the provided [`Project`]s.
    #[must_use]
    pub fn of(projects: &[Project]) -> Self {
        let total_compensation = projects
            .iter()
            .map(|p| Decimal::from(p.details.compensation))
            .sum::<Decimal>();
        let average_compensation = if projects.is_empty() {
            Decimal::ZERO
        } else {
            (total_compensation / Decimal::from(projects.len())).round_dp(2)
        };

        Self {
            count: projects.len(),
            active: projects
                .iter()
                .filter(|p| p.details.status == Status::Active)
                .count(),
            cities: projects
                .iter()
                .map(|p| AsRef::<str>::as_ref(&p.details.city).to_lowercase())
                .collect::<HashSet<_>>()
                .len(),
            total_compensation,
            average_compensation,
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::domain::project::{City, Compensation, Status};

    use super::{super::fixture::project, Stats};

    #[test]
    fn empty_list_has_zero_stats() {
        assert_eq!(Stats::of(&[]), Stats::default());
    }

    #[test]
    fn summarizes_projects() {
        let mut a = project("A", 42.0, -73.0);
        a.details.compensation = Compensation::new(Decimal::from(100)).unwrap();
        let mut b = project("B", 42.0, -73.0);
        b.details.compensation = Compensation::new(Decimal::from(250)).unwrap();
        b.details.city = City::new("ALBANY").unwrap();
        b.details.status = Status::Inactive;
        let mut c = project("C", 42.0, -73.0);
        c.details.city = City::new("Troy").unwrap();

        let stats = Stats::of(&[a, b, c]);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.cities, 2);
        assert_eq!(stats.total_compensation, Decimal::from(350));
        assert_eq!(stats.average_compensation, Decimal::new(11667, 2));
    }
}
