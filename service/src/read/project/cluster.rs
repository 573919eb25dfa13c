//! [`Cluster`] definitions.

use crate::domain::{project::coordinates::EARTH_RADIUS_KM, Project};

/// Group of [`Project`]s located close to the first (seed) one.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    /// [`Project`]s of this [`Cluster`], the seed one going first.
    pub projects: Vec<Project>,
}

impl Cluster {
    /// Distance in kilometers below which [`Project`]s are grouped with their
    /// seed: `0.001°` of arc on the Earth's surface (about 111 meters).
    #[must_use]
    pub fn threshold_km() -> f64 {
        EARTH_RADIUS_KM * 0.001_f64.to_radians()
    }

    /// Groups the provided [`Project`]s into [`Cluster`]s.
    ///
    /// Every not yet grouped [`Project`] seeds a new [`Cluster`], gathering
    /// all the remaining ungrouped [`Project`]s closer than
    /// [`Cluster::threshold_km()`] to the seed itself. So, grouping is not
    /// transitive: two [`Project`]s close to each other may still end up in
    /// different [`Cluster`]s if only one of them is close to the seed.
    #[must_use]
    pub fn group(projects: Vec<Project>) -> Vec<Self> {
        let threshold = Self::threshold_km();

        let mut rest = projects.into_iter().map(Some).collect::<Vec<_>>();
        let mut clusters = vec![];
        for i in 0..rest.len() {
            let Some(seed) = rest[i].take() else {
                continue;
            };
            let mut members = vec![];
            for slot in &mut rest[i + 1..] {
                let close = slot.as_ref().is_some_and(|p| {
                    seed.details
                        .coordinates
                        .distance_km(&p.details.coordinates)
                        < threshold
                });
                if close {
                    members.extend(slot.take());
                }
            }
            members.insert(0, seed);
            clusters.push(Self { projects: members });
        }
        clusters
    }

    /// Returns the seed [`Project`] of this [`Cluster`].
    #[must_use]
    pub fn seed(&self) -> Option<&Project> {
        self.projects.first()
    }
}

#[cfg(test)]
mod spec {
    use super::{super::fixture::project, Cluster};

    fn titles(clusters: &[Cluster]) -> Vec<Vec<String>> {
        clusters
            .iter()
            .map(|c| {
                c.projects
                    .iter()
                    .map(|p| p.details.title.to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn threshold_is_about_111_meters() {
        assert!((Cluster::threshold_km() - 0.1112).abs() < 1e-4);
    }

    #[test]
    fn groups_close_projects() {
        // ~0.05 km apart.
        let clusters = Cluster::group(vec![
            project("A", 42.0, -73.0),
            project("B", 42.000_45, -73.0),
        ]);

        assert_eq!(titles(&clusters), [vec!["A", "B"]]);
    }

    #[test]
    fn separates_distant_projects() {
        // ~1 km apart.
        let clusters = Cluster::group(vec![
            project("A", 42.0, -73.0),
            project("B", 42.009, -73.0),
        ]);

        assert_eq!(titles(&clusters), [vec!["A"], vec!["B"]]);
    }

    #[test]
    fn is_relative_to_seed() {
        // A-B and B-C are ~0.07 km apart, while A-C is ~0.14 km apart.
        let clusters = Cluster::group(vec![
            project("A", 42.0, -73.0),
            project("B", 42.000_63, -73.0),
            project("C", 42.001_26, -73.0),
        ]);

        assert_eq!(titles(&clusters), [vec!["A", "B"], vec!["C"]]);
    }

    #[test]
    fn keeps_scan_order() {
        let clusters = Cluster::group(vec![
            project("A", 42.0, -73.0),
            project("X", 43.0, -73.0),
            project("B", 42.000_1, -73.0),
            project("Y", 43.000_1, -73.0),
            project("C", 42.000_2, -73.0),
        ]);

        assert_eq!(
            titles(&clusters),
            [vec!["A", "B", "C"], vec!["X", "Y"]],
        );
    }

    #[test]
    fn empty_input_has_no_clusters() {
        assert!(Cluster::group(vec![]).is_empty());
    }
}
