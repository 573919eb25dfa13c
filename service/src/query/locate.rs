//! [`Locate`] definition.

use std::convert::Infallible;

use common::operations::Resolve;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        location::{Place, Stage},
        project::Coordinates,
    },
    infra::{geocoder, Geocoder},
    Service,
};

use super::Query;

/// [`Query`] looking up [`Coordinates`] of a [`Place`].
///
/// Queries planned by the configured [`location::Policy`] are attempted one
/// by one, until some of them is found. [`Geocoder`] failures are not fatal:
/// they're logged and treated as nothing found.
///
/// [`location::Policy`]: crate::domain::location::Policy
#[derive(Clone, Debug)]
pub struct Locate(pub Place);

impl<Db, Geo> Query<Locate> for Service<Db, Geo>
where
    Geo: Geocoder<
        Resolve<String>,
        Ok = Option<Coordinates>,
        Err = Traced<geocoder::Error>,
    >,
{
    type Ok = Option<Coordinates>;
    type Err = Infallible;

    async fn execute(
        &self,
        Locate(place): Locate,
    ) -> Result<Self::Ok, Self::Err> {
        let policy = &self.config().location;
        for (stage, query) in policy.plan(&place) {
            let resolved =
                self.geocoder().execute(Resolve(query.clone())).await;
            let found = match resolved {
                Ok(found) => found,
                Err(e) => {
                    log::warn!("failed to geocode `{query}`: {e}");
                    None
                }
            };
            let Some(coords) = found else {
                log::trace!("`{query}` is not found at {stage:?} stage");
                continue;
            };

            log::debug!("`{query}` is located at {stage:?} stage");
            return Ok(Some(if stage == Stage::BareCity {
                coords.jittered(policy.bare_city_jitter)
            } else {
                coords
            }));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{location::Place, project::Coordinates},
        fixture,
        infra::{Fixed, Memory},
        Query as _, Service,
    };

    use super::Locate;

    async fn locate(
        places: &[(&str, f64, f64)],
        place: Place,
    ) -> (Option<(f64, f64)>, Vec<String>) {
        let svc = fixture::service(places);
        let found = svc
            .execute(Locate(place))
            .await
            .unwrap_or_else(|e| match e {});
        let queries = svc.geocoder().queries().await;
        (found.map(|c| (c.latitude(), c.longitude())), queries)
    }

    #[tokio::test]
    async fn stops_at_exact_match() {
        let (found, queries) =
            locate(&[("Albany", 42.65, -73.75)], Place::new("", "Albany"))
                .await;

        assert_eq!(found, Some((42.65, -73.75)));
        assert_eq!(queries, ["Albany"]);
    }

    #[tokio::test]
    async fn sweeps_states_in_order() {
        let (found, queries) = locate(
            &[("Springfield, MA", 42.1, -72.59)],
            Place::new("", "Springfield"),
        )
        .await;

        assert_eq!(found, Some((42.1, -72.59)));
        assert_eq!(
            queries,
            [
                "Springfield",
                "Springfield, NY",
                "Springfield, VT",
                "Springfield, MA",
            ],
        );
    }

    #[tokio::test]
    async fn falls_back_to_jittered_bare_city() {
        let (found, queries) = locate(
            &[("Troy", 42.73, -73.69)],
            Place::new("1 Nowhere Rd", "Troy"),
        )
        .await;

        let (lat, lon) = found.unwrap();
        assert!((lat - 42.73).abs() <= 0.005 + 1e-9);
        assert!((lon + 73.69).abs() <= 0.005 + 1e-9);
        assert_eq!(
            queries.first().map(String::as_str),
            Some("1 Nowhere Rd, Troy"),
        );
        assert_eq!(queries.last().map(String::as_str), Some("Troy"));
        assert_eq!(queries.len(), 8);
    }

    #[tokio::test]
    async fn skips_failing_queries() {
        let geocoder = Fixed::new([
            ("Albany", Coordinates::new(42.65, -73.75).unwrap()),
            ("Albany, NY", Coordinates::new(42.66, -73.76).unwrap()),
        ])
        .failing_on(["Albany"]);
        let svc = Service::new(fixture::config(), Memory::default(), geocoder);

        let found = svc
            .execute(Locate(Place::new("", "Albany")))
            .await
            .unwrap_or_else(|e| match e {})
            .map(|c| (c.latitude(), c.longitude()));

        assert_eq!(found, Some((42.66, -73.76)));
        assert_eq!(svc.geocoder().queries().await, ["Albany", "Albany, NY"]);
    }

    #[tokio::test]
    async fn reports_not_found() {
        let (found, queries) = locate(&[], Place::new("", "Atlantis")).await;

        assert_eq!(found, None);
        assert_eq!(queries.len(), 7);
    }

    #[tokio::test]
    async fn blank_place_queries_nothing() {
        let (found, queries) = locate(&[], Place::new(" ", "")).await;

        assert_eq!(found, None);
        assert!(queries.is_empty());
    }
}
