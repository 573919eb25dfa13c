//! [Nominatim] [`Geocoder`] implementation.
//!
//! [Nominatim]: https://nominatim.org

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use common::operations::Resolve;
use derive_more::{Display, Error as StdError, From};
use serde::Deserialize;
use smart_default::SmartDefault;
use tokio::sync::Mutex;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::project::Coordinates,
    infra::{geocoder, Geocoder},
};

/// [`Nominatim`] configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL of the [Nominatim] API.
    ///
    /// [Nominatim]: https://nominatim.org
    #[default("https://nominatim.openstreetmap.org".to_owned())]
    pub base_url: String,

    /// `User-Agent` header to identify with, as required by the usage
    /// policy.
    #[default(
        concat!("portfolio-service/", env!("CARGO_PKG_VERSION")).to_owned()
    )]
    pub user_agent: String,

    /// Timeout of a single request.
    #[default(Duration::from_secs(10))]
    pub timeout: Duration,

    /// Minimal interval between two consecutive requests.
    #[default(Duration::from_secs(1))]
    pub min_interval: Duration,
}

/// [Nominatim] HTTP API client.
///
/// Clones share the same request rate limit.
///
/// [Nominatim]: https://nominatim.org
#[derive(Clone, Debug)]
pub struct Nominatim {
    /// Underlying HTTP client.
    client: reqwest::Client,

    /// Search endpoint URL.
    search_url: String,

    /// Limiter of the request rate.
    rate: Arc<RateLimiter>,
}

impl Nominatim {
    /// Creates a new [`Nominatim`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the HTTP client cannot be initialized.
    pub fn new(conf: &Config) -> Result<Self, Traced<geocoder::Error>> {
        let client = reqwest::Client::builder()
            .user_agent(conf.user_agent.as_str())
            .timeout(conf.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Ok(Self {
            client,
            search_url: format!(
                "{}/search",
                conf.base_url.trim_end_matches('/'),
            ),
            rate: Arc::new(RateLimiter::new(conf.min_interval)),
        })
    }
}

/// Single place found by [`Nominatim`].
#[derive(Debug, Deserialize)]
struct Place {
    /// Latitude as a decimal string.
    lat: String,

    /// Longitude as a decimal string.
    lon: String,
}

impl Geocoder<Resolve<String>> for Nominatim {
    type Ok = Option<Coordinates>;
    type Err = Traced<geocoder::Error>;

    async fn execute(
        &self,
        Resolve(query): Resolve<String>,
    ) -> Result<Self::Ok, Self::Err> {
        use Error as E;

        self.rate.wait().await;

        log::debug!(query = %query, "querying Nominatim");

        let places = self
            .client
            .get(&self.search_url)
            .query(&[
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", "1"),
                ("q", query.as_str()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(tracerr::from_and_wrap!(=> E))
            .map_err(tracerr::map_from)?
            .json::<Vec<Place>>()
            .await
            .map_err(tracerr::from_and_wrap!(=> E))
            .map_err(tracerr::map_from)?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };
        let (Ok(lat), Ok(lon)) =
            (place.lat.parse::<f64>(), place.lon.parse::<f64>())
        else {
            return Err(tracerr::map_from(tracerr::new!(
                E::MalformedCoordinates {
                    latitude: place.lat,
                    longitude: place.lon,
                }
            )));
        };

        Ok(Coordinates::new(lat, lon))
    }
}

/// [`Nominatim`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP request failed or returned a non-success status.
    #[display("Nominatim request failed: {_0}")]
    Http(reqwest::Error),

    /// Response contained unparsable coordinates.
    #[display(
        "Nominatim returned malformed coordinates: `{latitude}`, \
         `{longitude}`"
    )]
    #[from(ignore)]
    MalformedCoordinates {
        /// Returned latitude.
        latitude: String,

        /// Returned longitude.
        longitude: String,
    },
}

/// Limiter of the outgoing requests rate.
#[derive(Debug)]
struct RateLimiter {
    /// Moment of the last request, if any.
    last: Mutex<Option<Instant>>,

    /// Minimal interval between two requests.
    min_interval: Duration,
}

impl RateLimiter {
    /// Creates a new [`RateLimiter`] with the provided interval.
    fn new(min_interval: Duration) -> Self {
        Self {
            last: Mutex::new(None),
            min_interval,
        }
    }

    /// Waits until the next request is allowed.
    async fn wait(&self) {
        let mut last = self.last.lock().await;
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.min_interval {
                let pause = self.min_interval - elapsed;
                log::trace!("rate limiting Nominatim for {pause:?}");
                tokio::time::sleep(pause).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod spec {
    use std::time::{Duration, Instant};

    use super::{Config, Nominatim, RateLimiter};

    #[test]
    fn builds_search_url() {
        let client = Nominatim::new(&Config {
            base_url: "http://localhost:8080/".to_owned(),
            ..Config::default()
        })
        .unwrap();

        assert_eq!(client.search_url, "http://localhost:8080/search");
    }

    #[tokio::test]
    async fn spaces_requests() {
        let limiter = RateLimiter::new(Duration::from_millis(100));

        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
