//! [`Fixed`] [`Geocoder`] implementation.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use common::operations::Resolve;
use derive_more::{Display, Error as StdError};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::{
    domain::project::Coordinates,
    infra::{geocoder, Geocoder},
};

/// [`Geocoder`] knowing a fixed set of places, recording every query it
/// receives.
#[derive(Clone, Debug, Default)]
pub struct Fixed {
    /// Known places, keyed by a lowercased query.
    places: HashMap<String, Coordinates>,

    /// Lowercased queries failing instead of being resolved.
    failing: HashSet<String>,

    /// Received queries, in order.
    queries: Arc<Mutex<Vec<String>>>,
}

impl Fixed {
    /// Creates a new [`Fixed`] [`Geocoder`] knowing the provided places.
    #[must_use]
    pub fn new<Q: AsRef<str>>(
        places: impl IntoIterator<Item = (Q, Coordinates)>,
    ) -> Self {
        Self {
            places: places
                .into_iter()
                .map(|(q, c)| (q.as_ref().to_lowercase(), c))
                .collect(),
            failing: HashSet::new(),
            queries: Arc::default(),
        }
    }

    /// Makes this [`Fixed`] [`Geocoder`] fail on the provided queries.
    #[must_use]
    pub fn failing_on<Q: AsRef<str>>(
        mut self,
        queries: impl IntoIterator<Item = Q>,
    ) -> Self {
        self.failing
            .extend(queries.into_iter().map(|q| q.as_ref().to_lowercase()));
        self
    }

    /// Returns all the queries received so far, in order.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

impl Geocoder<Resolve<String>> for Fixed {
    type Ok = Option<Coordinates>;
    type Err = Traced<geocoder::Error>;

    async fn execute(
        &self,
        Resolve(query): Resolve<String>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = query.to_lowercase();
        self.queries.lock().await.push(query.clone());
        if self.failing.contains(&key) {
            return Err(tracerr::new!(geocoder::Error::Fixed(Error { query })));
        }
        Ok(self.places.get(&key).copied())
    }
}

/// [`Fixed`] [`Geocoder`] error.
#[derive(Clone, Debug, Display, StdError)]
#[display("`{query}` is set to fail")]
pub struct Error {
    /// Failed query.
    #[error(not(source))]
    pub query: String,
}
