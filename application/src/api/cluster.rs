//! [`Cluster`]-related definitions.

use derive_more::{From, Into};
use juniper::graphql_object;
use service::read;

use crate::{api, Context, Error};

/// Group of nearby `Project`s shown as a single map marker.
#[derive(Clone, Debug, From, Into)]
pub struct Cluster(read::project::Cluster);

/// Group of nearby `Project`s shown as a single map marker.
///
/// Members are within about 111 meters of the seed `Project`, which goes
/// first.
#[graphql_object(name = "ProjectCluster", context = Context)]
impl Cluster {
    /// Position of this `ProjectCluster` marker, being the position of its
    /// seed `Project`.
    #[must_use]
    pub fn coordinates(&self) -> Option<api::project::Coordinates> {
        self.0.seed().map(|p| p.details.coordinates.into())
    }

    /// Number of `Project`s in this `ProjectCluster`.
    pub fn size(&self) -> Result<i32, Error> {
        i32::try_from(self.0.projects.len())
            .map_err(crate::AsError::into_error)
    }

    /// `Project`s of this `ProjectCluster`, the seed one going first.
    #[must_use]
    pub fn projects(&self) -> Vec<api::Project> {
        self.0.projects.iter().cloned().map(Into::into).collect()
    }
}
