//! [`ProjectClusters`] definition.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Project,
    infra::{database, Database},
    read::project::{Cluster, Filter},
    Service,
};

use super::Query;

/// [`Query`] grouping the [`Project`]s passing a [`Filter`] into
/// [`Cluster`]s of nearby ones.
#[derive(Clone, Debug, Default)]
pub struct ProjectClusters(pub Filter);

impl<Db, Geo> Query<ProjectClusters> for Service<Db, Geo>
where
    Db: Database<
        Select<By<Vec<Project>, Filter>>,
        Ok = Vec<Project>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Cluster>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ProjectClusters(filter): ProjectClusters,
    ) -> Result<Self::Ok, Self::Err> {
        let projects = self
            .database()
            .execute(Select(By::new(filter)))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(Cluster::group(projects))
    }
}
