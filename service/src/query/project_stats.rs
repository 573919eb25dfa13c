//! [`ProjectStats`] definition.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Project,
    infra::{database, Database},
    read::project::{Filter, Stats},
    Service,
};

use super::Query;

/// [`Query`] summarizing the [`Project`]s passing a [`Filter`].
#[derive(Clone, Debug, Default)]
pub struct ProjectStats(pub Filter);

impl<Db, Geo> Query<ProjectStats> for Service<Db, Geo>
where
    Db: Database<
        Select<By<Vec<Project>, Filter>>,
        Ok = Vec<Project>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ProjectStats(filter): ProjectStats,
    ) -> Result<Self::Ok, Self::Err> {
        let projects = self
            .database()
            .execute(Select(By::new(filter)))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(Stats::of(&projects))
    }
}
