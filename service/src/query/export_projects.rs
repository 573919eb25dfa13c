//! [`ExportProjects`] definition.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::Project,
    infra::{database, Database},
    read::project::{export, Export, Filter},
    Service,
};

use super::Query;

/// [`Query`] rendering the [`Project`]s passing a [`Filter`] as an importable
/// CSV [`Export`].
#[derive(Clone, Debug, Default)]
pub struct ExportProjects(pub Filter);

impl<Db, Geo> Query<ExportProjects> for Service<Db, Geo>
where
    Db: Database<
        Select<By<Vec<Project>, Filter>>,
        Ok = Vec<Project>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Export;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ExportProjects(filter): ExportProjects,
    ) -> Result<Self::Ok, Self::Err> {
        let projects = self
            .database()
            .execute(Select(By::new(filter)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
        Export::render(&projects)
            .map_err(tracerr::from_and_wrap!(=> ExecutionError))
    }
}

/// Error of [`ExportProjects`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Export`] rendering error.
    #[display("Failed to render export: {_0}")]
    Render(export::Error),
}
