//! [`Command`] for deleting multiple [`Project`]s at once.

use common::operations::{By, Delete};
use tracerr::Traced;

use crate::{
    domain::{project, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting all the [`Project`]s with the provided IDs.
///
/// Unknown IDs are ignored.
#[derive(Clone, Debug)]
pub struct DeleteProjects(pub Vec<project::Id>);

impl<Db, Geo> Command<DeleteProjects> for Service<Db, Geo>
where
    Db: Database<
        Delete<By<Vec<Project>, Vec<project::Id>>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    /// Number of deleted [`Project`]s.
    type Ok = u64;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteProjects(ids): DeleteProjects,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Delete(By::new(ids)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`DeleteProjects`] [`Command`] execution.
pub type ExecutionError = database::Error;
