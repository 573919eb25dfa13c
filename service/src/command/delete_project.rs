//! [`Command`] for deleting a [`Project`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{project, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Project`] by its ID.
#[derive(Clone, Copy, Debug)]
pub struct DeleteProject(pub project::Id);

impl<Db, Geo> Command<DeleteProject> for Service<Db, Geo>
where
    Db: Database<
        Delete<By<Project, project::Id>>,
        Ok = bool,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteProject(id): DeleteProject,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let deleted = self
            .database()
            .execute(Delete(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::NotExists(id)));
        }
        Ok(())
    }
}

/// Error of [`DeleteProject`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Project`] doesn't exist.
    #[display("`Project(id: {_0})` does not exist")]
    #[from(ignore)]
    NotExists(#[error(not(source))] project::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::create_project::fixture::create, fixture, Command as _,
    };

    use super::{DeleteProject, ExecutionError};

    #[tokio::test]
    async fn deletes_once() {
        let svc = fixture::service(&[("Albany", 42.65, -73.75)]);
        let created = svc.execute(create("Campus Center")).await.unwrap();

        svc.execute(DeleteProject(created.id)).await.unwrap();
        let err = svc.execute(DeleteProject(created.id)).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotExists(_)));
    }
}
