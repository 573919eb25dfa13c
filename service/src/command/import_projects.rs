//! [`Command`] for importing [`Project`]s from a CSV file.

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        import::{Duplicate, Outcome, Report},
        project, Project,
    },
    infra::{database, Database},
    query::ValidateImport,
    Query, Service,
};

use super::Command;

/// [`Command`] for importing [`Project`]s from a CSV file.
///
/// Nothing is stored unless every row is valid, and, if some titles repeat
/// known ones, the duplicates are confirmed.
#[derive(Clone, Debug)]
pub struct ImportProjects {
    /// Raw uploaded CSV.
    pub csv: Vec<u8>,

    /// Indicator whether rows repeating known titles should be imported
    /// anyway.
    pub confirm_duplicates: bool,
}

impl<Db, Geo> Command<ImportProjects> for Service<Db, Geo>
where
    Self: Query<ValidateImport, Ok = Outcome, Err = Traced<database::Error>>,
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<Vec<project::Details>>,
            Ok = Vec<Project>,
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    /// Stored [`Project`]s, in file order.
    type Ok = Vec<Project>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ImportProjects,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ImportProjects {
            csv,
            confirm_duplicates,
        } = cmd;

        let outcome = self
            .execute(ValidateImport { csv })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !outcome.is_valid() {
            log::debug!(
                "import rejected with {} error(s)",
                outcome.errors.len(),
            );
            return Err(tracerr::new!(E::Rejected(outcome.report())));
        }
        if !outcome.duplicates.is_empty() && !confirm_duplicates {
            return Err(tracerr::new!(E::ConfirmationRequired(
                outcome.duplicates,
            )));
        }

        let details = outcome
            .drafts
            .into_iter()
            .map(|draft| draft.details)
            .collect::<Vec<_>>();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let projects = tx
            .execute(Insert(details))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("imported {} project(s)", projects.len());
        Ok(projects)
    }
}

/// Error of [`ImportProjects`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Imported file has validation errors.
    #[display("Import rejected:\n{_0}")]
    #[from(ignore)]
    Rejected(#[error(not(source))] Report),

    /// Imported file repeats known titles, and that is not confirmed.
    #[display("{} duplicate title(s) are not confirmed", _0.len())]
    #[from(ignore)]
    ConfirmationRequired(#[error(not(source))] Vec<Duplicate>),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::Project,
        fixture,
        infra::{Database as _, Fixed, Memory},
        read::project::{fixture::details, Filter},
        Command as _, Service,
    };

    use super::{ExecutionError, ImportProjects};

    const PLACES: &[(&str, f64, f64)] = &[("Albany", 42.65, -73.75)];

    async fn stored(svc: &Service<Memory, Fixed>) -> Vec<Project> {
        svc.database()
            .execute(Select(By::<Vec<Project>, _>::new(Filter::default())))
            .await
            .unwrap()
    }

    fn import(text: &str, confirm_duplicates: bool) -> ImportProjects {
        ImportProjects {
            csv: text.as_bytes().to_vec(),
            confirm_duplicates,
        }
    }

    #[tokio::test]
    async fn stores_valid_file() {
        let svc = fixture::service(PLACES);

        let imported = svc
            .execute(import(
                "Title,City,Client\n\
                 Main Hall,Albany,NYS OGS\n\
                 River Walk,Albany,City of Albany\n",
                false,
            ))
            .await
            .unwrap();

        assert_eq!(imported.len(), 2);
        assert_ne!(imported[0].id, imported[1].id);
        assert_eq!(imported[0].details.title.to_string(), "Main Hall");
        let mut listed = stored(&svc).await;
        listed.reverse();
        assert_eq!(listed, imported);
    }

    #[tokio::test]
    async fn rejects_invalid_file_without_writes() {
        let svc = fixture::service(PLACES);

        let err = svc
            .execute(import(
                "Title,City,Client\n\
                 Main Hall,Albany,NYS OGS\n\
                 ,Albany,NYS OGS\n",
                false,
            ))
            .await
            .unwrap_err();

        let ExecutionError::Rejected(report) = err.as_ref() else {
            panic!("unexpected error: {err}");
        };
        assert!(report.as_ref().contains("Row 3: Title is required"));
        assert!(stored(&svc).await.is_empty());
    }

    #[tokio::test]
    async fn requires_confirmation_of_duplicates() {
        let svc = fixture::service(PLACES);
        svc.database()
            .execute(Insert(details("Main Hall", 42.65, -73.75)))
            .await
            .unwrap();
        let csv = "Title,City,Client\n\
                   MAIN HALL,Albany,NYS OGS\n\
                   River Walk,Albany,City of Albany\n";

        let err = svc.execute(import(csv, false)).await.unwrap_err();
        let ExecutionError::ConfirmationRequired(dups) = err.as_ref() else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].row, 2);
        assert_eq!(stored(&svc).await.len(), 1);

        let imported = svc.execute(import(csv, true)).await.unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(stored(&svc).await.len(), 3);
    }
}
