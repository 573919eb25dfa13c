//! In-memory [`Database`] implementation.

use std::sync::Arc;

use common::{
    operations::{By, Commit, Delete, Insert, Lock, Select, Transact, Update},
    DateTime,
};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{project, Project},
    infra::{database, Database},
    read::project::Filter,
};

/// In-memory [`Database`] keeping [`Project`]s in their insertion order.
///
/// Transactions are not isolated: a [`Transact`]ed [`Memory`] shares the
/// storage and its writes are visible right away.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored [`Project`]s, oldest first.
    projects: Arc<RwLock<Vec<Project>>>,
}

impl Database<Select<By<Option<Project>, project::Id>>> for Memory {
    type Ok = Option<Project>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Project>, project::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.projects.read().await.iter().find(|p| p.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Project>, Filter>>> for Memory {
    type Ok = Vec<Project>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Project>, Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        Ok(self
            .projects
            .read()
            .await
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }
}

impl Database<Lock<By<Project, project::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Project, project::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

/// Makes a new [`Project`] out of the provided [`project::Details`] with a
/// fresh [`project::Id`].
fn assign(details: project::Details, now: DateTime) -> Project {
    Project {
        id: project::Id::new(),
        details,
        created_at: now.coerce(),
        updated_at: now.coerce(),
    }
}

impl Database<Insert<project::Details>> for Memory {
    type Ok = Project;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(details): Insert<project::Details>,
    ) -> Result<Self::Ok, Self::Err> {
        let project = assign(details, DateTime::now());
        self.projects.write().await.push(project.clone());
        Ok(project)
    }
}

impl Database<Insert<Vec<project::Details>>> for Memory {
    type Ok = Vec<Project>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(details): Insert<Vec<project::Details>>,
    ) -> Result<Self::Ok, Self::Err> {
        let now = DateTime::now();
        let stored = details
            .into_iter()
            .map(|d| assign(d, now))
            .collect::<Vec<_>>();
        self.projects.write().await.extend(stored.iter().cloned());
        Ok(stored)
    }
}

impl Database<Update<Project>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(project): Update<Project>,
    ) -> Result<Self::Ok, Self::Err> {
        if let Some(stored) = self
            .projects
            .write()
            .await
            .iter_mut()
            .find(|p| p.id == project.id)
        {
            *stored = project;
        }
        Ok(())
    }
}

impl Database<Delete<By<Project, project::Id>>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Project, project::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut projects = self.projects.write().await;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        Ok(projects.len() != before)
    }
}

impl Database<Delete<By<Vec<Project>, Vec<project::Id>>>> for Memory {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Project>, Vec<project::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let mut projects = self.projects.write().await;
        let before = projects.len();
        projects.retain(|p| !ids.contains(&p.id));
        Ok(u64::try_from(before - projects.len()).unwrap_or(u64::MAX))
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Delete, Insert, Select};

    use crate::{
        domain::{project::Status, Project},
        infra::Database as _,
        read::project::{fixture::details, Filter},
    };

    use super::Memory;

    #[tokio::test]
    async fn assigns_identity_on_insert() {
        let db = Memory::default();

        let one = db.execute(Insert(details("A", 1.0, 1.0))).await.unwrap();
        let many = db
            .execute(Insert(vec![
                details("A", 1.0, 1.0),
                details("B", 2.0, 2.0),
            ]))
            .await
            .unwrap();

        assert_ne!(one.id, many[0].id);
        assert_ne!(many[0].id, many[1].id);
        assert_eq!(many[0].created_at, many[1].created_at);
        assert_eq!(one.details, details("A", 1.0, 1.0));
        for p in many.iter().chain([&one]) {
            let found = db
                .execute(Select(By::<Option<Project>, _>::new(p.id)))
                .await
                .unwrap();
            assert_eq!(found.as_ref(), Some(p));
        }
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let db = Memory::default();
        let stored = db
            .execute(Insert(vec![
                details("A", 1.0, 1.0),
                details("B", 2.0, 2.0),
            ]))
            .await
            .unwrap();
        let [a, b] = <[Project; 2]>::try_from(stored).unwrap();

        let list = db
            .execute(Select(By::<Vec<Project>, _>::new(Filter::default())))
            .await
            .unwrap();

        assert_eq!(list, [b, a]);
    }

    #[tokio::test]
    async fn filters_list() {
        let db = Memory::default();
        let mut inactive = details("A", 1.0, 1.0);
        inactive.status = Status::Inactive;
        let a = db.execute(Insert(inactive)).await.unwrap();
        _ = db.execute(Insert(details("B", 2.0, 2.0))).await.unwrap();

        let list = db
            .execute(Select(By::<Vec<Project>, _>::new(Filter {
                statuses: vec![Status::Inactive],
                ..Filter::default()
            })))
            .await
            .unwrap();

        assert_eq!(list, [a]);
    }

    #[tokio::test]
    async fn deletes_by_ids() {
        let db = Memory::default();
        let stored = db
            .execute(Insert(vec![
                details("A", 1.0, 1.0),
                details("B", 2.0, 2.0),
                details("C", 3.0, 3.0),
            ]))
            .await
            .unwrap();
        let [a, b, c] = <[Project; 3]>::try_from(stored).unwrap();

        let deleted = db
            .execute(Delete(By::<Vec<Project>, _>::new(vec![a.id, c.id])))
            .await
            .unwrap();
        assert_eq!(deleted, 2);

        let gone = db
            .execute(Delete(By::<Project, _>::new(a.id)))
            .await
            .unwrap();
        assert!(!gone);

        let left = db
            .execute(Select(By::<Option<Project>, _>::new(b.id)))
            .await
            .unwrap();
        assert_eq!(left, Some(b));
    }
}
