//! [`Command`] for updating an existing [`Project`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        project::{
            self, Address, BuildingType, City, Client, Compensation,
            Coordinates, Description, ImageUrl, MarketSector, MiniDescription,
            ProjectManager, Status, Title, Year,
        },
        Project,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Project`].
#[derive(Clone, Debug)]
pub struct UpdateProject {
    /// ID of the [`Project`] to update.
    pub id: project::Id,

    /// [`Changes`] to apply.
    pub changes: Changes,
}

/// Partial changes of [`project::Details`].
///
/// [`None`] leaves the field as is. For optional fields, `Some(None)` clears
/// the field.
#[derive(Clone, Debug, Default)]
pub struct Changes {
    /// New [`Title`].
    pub title: Option<Title>,

    /// New [`Address`].
    pub address: Option<Option<Address>>,

    /// New [`City`].
    pub city: Option<City>,

    /// New [`Coordinates`].
    pub coordinates: Option<Coordinates>,

    /// New [`MarketSector`].
    pub market_sector: Option<MarketSector>,

    /// New [`BuildingType`].
    pub building_type: Option<Option<BuildingType>>,

    /// New [`Description`].
    pub description: Option<Description>,

    /// New [`MiniDescription`].
    pub mini_description: Option<Option<MiniDescription>>,

    /// New [`Client`].
    pub client: Option<Client>,

    /// New [`ProjectManager`].
    pub project_manager: Option<Option<ProjectManager>>,

    /// New [`Status`].
    pub status: Option<Status>,

    /// New [`Compensation`].
    pub compensation: Option<Compensation>,

    /// New [`Year`].
    pub year: Option<Year>,

    /// New featured indicator.
    pub featured: Option<bool>,

    /// New recent indicator.
    pub recent: Option<bool>,

    /// New [`ImageUrl`]s, replacing the existing ones.
    pub image_urls: Option<Vec<ImageUrl>>,
}

impl Changes {
    /// Applies these [`Changes`] to the provided [`project::Details`].
    pub fn apply(self, to: &mut project::Details) {
        /// Overwrites the `field` if a new `value` is provided.
        fn set<T>(field: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *field = v;
            }
        }

        let Self {
            title,
            address,
            city,
            coordinates,
            market_sector,
            building_type,
            description,
            mini_description,
            client,
            project_manager,
            status,
            compensation,
            year,
            featured,
            recent,
            image_urls,
        } = self;

        set(&mut to.title, title);
        set(&mut to.address, address);
        set(&mut to.city, city);
        set(&mut to.coordinates, coordinates);
        set(&mut to.market_sector, market_sector);
        set(&mut to.building_type, building_type);
        set(&mut to.description, description);
        set(&mut to.mini_description, mini_description);
        set(&mut to.client, client);
        set(&mut to.project_manager, project_manager);
        set(&mut to.status, status);
        set(&mut to.compensation, compensation);
        set(&mut to.year, year);
        set(&mut to.featured, featured);
        set(&mut to.recent, recent);
        set(&mut to.image_urls, image_urls);
    }
}

impl<Db, Geo> Command<UpdateProject> for Service<Db, Geo>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Project, project::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Project>, project::Id>>,
            Ok = Option<Project>,
            Err = Traced<database::Error>,
        > + Database<Update<Project>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Project;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateProject,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProject { id, changes } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent updates of the same `Project`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut project = tx
            .execute(Select(By::<Option<Project>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        changes.apply(&mut project.details);
        project.updated_at = DateTime::now().coerce();

        tx.execute(Update(project.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(project)
    }
}

/// Error of [`UpdateProject`] [`Command`] execution.
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
        command::create_project::fixture::create,
        domain::project::{self, Address, Status, Title},
        fixture, Command as _,
    };

    use super::{Changes, ExecutionError, UpdateProject};

    #[tokio::test]
    async fn merges_changes() {
        let svc = fixture::service(&[("Albany", 42.65, -73.75)]);
        let mut cmd = create("Campus Center");
        cmd.address = Some(Address::new("1 University Pl").unwrap());
        let created = svc.execute(cmd).await.unwrap();

        let updated = svc
            .execute(UpdateProject {
                id: created.id,
                changes: Changes {
                    title: Some(Title::new("Student Center").unwrap()),
                    address: Some(None),
                    status: Some(Status::Inactive),
                    ..Changes::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.details.title.to_string(), "Student Center");
        assert_eq!(updated.details.address, None);
        assert_eq!(updated.details.status, Status::Inactive);
        assert_eq!(updated.details.client, created.details.client);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn fails_on_missing_project() {
        let svc = fixture::service(&[]);
        let id = project::Id::new();

        let err = svc
            .execute(UpdateProject {
                id,
                changes: Changes::default(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotExists(i) if *i == id,
        ));
    }
}
