//! [`Command`] for creating a new [`Project`].

use std::convert::Infallible;

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        location::Place,
        project::{
            self, Address, BuildingType, City, Client, Compensation,
            Coordinates, Description, ImageUrl, MarketSector, MiniDescription,
            ProjectManager, Status, Title, Year,
        },
        Project,
    },
    infra::{database, Database},
    query::Locate,
    Query, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Project`].
#[derive(Clone, Debug)]
pub struct CreateProject {
    /// [`Title`] of a new [`Project`].
    pub title: Title,

    /// [`Address`] of a new [`Project`].
    pub address: Option<Address>,

    /// [`City`] of a new [`Project`].
    pub city: City,

    /// [`Coordinates`] of a new [`Project`].
    ///
    /// Looked up by the [`Address`] and [`City`] if not provided.
    pub coordinates: Option<Coordinates>,

    /// [`MarketSector`] of a new [`Project`].
    pub market_sector: MarketSector,

    /// [`BuildingType`] of a new [`Project`].
    pub building_type: Option<BuildingType>,

    /// [`Description`] of a new [`Project`].
    pub description: Description,

    /// [`MiniDescription`] of a new [`Project`].
    pub mini_description: Option<MiniDescription>,

    /// [`Client`] of a new [`Project`].
    pub client: Client,

    /// [`ProjectManager`] of a new [`Project`].
    pub project_manager: Option<ProjectManager>,

    /// [`Status`] of a new [`Project`].
    pub status: Status,

    /// [`Compensation`] of a new [`Project`].
    pub compensation: Compensation,

    /// [`Year`] of a new [`Project`].
    pub year: Year,

    /// Indicator whether a new [`Project`] is featured.
    pub featured: bool,

    /// Indicator whether a new [`Project`] is recent.
    pub recent: bool,

    /// [`ImageUrl`]s of a new [`Project`].
    pub image_urls: Vec<ImageUrl>,
}

impl<Db, Geo> Command<CreateProject> for Service<Db, Geo>
where
    Db: Database<
        Insert<project::Details>,
        Ok = Project,
        Err = Traced<database::Error>,
    >,
    Self: Query<Locate, Ok = Option<Coordinates>, Err = Infallible>,
{
    type Ok = Project;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProject,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProject {
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
        } = cmd;

        let coordinates = if let Some(c) = coordinates {
            c
        } else {
            let street = address.as_ref().map(AsRef::<str>::as_ref);
            let place = Place::new(street.unwrap_or_default(), &city);
            self.execute(Locate(place.clone()))
                .await
                .unwrap_or_else(|e| match e {})
                .ok_or(E::LocationNotFound(place))
                .map_err(tracerr::wrap!())?
        };

        let details = project::Details {
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
        };

        self.database()
            .execute(Insert(details))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`CreateProject`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Place`] of the [`Project`] cannot be located.
    #[display("Cannot locate `{}`", _0.query().unwrap_or_default())]
    #[from(ignore)]
    LocationNotFound(#[error(not(source))] Place),
}

#[cfg(test)]
pub(crate) mod fixture {
    //! [`CreateProject`] commands to be used in tests.

    use crate::domain::project::{
        City, Client, Compensation, Description, MarketSector, Status, Title,
        Year,
    };

    use super::CreateProject;

    /// Builds a [`CreateProject`] in Albany without coordinates.
    pub(crate) fn create(title: &str) -> CreateProject {
        CreateProject {
            title: Title::new(title).unwrap(),
            address: None,
            city: City::new("Albany").unwrap(),
            coordinates: None,
            market_sector: MarketSector::Education,
            building_type: None,
            description: Description::new("New campus building").unwrap(),
            mini_description: None,
            client: Client::new("SUNY").unwrap(),
            project_manager: None,
            status: Status::Active,
            compensation: Compensation::ZERO,
            year: Year::new(2024).unwrap(),
            featured: true,
            recent: false,
            image_urls: vec![],
        }
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        domain::{
            project::{City, Coordinates},
            Project,
        },
        fixture,
        infra::Database as _,
        Command as _,
    };

    use super::{fixture::create, ExecutionError};

    #[tokio::test]
    async fn locates_and_stores_project() {
        let svc = fixture::service(&[("Albany", 42.65, -73.75)]);

        let created = svc.execute(create("Campus Center")).await.unwrap();

        assert_eq!(created.details.coordinates.latitude(), 42.65);
        let stored = svc
            .database()
            .execute(Select(By::<Option<Project>, _>::new(created.id)))
            .await
            .unwrap();
        assert_eq!(stored, Some(created));
    }

    #[tokio::test]
    async fn takes_identity_from_storage() {
        let svc = fixture::service(&[("Albany", 42.65, -73.75)]);

        let first = svc.execute(create("Campus Center")).await.unwrap();
        let second = svc.execute(create("Campus Center")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.details, second.details);
        assert_eq!(first.created_at, first.updated_at.coerce());
    }

    #[tokio::test]
    async fn keeps_provided_coordinates() {
        let svc = fixture::service(&[]);
        let mut cmd = create("Campus Center");
        cmd.coordinates = Coordinates::new(40.0, -74.0);

        let created = svc.execute(cmd).await.unwrap();

        assert_eq!(created.details.coordinates.longitude(), -74.0);
        assert!(svc.geocoder().queries().await.is_empty());
    }

    #[tokio::test]
    async fn fails_on_unknown_location() {
        let svc = fixture::service(&[]);
        let mut cmd = create("Campus Center");
        cmd.city = City::new("Atlantis").unwrap();

        let err = svc.execute(cmd).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::LocationNotFound(_)));
    }
}
