//! GraphQL [`Mutation`]s definitions.

use itertools::Itertools as _;
use juniper::{graphql_object, GraphQLInputObject};
use service::{
    command::{self, update_project::Changes},
    domain, Command as _,
};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `AdminSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials are not the
    ///                         administrator's ones.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createAdminSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_admin_session(
        email: api::admin::Email,
        password: api::admin::Password,
        ctx: &Context,
    ) -> Result<api::admin::CreateResult, Error> {
        let session: Session = ctx
            .service()
            .execute(command::CreateAdminSession {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .into();

        ctx.set_current_session(session.clone());

        Ok(session.into())
    }

    /// Creates a new `Project`.
    ///
    /// When `coordinates` are omitted, they are looked up by the `address`
    /// and the `city`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not made by the
    ///                              administrator;
    /// - `INVALID_COORDINATES` - provided `coordinates` are out of bounds;
    /// - `LOCATION_NOT_FOUND` - `coordinates` are omitted and the location
    ///                          cannot be looked up.
    #[tracing::instrument(
        skip_all,
        fields(
            city = %project.city,
            gql.name = "createProject",
            otel.name = Self::SPAN_NAME,
            title = %project.title,
        ),
    )]
    pub async fn create_project(
        project: NewProject,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        _ = ctx.current_session().await?;

        let cmd: command::CreateProject =
            project.try_into().map_err(ctx.error())?;
        ctx.service()
            .execute(cmd)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Project` with the provided ID.
    ///
    /// Omitted fields are left as is, while `null` clears optional ones.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not made by the
    ///                              administrator;
    /// - `INVALID_COORDINATES` - provided `coordinates` are out of bounds;
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the provided ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateProject",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_project(
        id: api::project::Id,
        changes: ProjectChanges,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        _ = ctx.current_session().await?;

        let changes = changes.try_into().map_err(ctx.error())?;
        ctx.service()
            .execute(command::UpdateProject {
                id: id.into(),
                changes,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Project` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not made by the
    ///                              administrator;
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the provided ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteProject",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_project(
        id: api::project::Id,
        ctx: &Context,
    ) -> Result<api::project::Id, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(command::DeleteProject(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| id)
    }

    /// Deletes all the `Project`s with the provided IDs, ignoring unknown
    /// ones.
    ///
    /// Returns the number of deleted `Project`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not made by the
    ///                              administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            count = ids.len(),
            gql.name = "deleteProjects",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_projects(
        ids: Vec<api::project::Id>,
        ctx: &Context,
    ) -> Result<i32, Error> {
        _ = ctx.current_session().await?;

        let deleted = ctx
            .service()
            .execute(command::DeleteProjects(
                ids.into_iter().map(Into::into).collect(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        i32::try_from(deleted)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Imports `Project`s from the provided CSV file.
    ///
    /// Nothing is imported if any row is invalid. The rows repeating known
    /// titles are imported only if `confirmDuplicates` is set.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not made by the
    ///                              administrator;
    /// - `IMPORT_REJECTED` - the file has validation errors, listed in the
    ///                       error message;
    /// - `DUPLICATES_UNCONFIRMED` - the file repeats known titles and
    ///                              `confirmDuplicates` is not set.
    #[tracing::instrument(
        skip_all,
        fields(
            confirm_duplicates = confirm_duplicates,
            csv.len = csv.len(),
            gql.name = "importProjects",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn import_projects(
        csv: String,
        confirm_duplicates: Option<bool>,
        ctx: &Context,
    ) -> Result<Vec<api::Project>, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(command::ImportProjects {
                csv: csv.into_bytes(),
                confirm_duplicates: confirm_duplicates.unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }
}

/// Input of a new `Project`.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct NewProject {
    /// Title of the `Project`.
    pub title: api::project::Title,

    /// Street address of the `Project`.
    pub address: Option<api::project::Address>,

    /// City the `Project` is located in.
    pub city: api::project::City,

    /// Position of the `Project` on the map. Looked up if omitted.
    pub coordinates: Option<api::project::CoordinatesInput>,

    /// Market sector of the `Project`.
    pub market_sector: api::sector::MarketSector,

    /// Free-text building type of the `Project`.
    pub building_type: Option<api::project::BuildingType>,

    /// Long description of the `Project`.
    pub description: api::project::Description,

    /// Short description of the `Project`.
    pub mini_description: Option<api::project::MiniDescription>,

    /// Client the `Project` was done for.
    pub client: api::project::Client,

    /// Manager of the `Project`.
    pub project_manager: Option<api::project::ProjectManager>,

    /// Lifecycle status of the `Project`. `ACTIVE` if omitted.
    pub status: Option<api::project::Status>,

    /// Compensation received for the `Project`. Zero if omitted.
    pub compensation: Option<api::project::Compensation>,

    /// Year of the `Project`. The current one if omitted.
    pub year: Option<api::project::Year>,

    /// Indicator whether the `Project` is featured.
    pub featured: Option<bool>,

    /// Indicator whether the `Project` is recent.
    pub recent: Option<bool>,

    /// Ordered images of the `Project`.
    pub image_urls: Option<Vec<api::project::ImageUrl>>,
}

impl TryFrom<NewProject> for command::CreateProject {
    type Error = Error;

    fn try_from(input: NewProject) -> Result<Self, Self::Error> {
        let NewProject {
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
        } = input;

        Ok(Self {
            title: title.into(),
            address: address.map(Into::into),
            city: city.into(),
            coordinates: coordinates
                .map(domain::project::Coordinates::try_from)
                .transpose()?,
            market_sector: market_sector.into(),
            building_type: building_type.map(Into::into),
            description: description.into(),
            mini_description: mini_description.map(Into::into),
            client: client.into(),
            project_manager: project_manager.map(Into::into),
            status: status.map(Into::into).unwrap_or_default(),
            compensation: compensation
                .map_or(domain::project::Compensation::ZERO, Into::into),
            year: year.map_or_else(domain::project::Year::current, Into::into),
            featured: featured.unwrap_or_default(),
            recent: recent.unwrap_or_default(),
            image_urls: image_urls
                .into_iter()
                .flatten()
                .map(Into::into)
                .collect(),
        })
    }
}

/// Changes of an existing `Project`.
///
/// Omitted fields are left as is. Explicit `null`s clear optional fields
/// and are ignored for the required ones.
#[derive(Clone, Debug, Default, GraphQLInputObject)]
pub struct ProjectChanges {
    /// New title.
    pub title: Option<api::project::Title>,

    /// New street address.
    pub address: juniper::Nullable<api::project::Address>,

    /// New city.
    pub city: Option<api::project::City>,

    /// New position on the map.
    pub coordinates: Option<api::project::CoordinatesInput>,

    /// New market sector.
    pub market_sector: Option<api::sector::MarketSector>,

    /// New free-text building type.
    pub building_type: juniper::Nullable<api::project::BuildingType>,

    /// New long description.
    pub description: Option<api::project::Description>,

    /// New short description.
    pub mini_description: juniper::Nullable<api::project::MiniDescription>,

    /// New client.
    pub client: Option<api::project::Client>,

    /// New manager.
    pub project_manager: juniper::Nullable<api::project::ProjectManager>,

    /// New lifecycle status.
    pub status: Option<api::project::Status>,

    /// New compensation.
    pub compensation: Option<api::project::Compensation>,

    /// New year.
    pub year: Option<api::project::Year>,

    /// New featured indicator.
    pub featured: Option<bool>,

    /// New recent indicator.
    pub recent: Option<bool>,

    /// New images, replacing the existing ones.
    pub image_urls: Option<Vec<api::project::ImageUrl>>,
}

impl TryFrom<ProjectChanges> for Changes {
    type Error = Error;

    fn try_from(input: ProjectChanges) -> Result<Self, Self::Error> {
        /// Converts a [`juniper::Nullable`] into a [`Changes`] field.
        fn nullable<A, T>(v: juniper::Nullable<A>) -> Option<Option<T>>
        where
            A: Into<T>,
        {
            v.explicit().map(|v| v.map(Into::into))
        }

        let ProjectChanges {
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
        } = input;

        Ok(Self {
            title: title.map(Into::into),
            address: nullable(address),
            city: city.map(Into::into),
            coordinates: coordinates
                .map(domain::project::Coordinates::try_from)
                .transpose()?,
            market_sector: market_sector.map(Into::into),
            building_type: nullable(building_type),
            description: description.map(Into::into),
            mini_description: nullable(mini_description),
            client: client.map(Into::into),
            project_manager: nullable(project_manager),
            status: status.map(Into::into),
            compensation: compensation.map(Into::into),
            year: year.map(Into::into),
            featured,
            recent,
            image_urls: image_urls
                .map(|urls| urls.into_iter().map(Into::into).collect()),
        })
    }
}

impl AsError for command::create_admin_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = UNAUTHORIZED]
                #[message = "Wrong administrator email or password"]
                WrongCredentials,
            }
        }

        match self {
            Self::JsonWebTokenEncodeError(_) => None,
            Self::WrongCredentials => Some(Error::WrongCredentials.into()),
        }
    }
}

impl AsError for command::create_project::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "LOCATION_NOT_FOUND"]
                #[status = UNPROCESSABLE_ENTITY]
                #[message = "Location of the `Project` cannot be found, \
                             provide its coordinates explicitly"]
                LocationNotFound,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::LocationNotFound(_) => Some(Error::LocationNotFound.into()),
        }
    }
}

impl AsError for command::update_project::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotExists(_) => Some(ProjectError::NotExists.into()),
        }
    }
}

impl AsError for command::delete_project::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotExists(_) => Some(ProjectError::NotExists.into()),
        }
    }
}

impl AsError for command::import_projects::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Rejected(report) => Error::new(
                "IMPORT_REJECTED",
                http::StatusCode::BAD_REQUEST,
                report.to_string(),
            ),
            Self::ConfirmationRequired(dups) => Error::new(
                "DUPLICATES_UNCONFIRMED",
                http::StatusCode::CONFLICT,
                format!(
                    "{} title(s) repeat known ones, confirm to import \
                     anyway:\n{}",
                    dups.len(),
                    dups.iter().format_with("\n", |d, f| {
                        f(&format_args!("  - Row {}: {}", d.row, d.title))
                    }),
                ),
            ),
        })
    }
}

define_error! {
    enum ProjectError {
        #[code = "PROJECT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Project` with the provided ID does not exist"]
        NotExists,
    }
}

#[cfg(test)]
mod spec {
    use service::command::{self, update_project::Changes};

    use crate::AsError as _;

    use super::ProjectChanges;

    #[test]
    fn distinguishes_omitted_and_null_fields() {
        let changes = Changes::try_from(ProjectChanges {
            address: juniper::Nullable::ExplicitNull,
            ..ProjectChanges::default()
        })
        .unwrap();

        assert!(matches!(changes.address, Some(None)));
        assert!(changes.building_type.is_none());
        assert!(changes.title.is_none());
    }

    #[test]
    fn rejects_invalid_coordinate_changes() {
        let res = Changes::try_from(ProjectChanges {
            coordinates: Some(crate::api::project::CoordinatesInput {
                latitude: 0.0,
                longitude: 200.0,
            }),
            ..ProjectChanges::default()
        });

        assert_eq!(res.unwrap_err().code, "INVALID_COORDINATES");
    }

    #[test]
    fn maps_wrong_credentials() {
        use command::create_admin_session::ExecutionError as E;

        let err = E::WrongCredentials.into_error();

        assert_eq!(err.code, "WRONG_CREDENTIALS");
        assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);
    }
}
