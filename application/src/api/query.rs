//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Project`s passing the provided `filter`, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            filter = ?filter,
            gql.name = "projects",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn projects(
        filter: Option<api::project::Filter>,
        ctx: &Context,
    ) -> Result<Vec<api::Project>, Error> {
        ctx.service()
            .execute(query::projects::List::by(
                api::project::Filter::into_read(filter),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }

    /// Returns the `Project` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "project",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn project(
        id: api::project::Id,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        ctx.service()
            .execute(query::project::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ProjectError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Groups the `Project`s passing the provided `filter` into map
    /// clusters.
    ///
    /// Each cluster is seeded by the newest ungrouped `Project`.
    #[tracing::instrument(
        skip_all,
        fields(
            filter = ?filter,
            gql.name = "projectClusters",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn project_clusters(
        filter: Option<api::project::Filter>,
        ctx: &Context,
    ) -> Result<Vec<api::Cluster>, Error> {
        ctx.service()
            .execute(query::ProjectClusters(api::project::Filter::into_read(
                filter,
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cs| cs.into_iter().map(Into::into).collect())
    }

    /// Summarizes the `Project`s passing the provided `filter`.
    ///
    /// Money figures are visible to the administrator only.
    #[tracing::instrument(
        skip_all,
        fields(
            filter = ?filter,
            gql.name = "projectStats",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn project_stats(
        filter: Option<api::project::Filter>,
        ctx: &Context,
    ) -> Result<api::Stats, Error> {
        let is_admin = ctx.is_admin().await?;
        ctx.service()
            .execute(query::ProjectStats(api::project::Filter::into_read(
                filter,
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|stats| api::Stats::new(stats, is_admin))
    }

    /// Lists all the known market sectors, in the map legend order.
    #[must_use]
    pub fn market_sectors() -> Vec<api::sector::Info> {
        api::sector::Info::all()
    }

    /// Renders the `Project`s passing the provided `filter` as a CSV file,
    /// which can be imported back.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not made by the
    ///                              administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            filter = ?filter,
            gql.name = "exportProjects",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn export_projects(
        filter: Option<api::project::Filter>,
        ctx: &Context,
    ) -> Result<String, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(query::ExportProjects(api::project::Filter::into_read(
                filter,
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Validates the provided CSV file as it would be imported, without
    /// storing anything.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not made by the
    ///                              administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            csv.len = csv.len(),
            gql.name = "previewProjectsImport",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn preview_projects_import(
        csv: String,
        ctx: &Context,
    ) -> Result<api::import::Preview, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(query::ValidateImport {
                csv: csv.into_bytes(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the current `AdminSession`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not made by the
    ///                              administrator.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "adminSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn admin_session(
        ctx: &Context,
    ) -> Result<api::admin::AdminSession, Error> {
        ctx.current_session().await.map(Into::into)
    }
}

impl AsError for query::export_projects::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Render(_) => None,
        }
    }
}

define_error! {
    enum ProjectError {
        #[code = "PROJECT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Project` with the specified ID does not exist"]
        NotExists,
    }
}
