//! Application serves the project portfolio [`Service`] over a GraphQL API.

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;

use std::sync::Arc;

use axum::{
    extract::{Query, WebSocketUpgrade},
    response::{IntoResponse, Response},
    Extension, Json,
};
use derive_more::Debug;
use juniper::{http::GraphQLBatchResponse, DefaultScalarValue, ScalarValue};
use juniper_axum::{extract::JuniperRequest, subscriptions};
use juniper_graphql_ws::ConnectionConfig;
use serde::Deserialize;
use service::{query, read, Query as _};
// Used in binary.
use axum_client_ip as _;
use refinery as _;
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::{Context, Session},
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service =
    service::Service<service::infra::Postgres, service::infra::Nominatim>;

/// [`juniper`] GraphQL response.
#[derive(Debug)]
pub struct JuniperResponse<S = DefaultScalarValue>
where
    S: ScalarValue,
{
    /// Status code of the response.
    pub status_code: http::StatusCode,

    /// Underlying GraphQL response.
    #[debug(skip)]
    pub response: GraphQLBatchResponse<S>,
}

impl<S> IntoResponse for JuniperResponse<S>
where
    S: ScalarValue,
{
    fn into_response(self) -> Response {
        let Self {
            status_code,
            response,
        } = self;

        if response.is_ok() {
            Json(response).into_response()
        } else {
            (status_code, Json(response)).into_response()
        }
    }
}

/// GraphQL API handler.
pub async fn graphql(
    Extension(schema): Extension<Arc<api::Schema>>,
    context: Context,
    JuniperRequest(gql_request): JuniperRequest,
) -> JuniperResponse {
    JuniperResponse {
        status_code: context.error_status_code(),
        response: gql_request.execute(&*schema, &context).await,
    }
}

/// GraphQL subscriptions handler.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
pub async fn subscriptions(
    Extension(schema): Extension<Arc<api::Schema>>,
    mut context: Context,
    ws: WebSocketUpgrade,
) -> Response {
    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .max_frame_size(1024)
        .max_message_size(1024)
        .write_buffer_size(512)
        .max_write_buffer_size(1024)
        .on_upgrade(move |socket| {
            subscriptions::serve_ws(socket, schema, move |vars| async move {
                context.apply_subscription_variables(&vars).map(|()| {
                    ConnectionConfig::new(context)
                        .with_max_in_flight_operations(10)
                })
            })
        })
}

/// Query parameters of the [`export_csv`] handler.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExportParams {
    /// Text to search the exported projects for.
    pub search: Option<String>,

    /// Comma-separated market sector IDs to match any of.
    pub sectors: Option<String>,

    /// Comma-separated project statuses to match any of.
    pub statuses: Option<String>,
}

impl TryFrom<ExportParams> for read::project::Filter {
    type Error = Error;

    fn try_from(params: ExportParams) -> Result<Self, Self::Error> {
        use service::domain::project::{MarketSector, Status};

        /// Splits a comma-separated list, skipping blank items.
        fn split(list: Option<&str>) -> impl Iterator<Item = &str> {
            list.into_iter()
                .flat_map(|l| l.split(','))
                .map(str::trim)
                .filter(|i| !i.is_empty())
        }

        let ExportParams {
            search,
            sectors,
            statuses,
        } = params;
        Ok(Self {
            sectors: split(sectors.as_deref())
                .map(|s| {
                    MarketSector::from_id(s).ok_or(ExportError::UnknownSector)
                })
                .collect::<Result<_, _>>()?,
            statuses: split(statuses.as_deref())
                .map(|s| {
                    s.parse::<Status>().map_err(|_| ExportError::UnknownStatus)
                })
                .collect::<Result<_, _>>()?,
            search: search.and_then(read::project::Search::new),
        })
    }
}

crate::define_error! {
    enum ExportError {
        #[code = "UNKNOWN_SECTOR"]
        #[status = BAD_REQUEST]
        #[message = "Unknown market sector in the `sectors` parameter"]
        UnknownSector,

        #[code = "UNKNOWN_STATUS"]
        #[status = BAD_REQUEST]
        #[message = "Unknown project status in the `statuses` parameter"]
        UnknownStatus,
    }
}

/// CSV download handler, serving the same file as the `exportProjects`
/// GraphQL query.
///
/// Requires the `Authorization: Bearer <token>` header of an
/// administrator session.
pub async fn export_csv(
    context: Context,
    Query(params): Query<ExportParams>,
) -> Response {
    let export: Result<read::project::Export, Error> = async {
        _ = context.current_session().await?;
        let filter = read::project::Filter::try_from(params)?;
        context
            .service()
            .execute(query::ExportProjects(filter))
            .await
            .map_err(AsError::into_error)
    }
    .await;

    match export {
        Ok(csv) => (
            [
                (http::header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    http::header::CONTENT_DISPOSITION,
                    "attachment; filename=\"projects.csv\"",
                ),
            ],
            String::from(csv),
        )
            .into_response(),
        Err(e) => (e.status_code, e.message).into_response(),
    }
}

#[cfg(test)]
mod spec {
    use service::{domain::project, read};

    use super::ExportParams;

    #[test]
    fn filters_export_by_query_params() {
        let filter = read::project::Filter::try_from(ExportParams {
            search: Some("bridge".to_owned()),
            sectors: Some("education, parks,".to_owned()),
            statuses: Some("dormant".to_owned()),
        })
        .unwrap();

        assert_eq!(
            filter,
            read::project::Filter {
                sectors: vec![
                    project::MarketSector::Education,
                    project::MarketSector::Parks,
                ],
                statuses: vec![project::Status::Dormant],
                search: read::project::Search::new("bridge".to_owned()),
            },
        );
    }

    #[test]
    fn rejects_unknown_export_filters() {
        let sector = read::project::Filter::try_from(ExportParams {
            sectors: Some("education,spaceports".to_owned()),
            ..ExportParams::default()
        });
        let status = read::project::Filter::try_from(ExportParams {
            statuses: Some("pending".to_owned()),
            ..ExportParams::default()
        });

        assert_eq!(sector.unwrap_err().code, "UNKNOWN_SECTOR");
        assert_eq!(status.unwrap_err().code, "UNKNOWN_STATUS");
    }
}
