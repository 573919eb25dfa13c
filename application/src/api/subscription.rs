//! GraphQL [`Subscription`]s definitions.

use common::DateTime;
use futures::{
    stream::{self, BoxStream},
    FutureExt as _, StreamExt as _,
};
use juniper::graphql_subscription;

use crate::{context::AuthError, Context, Error};

/// Root of all GraphQL subscriptions.
#[derive(Clone, Copy, Debug)]
pub struct Subscription;

impl Subscription {
    /// Name of the [`tracing::Span`] for the subscriptions.
    const SPAN_NAME: &'static str = "GraphQL subscription";
}

#[graphql_subscription(context = Context)]
impl Subscription {
    /// Waits for the current `AdminSession` to expire.
    ///
    /// Emits a single `AUTHORIZATION_REQUIRED` error once it does, so the
    /// client knows to log in again.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the subscription is not made by the
    ///                              administrator, or the `AdminSession`
    ///                              has expired.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "waitAdminSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn wait_admin_session(
        ctx: &Context,
    ) -> Result<BoxStream<'static, Result<bool, Error>>, Error> {
        let session = ctx.current_session().await?;
        let left = session.expires_at.saturating_since(DateTime::now());
        Ok(stream::once(
            tokio::time::sleep(left)
                .map(|()| Err(AuthError::AuthorizationRequired.into())),
        )
        .boxed())
    }
}
