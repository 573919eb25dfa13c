//! Administrator-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
use service::{command, domain};

use crate::{api::scalar, Context, Session};

/// Email of the administrator.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "AdminEmail", with = scalar::Via::<domain::admin::Email>)]
pub struct Email(domain::admin::Email);

/// Password of the administrator.
#[derive(AsRef, Clone, Debug, From, GraphQLScalar, Into)]
#[graphql(
    name = "AdminPassword",
    with = scalar::Via::<domain::admin::Password>,
)]
pub struct Password(domain::admin::Password);

/// Access token of an `AdminSession`.
///
/// Passed as `Authorization: Bearer <token>` header, or as `authToken`
/// variable when initializing a subscription.
#[derive(AsRef, Clone, Debug, From, GraphQLScalar, Into)]
#[graphql(
    name = "AdminAuthToken",
    with = scalar::Via::<domain::admin::session::Token>,
)]
pub struct Token(domain::admin::session::Token);

/// Authenticated administrator session.
#[derive(Clone, Debug, From)]
pub struct AdminSession(Session);

/// Authenticated administrator session.
#[graphql_object(context = Context)]
impl AdminSession {
    /// Email of the administrator.
    #[must_use]
    pub fn email(&self) -> Email {
        self.0.email.clone().into()
    }

    /// `DateTime` when this `AdminSession` expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime {
        self.0.expires_at
    }
}

/// Result of an `AdminSession` creation.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "CreateAdminSessionResult")]
pub struct CreateResult {
    /// Access token of the created `AdminSession`.
    pub token: Token,

    /// Created `AdminSession`.
    pub session: AdminSession,
}

impl From<command::create_admin_session::Output> for Session {
    fn from(output: command::create_admin_session::Output) -> Self {
        let command::create_admin_session::Output { token, session } = output;
        Self {
            email: session.email,
            token,
            expires_at: session.expires_at.coerce(),
        }
    }
}

impl From<Session> for CreateResult {
    fn from(session: Session) -> Self {
        Self {
            token: session.token.clone().into(),
            session: session.into(),
        }
    }
}
