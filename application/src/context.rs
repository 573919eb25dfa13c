//! [`Context`]-related definitions.

use std::sync::atomic::{self, AtomicU16};

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use common::DateTime;
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::{command, domain::admin, Command as _};
use tokio::sync::OnceCell;

use crate::{define_error, AsError as _, Error, JuniperResponse, Service};

/// Application context of a single HTTP request.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Error status code.
    error_status_code: AtomicU16,

    /// Parts of the HTTP request.
    parts: http::request::Parts,

    /// [`Session`] created while executing this request.
    ///
    /// Takes precedence over the one from the request headers.
    created_session: OnceCell<Session>,

    /// [`Session`] authorized from the request headers, resolved lazily.
    authorized_session: OnceCell<Result<Option<Session>, Error>>,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the error status code of this [`Context`].
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Sets the error status code for this [`Context`].
    ///
    /// Provided [`http::StatusCode`] will be applied to the response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Helper method calling [`Context::set_error_status_code()`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Sets the current [`Session`] for the rest of this request, once the
    /// administrator has logged in.
    ///
    /// Only the first created [`Session`] is kept.
    pub fn set_current_session(&self, session: Session) {
        _ = self.created_session.set(session);
    }

    /// Returns the current [`Session`], if any.
    ///
    /// [`None`] means the request is anonymous. Expired or tampered tokens
    /// make the request anonymous too.
    ///
    /// # Errors
    ///
    /// Errors if the `Authorization` header is malformed.
    pub async fn try_current_session(&self) -> Result<Option<Session>, Error> {
        if let Some(session) = self.created_session.get() {
            return Ok(Some(session.clone()));
        }
        self.authorized_session
            .get_or_init(|| self.authorize())
            .await
            .clone()
            .map_err(self.error())
    }

    /// Indicates whether the current request is made by the administrator.
    ///
    /// # Errors
    ///
    /// Errors if the `Authorization` header is malformed.
    pub async fn is_admin(&self) -> Result<bool, Error> {
        self.try_current_session().await.map(|s| s.is_some())
    }

    /// Returns the current [`Session`], requiring the request to be made by
    /// the administrator.
    ///
    /// # Errors
    ///
    /// With `AUTHORIZATION_REQUIRED` code if the request is anonymous.
    pub async fn current_session(&self) -> Result<Session, Error> {
        self.try_current_session()
            .await?
            .ok_or_else(|| AuthError::AuthorizationRequired.into())
            .map_err(self.error())
    }

    /// Applies the [`juniper::Variables`] provided by the client on GraphQL
    /// subscription initialization.
    ///
    /// # Errors
    ///
    /// Errors if the provided variables are invalid.
    pub(crate) fn apply_subscription_variables(
        &mut self,
        vars: &juniper::Variables,
    ) -> Result<(), Error> {
        let Some(token) = vars.get("authToken") else {
            return Ok(());
        };

        let token = token
            .as_string_value()
            .ok_or_else(|| Error::from(AuthError::InvalidVariables))?;
        let header = format!("Bearer {token}")
            .parse()
            .map_err(|_| Error::from(AuthError::InvalidVariables))?;
        drop(
            self.parts
                .headers
                .insert(http::header::AUTHORIZATION, header),
        );

        Ok(())
    }

    /// Authorizes the [`Session`] from the `Authorization` header.
    async fn authorize(&self) -> Result<Option<Session>, Error> {
        let bearer = match self
            .parts
            .clone()
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
        {
            Ok(TypedHeader(Authorization(bearer))) => bearer,
            Err(e) if e.is_missing() => return Ok(None),
            Err(e) => return Err(e.into_error()),
        };

        #[expect(unsafe_code, reason = "specified in correct header")]
        let token = unsafe {
            admin::session::Token::new_unchecked(bearer.token().to_owned())
        };
        match self
            .service
            .execute(command::AuthorizeAdminSession {
                token: token.clone(),
            })
            .await
        {
            Ok(s) => Ok(Some(Session {
                email: s.email,
                token,
                expires_at: s.expires_at.coerce(),
            })),
            Err(e) => {
                tracing::debug!("treating request as anonymous: {e}");
                Ok(None)
            }
        }
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                JuniperResponse {
                    status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                    response: GraphQLBatchResponse::Single(
                        GraphQLResponse::error(
                            Error::internal(&"missing `Service` extension")
                                .into_field_error(),
                        ),
                    ),
                }
            })?;

        Ok(Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            parts: parts.clone(),
            created_session: OnceCell::new(),
            authorized_session: OnceCell::new(),
        })
    }
}

/// Administrator session.
#[derive(Clone, Debug)]
pub struct Session {
    /// [`admin::Email`] of the administrator.
    pub email: admin::Email,

    /// Authentication token.
    pub token: admin::session::Token,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: DateTime,
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Administrator authorization required"]
        AuthorizationRequired,

        #[code = "INVALID_VARIABLES"]
        #[status = BAD_REQUEST]
        #[message = "Invalid subscription authorization variables"]
        InvalidVariables,
    }
}
