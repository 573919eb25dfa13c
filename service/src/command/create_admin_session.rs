//! [`Command`] for creating an administrator [`Session`].

use common::DateTime;
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret as _, SecretBox};
use tracerr::Traced;

use crate::{
    domain::admin::{self, session, Session},
    Service,
};

use super::Command;

/// [`Command`] for creating an administrator [`Session`] by
/// [`admin::Credentials`].
#[derive(Debug)]
pub struct CreateAdminSession {
    /// [`admin::Email`] to log in with.
    pub email: admin::Email,

    /// [`admin::Password`] to log in with.
    pub password: SecretBox<admin::Password>,
}

/// Output of [`CreateAdminSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`session::Token`] of the created [`Session`].
    pub token: session::Token,

    /// Created [`Session`].
    pub session: Session,
}

impl<Db, Geo> Command<CreateAdminSession> for Service<Db, Geo> {
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateAdminSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateAdminSession { email, password } = cmd;
        if !self.config().admin.matches(&email, password.expose_secret()) {
            return Err(tracerr::new!(E::WrongCredentials));
        }

        let session = Session {
            email: self.config().admin.email.clone(),
            expires_at: (DateTime::now() + self.config().session_ttl).coerce(),
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &session,
            &self.config().jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output { token, session })
    }
}

/// Error of [`CreateAdminSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`CreateAdminSession`] contains wrong credentials.
    #[display("Wrong administrator credentials")]
    WrongCredentials,
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{fixture, Command as _};

    use super::{CreateAdminSession, ExecutionError};

    #[tokio::test]
    async fn issues_expiring_session() {
        let svc = fixture::service(&[]);

        let out = svc
            .execute(CreateAdminSession {
                email: "ADMIN@example.com".parse().unwrap(),
                password: SecretBox::new(Box::new("hunter22".into())),
            })
            .await
            .unwrap();

        assert_eq!(out.session.email.as_ref(), "admin@example.com");
        assert!(!out.token.as_ref().is_empty());
    }

    #[tokio::test]
    async fn rejects_wrong_password() {
        let svc = fixture::service(&[]);

        let err = svc
            .execute(CreateAdminSession {
                email: "admin@example.com".parse().unwrap(),
                password: SecretBox::new(Box::new("hunter2".into())),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::WrongCredentials));
    }
}
