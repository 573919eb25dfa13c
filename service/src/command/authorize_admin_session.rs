//! [`Command`] for authorizing an administrator [`Session`].

use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::admin::{self, session, Session},
    Service,
};

use super::Command;

/// [`Command`] for authorizing an administrator [`Session`] by its
/// [`session::Token`].
#[derive(Clone, Debug, From)]
pub struct AuthorizeAdminSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db, Geo> Command<AuthorizeAdminSession> for Service<Db, Geo> {
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeAdminSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeAdminSession { token } = cmd;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        // Tokens issued for a previously configured administrator are void.
        if session.email != self.config().admin.email {
            return Err(tracerr::new!(E::UnknownAdmin(session.email)));
        }

        Ok(session)
    }
}

/// Error of [`AuthorizeAdminSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`Session`] belongs to someone else than the configured administrator.
    #[display("`{_0}` is not the administrator")]
    #[from(ignore)]
    UnknownAdmin(#[error(not(source))] admin::Email),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        command::CreateAdminSession, domain::admin::session, fixture,
        Command as _,
    };

    use super::{AuthorizeAdminSession, ExecutionError};

    #[tokio::test]
    async fn authorizes_issued_token() {
        let svc = fixture::service(&[]);
        let issued = svc
            .execute(CreateAdminSession {
                email: "admin@example.com".parse().unwrap(),
                password: SecretBox::new(Box::new("hunter22".into())),
            })
            .await
            .unwrap();

        let session = svc
            .execute(AuthorizeAdminSession {
                token: issued.token,
            })
            .await
            .unwrap();

        assert_eq!(session.email, issued.session.email);
        assert_eq!(
            session.expires_at.unix_timestamp(),
            issued.session.expires_at.unix_timestamp(),
        );
    }

    #[tokio::test]
    async fn rejects_forged_token() {
        let svc = fixture::service(&[]);

        let err = svc
            .execute(AuthorizeAdminSession {
                token: "not.a.token".parse::<session::Token>().unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }
}
