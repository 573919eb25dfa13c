//! Portfolio administrator definitions.
//!
//! There is a single administrator, whose [`Credentials`] are configured for
//! the whole service.

pub mod session;

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display, From};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret, ExposeSecret as _, SecretBox};
use serde::{Deserialize, Serialize};

pub use self::session::Session;

/// Credentials of the administrator.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// [`Email`] the administrator logs in with.
    pub email: Email,

    /// [`Password`] the administrator logs in with.
    pub password: SecretBox<Password>,
}

impl Credentials {
    /// Checks whether the provided `email` and `password` match these
    /// [`Credentials`].
    ///
    /// Emails are compared case-insensitively.
    #[must_use]
    pub fn matches(&self, email: &Email, password: &Password) -> bool {
        self.email.0.eq_ignore_ascii_case(&email.0)
            && self.password.expose_secret().0 == password.0
    }
}

/// Email address of the administrator.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format (RFC 5322 addr-spec
        /// without comments and folding whitespace).
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                "^([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                  |\\x5c[\\x00-\\x7f])*\\x22)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x22))*\\x40\
                  ([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d))*$",
            )
            .expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim()).ok_or("invalid `Email`")
    }
}

/// Password of the administrator.
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        !password.is_empty() && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use super::{Credentials, Email, Password};

    fn credentials() -> Credentials {
        Credentials {
            email: Email::new("admin@example.com").unwrap(),
            password: SecretBox::init_with(|| Password::from("hunter22")),
        }
    }

    #[test]
    fn validates_emails() {
        assert!(Email::new("admin@example.com").is_some());
        assert!("  admin@example.com ".parse::<Email>().is_ok());
        assert!(Email::new("admin").is_none());
        assert!(Email::new("admin@").is_none());
    }

    #[test]
    fn matches_credentials() {
        let creds = credentials();

        assert!(creds.matches(
            &Email::new("Admin@Example.com").unwrap(),
            &Password::from("hunter22"),
        ));
        assert!(!creds.matches(
            &Email::new("admin@example.com").unwrap(),
            &Password::from("hunter2"),
        ));
        assert!(!creds.matches(
            &Email::new("other@example.com").unwrap(),
            &Password::from("hunter22"),
        ));
    }
}
