//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
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

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use std::time::Duration;

use derive_more::Debug;

use crate::domain::{admin, import, location};
#[cfg(doc)]
use crate::infra::{Database, Geocoder};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [`admin::Credentials`] of the only administrator.
    pub admin: admin::Credentials,

    /// Lifetime of an [`admin::Session`].
    pub session_ttl: Duration,

    /// [`import::Config`] of CSV imports.
    pub import: import::Config,

    /// [`location::Policy`] of looking up project locations.
    pub location: location::Policy,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Geo> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Geocoder`] of this [`Service`].
    geocoder: Geo,
}

impl<Db, Geo> Service<Db, Geo> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub const fn new(config: Config, database: Db, geocoder: Geo) -> Self {
        Self {
            config,
            database,
            geocoder,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub const fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Geocoder`] of this [`Service`].
    #[must_use]
    pub const fn geocoder(&self) -> &Geo {
        &self.geocoder
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! [`Service`] wired with in-memory collaborators.

    use std::time::Duration;

    use secrecy::SecretBox;

    use crate::{
        domain::{admin, import, location, project::Coordinates},
        infra::{Fixed, Memory},
        Config, Service,
    };

    /// JWT secret used in tests.
    const SECRET: &[u8] = b"test-secret";

    /// Builds a test [`Config`].
    pub(crate) fn config() -> Config {
        Config {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(SECRET),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(SECRET),
            admin: admin::Credentials {
                email: "admin@example.com".parse().unwrap(),
                password: SecretBox::new(Box::new("hunter22".into())),
            },
            session_ttl: Duration::from_secs(60),
            import: import::Config {
                jitter: 0.005,
                features: import::FeaturePolicy::None,
            },
            location: location::Policy::default(),
        }
    }

    /// Builds a [`Service`] over an empty [`Memory`] database and a [`Fixed`]
    /// geocoder knowing the provided places.
    pub(crate) fn service(
        places: &[(&str, f64, f64)],
    ) -> Service<Memory, Fixed> {
        let geocoder = Fixed::new(places.iter().map(|&(q, lat, lon)| {
            (q, Coordinates::new(lat, lon).unwrap())
        }));
        Service::new(config(), Memory::default(), geocoder)
    }
}
