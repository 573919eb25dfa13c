//! [`Config`]-related definitions.

use std::{collections::HashMap, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::domain::{admin, import, location};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Geocoder configuration.
    pub geocoder: Geocoder,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("CONF")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [JWT] secret.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    #[default("secret".to_owned())]
    pub jwt_secret: String,

    /// Lifetime of an administrator session.
    #[default(time::Duration::from_secs(60 * 60 * 8))]
    #[serde(with = "humantime_serde")]
    pub session_ttl: time::Duration,

    /// Administrator credentials.
    pub admin: Admin,

    /// CSV import configuration.
    pub import: Import,

    /// Location lookup configuration.
    pub locating: Locating,
}

/// Error of converting a [`Service`] configuration.
#[derive(Clone, Copy, Debug, derive_more::Display, derive_more::Error)]
pub enum ServiceError {
    /// Configured administrator email is malformed.
    #[display("`service.admin.email` is not a valid email")]
    AdminEmail,

    /// Configured administrator password is empty or too long.
    #[display("`service.admin.password` is empty or too long")]
    AdminPassword,
}

impl TryFrom<Service> for service::Config {
    type Error = ServiceError;

    fn try_from(value: Service) -> Result<Self, Self::Error> {
        let Service {
            jwt_secret,
            session_ttl,
            admin: Admin { email, password },
            import,
            locating,
        } = value;

        let email = email.parse().map_err(|_| ServiceError::AdminEmail)?;
        let password = admin::Password::new(password)
            .ok_or(ServiceError::AdminPassword)?;

        Ok(Self {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                jwt_secret.as_bytes(),
            ),
            admin: admin::Credentials {
                email,
                password: secrecy::SecretBox::init_with(move || password),
            },
            session_ttl,
            import: import.into(),
            location: locating.into(),
        })
    }
}

/// Administrator credentials.
#[derive(Clone, Deserialize, SmartDefault, derive_more::Debug)]
#[serde(default)]
pub struct Admin {
    /// Email to log in with.
    #[default("admin@example.com".to_owned())]
    pub email: String,

    /// Password to log in with.
    #[debug(skip)]
    #[default("admin".to_owned())]
    pub password: String,
}

/// CSV import configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Import {
    /// Maximum offset in degrees applied to located coordinates.
    #[default(0.005)]
    pub jitter: f64,

    /// Policy of highlighting imported projects.
    pub features: Features,
}

impl From<Import> for import::Config {
    fn from(value: Import) -> Self {
        let Import { jitter, features } = value;
        Self {
            jitter,
            features: features.into(),
        }
    }
}

/// Policy of highlighting imported projects.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Features {
    /// Kind of the policy.
    pub policy: FeaturesPolicy,

    /// Probability of a project being featured, for the random policy.
    #[default(0.2)]
    pub featured: f64,

    /// Probability of a project being recent, for the random policy.
    #[default(0.3)]
    pub recent: f64,
}

/// Kind of the [`Features`] policy.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturesPolicy {
    /// Imported projects are never highlighted.
    #[default]
    None,

    /// Imported projects are highlighted at random.
    Random,
}

impl From<Features> for import::FeaturePolicy {
    fn from(value: Features) -> Self {
        let Features {
            policy,
            featured,
            recent,
        } = value;
        match policy {
            FeaturesPolicy::None => Self::None,
            FeaturesPolicy::Random => Self::Random { featured, recent },
        }
    }
}

/// Location lookup configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Locating {
    /// Replacements of ambiguous city names, keyed by a city name.
    pub aliases: HashMap<String, String>,

    /// Ordered state qualifiers to retry unknown cities with.
    #[default(location::Policy::default().states)]
    pub states: Vec<String>,

    /// Maximum offset in degrees applied to city-only results.
    #[default(0.005)]
    pub bare_city_jitter: f64,
}

impl From<Locating> for location::Policy {
    fn from(value: Locating) -> Self {
        let Locating {
            aliases,
            states,
            bare_city_jitter,
        } = value;
        Self {
            aliases: aliases
                .into_iter()
                .map(|(city, alias)| (city.trim().to_lowercase(), alias))
                .collect(),
            states,
            bare_city_jitter,
        }
    }
}

/// Geocoder configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Geocoder {
    /// Base URL of the Nominatim API.
    #[default(service::infra::nominatim::Config::default().base_url)]
    pub base_url: String,

    /// `User-Agent` to identify with.
    #[default(service::infra::nominatim::Config::default().user_agent)]
    pub user_agent: String,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,

    /// Minimal interval between two requests.
    #[default(time::Duration::from_secs(1))]
    #[serde(with = "humantime_serde")]
    pub min_interval: time::Duration,
}

impl From<Geocoder> for service::infra::nominatim::Config {
    fn from(value: Geocoder) -> Self {
        let Geocoder {
            base_url,
            user_agent,
            timeout,
            min_interval,
        } = value;
        Self {
            base_url,
            user_agent,
            timeout,
            min_interval,
        }
    }
}

/// Postgres configuration.
#[derive(Clone, Deserialize, SmartDefault, derive_more::Debug)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[debug(skip)]
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database name to connect to.
    #[default("portfolio".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use service::domain::import;

    use super::{Config, Features, FeaturesPolicy, Locating};

    #[test]
    fn converts_defaults_into_service_config() {
        let conf = service::Config::try_from(Config::default().service)
            .unwrap();

        assert_eq!(conf.admin.email.as_ref(), "admin@example.com");
        assert_eq!(conf.import.features, import::FeaturePolicy::None);
        assert_eq!(
            conf.location.states.first().map(String::as_str),
            Some("NY"),
        );
    }

    #[test]
    fn rejects_malformed_admin_email() {
        let mut conf = Config::default().service;
        conf.admin.email = "nobody".to_owned();

        assert!(service::Config::try_from(conf).is_err());
    }

    #[test]
    fn converts_random_features_policy() {
        let policy = import::FeaturePolicy::from(Features {
            policy: FeaturesPolicy::Random,
            featured: 0.5,
            recent: 0.25,
        });

        assert_eq!(
            policy,
            import::FeaturePolicy::Random {
                featured: 0.5,
                recent: 0.25,
            },
        );
    }

    #[test]
    fn lowercases_alias_keys() {
        let policy = service::domain::location::Policy::from(Locating {
            aliases: [(" Troy ".to_owned(), "Troy, NY".to_owned())]
                .into_iter()
                .collect(),
            ..Locating::default()
        });

        assert_eq!(
            policy.aliases.get("troy").map(String::as_str),
            Some("Troy, NY"),
        );
    }
}
