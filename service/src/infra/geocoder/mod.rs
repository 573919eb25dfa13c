//! [`Geocoder`]-related implementations.

#[cfg(any(test, feature = "memory"))]
pub mod fixed;
#[cfg(feature = "nominatim")]
pub mod nominatim;

use derive_more::{Display, Error as StdError, From};

#[cfg(any(test, feature = "memory"))]
pub use self::fixed::Fixed;
#[cfg(feature = "nominatim")]
pub use self::nominatim::Nominatim;

/// Geocoder resolving free-text locations into coordinates.
///
/// Implementations handle `Resolve<String>` returning
/// `Option<Coordinates>`, where [`None`] means nothing was found.
pub use common::Handler as Geocoder;

/// [`Geocoder`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(any(test, feature = "memory"))]
    /// [`Fixed`] error.
    Fixed(fixed::Error),

    #[cfg(feature = "nominatim")]
    /// [`Nominatim`] error.
    Nominatim(nominatim::Error),
}
