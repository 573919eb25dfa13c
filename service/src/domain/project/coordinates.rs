//! [`Coordinates`] definitions.

use rand::Rng as _;

#[cfg(doc)]
use crate::domain::Project;

/// Mean radius of the Earth in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic position of a [`Project`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    /// Latitude in degrees, within `[-90, 90]`.
    latitude: f64,

    /// Longitude in degrees, within `[-180, 180]`.
    longitude: f64,
}

impl Coordinates {
    /// Creates new [`Coordinates`] if both values are within the Earth
    /// bounds.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        ((-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude))
        .then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the latitude of these [`Coordinates`] in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude of these [`Coordinates`] in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Calculates the great-circle distance (haversine formula) between
    /// these and the `other` [`Coordinates`], in kilometers.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Shifts these [`Coordinates`] randomly by at most `offset` degrees
    /// along each axis, so that projects in the same city don't overlap on
    /// the map.
    ///
    /// The result is clamped to the Earth bounds.
    #[must_use]
    pub fn jittered(self, offset: f64) -> Self {
        let offset = offset.abs();
        if offset == 0.0 || !offset.is_finite() {
            return self;
        }

        let mut rng = rand::thread_rng();
        Self {
            latitude: (self.latitude + rng.gen_range(-offset..=offset))
                .clamp(-90.0, 90.0),
            longitude: (self.longitude + rng.gen_range(-offset..=offset))
                .clamp(-180.0, 180.0),
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Coordinates;

    #[test]
    fn validates_bounds() {
        assert!(Coordinates::new(90.0, 180.0).is_some());
        assert!(Coordinates::new(-90.0, -180.0).is_some());
        assert!(Coordinates::new(90.1, 0.0).is_none());
        assert!(Coordinates::new(0.0, -180.5).is_none());
        assert!(Coordinates::new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn measures_haversine_distance() {
        let albany = Coordinates::new(42.6526, -73.7562).unwrap();
        let nyc = Coordinates::new(40.7128, -74.0060).unwrap();

        let d = albany.distance_km(&nyc);
        assert!((d - 216.6).abs() < 2.0, "distance was {d}");
        assert!(albany.distance_km(&albany).abs() < f64::EPSILON);
    }

    #[test]
    fn jitters_within_offset() {
        let origin = Coordinates::new(43.0, -75.0).unwrap();

        for _ in 0..1000 {
            let moved = origin.jittered(0.005);
            assert!((moved.latitude() - 43.0).abs() <= 0.005 + 1e-9);
            assert!((moved.longitude() + 75.0).abs() <= 0.005 + 1e-9);
        }
    }

    #[test]
    fn clamps_jitter_to_bounds() {
        let pole = Coordinates::new(90.0, 180.0).unwrap();

        for _ in 0..100 {
            let moved = pole.jittered(0.5);
            assert!(moved.latitude() <= 90.0);
            assert!(moved.longitude() <= 180.0);
        }
    }

    #[test]
    fn skips_zero_jitter() {
        let origin = Coordinates::new(1.0, 2.0).unwrap();

        assert_eq!(origin.jittered(0.0), origin);
    }
}
