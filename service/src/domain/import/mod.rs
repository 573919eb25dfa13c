//! CSV import definitions.
//!
//! An uploaded [`Sheet`] is interpreted row by row into [`Candidate`]s,
//! which become [`Draft`]s once located on the map. Everything found along
//! the way is collected into an [`Outcome`].

pub mod sheet;

use std::fmt;

use derive_more::Display;
use itertools::Itertools as _;
use rand::Rng as _;
use smart_default::SmartDefault;

use crate::domain::project;

pub use self::sheet::{Candidate, Sheet};

/// Import configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Maximum offset in degrees applied to located coordinates, so that
    /// projects of the same city don't overlap on the map.
    #[default(0.005)]
    pub jitter: f64,

    /// [`FeaturePolicy`] for the imported projects.
    pub features: FeaturePolicy,
}

/// Policy of assigning `featured`/`recent` flags to imported projects.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum FeaturePolicy {
    /// Imported projects are never highlighted.
    #[default]
    None,

    /// Imported projects are highlighted at random.
    Random {
        /// Probability of a project being featured, within `[0, 1]`.
        featured: f64,

        /// Probability of a project being recent, within `[0, 1]`.
        recent: f64,
    },
}

impl FeaturePolicy {
    /// Decides the `(featured, recent)` flags of a single project.
    #[must_use]
    pub fn assign(&self) -> (bool, bool) {
        match *self {
            Self::None => (false, false),
            Self::Random { featured, recent } => {
                let mut rng = rand::thread_rng();
                (
                    rng.gen_bool(featured.clamp(0.0, 1.0)),
                    rng.gen_bool(recent.clamp(0.0, 1.0)),
                )
            }
        }
    }
}

/// Field an [`Issue`] relates to.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Field {
    /// Whole file.
    #[display("File")]
    File,

    /// Project title.
    #[display("Title")]
    Title,

    /// Project city.
    #[display("City")]
    City,

    /// Project client.
    #[display("Client")]
    Client,

    /// Project location on the map.
    #[display("Location")]
    Location,

    /// Project address.
    #[display("Address")]
    Address,

    /// Project description.
    #[display("Description")]
    Description,

    /// Project market sector.
    #[display("Market Sector")]
    MarketSector,

    /// Project status.
    #[display("Status")]
    Status,

    /// Project compensation.
    #[display("Compensation")]
    Compensation,

    /// Project year.
    #[display("Year")]
    Year,

    /// Any other optional project field.
    #[display("Other")]
    Other,
}

/// Problem found during an import, either an error or a warning.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Issue {
    /// Spreadsheet row number the [`Issue`] was found at (the header being
    /// row 1), or [`None`] if it relates to the whole file.
    pub row: Option<usize>,

    /// [`Field`] the [`Issue`] relates to.
    pub field: Field,

    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// Creates a new [`Issue`] at the given `row`.
    #[must_use]
    pub fn at(row: usize, field: Field, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            field,
            message: message.into(),
        }
    }

    /// Creates a new [`Issue`] relating to the whole file.
    #[must_use]
    pub fn file(message: impl Into<String>) -> Self {
        Self {
            row: None,
            field: Field::File,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(row) = self.row {
            write!(f, "Row {row}: ")?;
        }
        write!(f, "{}", self.message)
    }
}

/// Imported row whose title repeats an already known one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Duplicate {
    /// Spreadsheet row number of the duplicate.
    pub row: usize,

    /// Repeated [`project::Title`] as written in the imported row.
    pub title: project::Title,

    /// ID of the stored project having the same title, or [`None`] if the
    /// title repeats an earlier row of the same file.
    pub existing: Option<project::Id>,
}

/// Row successfully turned into a project ready to be stored.
#[derive(Clone, Debug)]
pub struct Draft {
    /// Spreadsheet row number the [`Draft`] originates from.
    pub row: usize,

    /// [`project::Details`] to store.
    pub details: project::Details,
}

/// Result of validating an imported [`Sheet`].
#[derive(Clone, Debug, Default)]
pub struct Outcome {
    /// Successfully prepared [`Draft`]s, in file order.
    pub drafts: Vec<Draft>,

    /// Validation errors. Rows having any are not in the [`Outcome::drafts`].
    pub errors: Vec<Issue>,

    /// Warnings, about substituted defaults mostly.
    pub warnings: Vec<Issue>,

    /// Rows whose titles repeat known ones. They are still in the
    /// [`Outcome::drafts`].
    pub duplicates: Vec<Duplicate>,
}

impl Outcome {
    /// Indicates whether this [`Outcome`] has no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Formats the human-readable [`Report`] of this [`Outcome`].
    #[must_use]
    pub fn report(&self) -> Report {
        use fmt::Write as _;

        let mut out = String::new();
        if self.errors.is_empty() {
            _ = writeln!(
                out,
                "Validation passed: {} row(s) ready.",
                self.drafts.len(),
            );
        } else {
            _ = writeln!(
                out,
                "Validation failed with {} error(s):",
                self.errors.len(),
            );
            let grouped = self
                .errors
                .iter()
                .sorted_by_key(|e| e.field)
                .chunk_by(|e| e.field);
            for (field, issues) in &grouped {
                _ = writeln!(out, "\n{field}:");
                for issue in issues {
                    _ = writeln!(out, "  - {issue}");
                }
            }
        }

        if !self.warnings.is_empty() {
            _ = writeln!(out, "\nWarnings ({}):", self.warnings.len());
            for issue in &self.warnings {
                _ = writeln!(out, "  - {issue}");
            }
        }

        Report(out.trim_end().to_owned())
    }
}

/// Human-readable report of an import [`Outcome`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct Report(String);

impl AsRef<str> for Report {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod spec {
    use super::{FeaturePolicy, Field, Issue, Outcome};

    #[test]
    fn groups_errors_by_field_in_report() {
        let outcome = Outcome {
            errors: vec![
                Issue::at(2, Field::City, "City is required"),
                Issue::at(3, Field::Title, "Title is required"),
                Issue::at(4, Field::City, "City is required"),
            ],
            warnings: vec![Issue::at(5, Field::Status, "Unknown status")],
            ..Outcome::default()
        };

        assert_eq!(
            outcome.report().as_ref(),
            "Validation failed with 3 error(s):\n\
             \n\
             Title:\n  \
               - Row 3: Title is required\n\
             \n\
             City:\n  \
               - Row 2: City is required\n  \
               - Row 4: City is required\n\
             \n\
             Warnings (1):\n  \
               - Row 5: Unknown status",
        );
    }

    #[test]
    fn reports_file_level_errors_without_row() {
        let outcome = Outcome {
            errors: vec![Issue::file("Cannot parse CSV: bad")],
            ..Outcome::default()
        };

        assert!(outcome.report().as_ref().contains("File:\n  - Cannot parse"));
    }

    #[test]
    fn assigns_no_features_by_default() {
        for _ in 0..100 {
            assert_eq!(FeaturePolicy::default().assign(), (false, false));
        }
    }

    #[test]
    fn assigns_features_by_probability() {
        let always = FeaturePolicy::Random {
            featured: 1.0,
            recent: 0.0,
        };

        assert_eq!(always.assign(), (true, false));
    }
}
