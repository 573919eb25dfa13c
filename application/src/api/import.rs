//! CSV import related definitions.

use juniper::GraphQLObject;
use service::domain::import;

use crate::{api, Context};

/// Result of validating a CSV file without importing it.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "ProjectsImportPreview", context = Context)]
pub struct Preview {
    /// Indicator whether the file has no errors and so can be imported.
    pub valid: bool,

    /// Number of rows ready to be imported.
    pub ready: i32,

    /// Human-readable report, with errors grouped by field.
    pub report: String,

    /// Errors preventing the import.
    pub errors: Vec<Issue>,

    /// Warnings, about substituted defaults mostly.
    pub warnings: Vec<Issue>,

    /// Rows whose titles repeat known ones. Importing them requires a
    /// confirmation.
    pub duplicates: Vec<Duplicate>,
}

impl From<import::Outcome> for Preview {
    fn from(outcome: import::Outcome) -> Self {
        let report = outcome.report().to_string();
        let import::Outcome {
            drafts,
            errors,
            warnings,
            duplicates,
        } = outcome;
        Self {
            valid: errors.is_empty(),
            ready: saturating_i32(drafts.len()),
            report,
            errors: errors.into_iter().map(Into::into).collect(),
            warnings: warnings.into_iter().map(Into::into).collect(),
            duplicates: duplicates.into_iter().map(Into::into).collect(),
        }
    }
}

/// Problem found in an imported CSV file.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "ProjectsImportIssue", context = Context)]
pub struct Issue {
    /// Spreadsheet row number, the header being row 1. `null` when the
    /// problem relates to the whole file.
    pub row: Option<i32>,

    /// Name of the field the problem relates to.
    pub field: String,

    /// Human-readable description.
    pub message: String,
}

impl From<import::Issue> for Issue {
    fn from(issue: import::Issue) -> Self {
        let import::Issue {
            row,
            field,
            message,
        } = issue;
        Self {
            row: row.map(saturating_i32),
            field: field.to_string(),
            message,
        }
    }
}

/// Imported row whose title repeats a known one.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "ProjectsImportDuplicate", context = Context)]
pub struct Duplicate {
    /// Spreadsheet row number.
    pub row: i32,

    /// Repeated title, as written in the file.
    pub title: api::project::Title,

    /// ID of the stored `Project` having the same title. `null` when the
    /// title repeats an earlier row of the same file.
    pub existing: Option<api::project::Id>,
}

impl From<import::Duplicate> for Duplicate {
    fn from(dup: import::Duplicate) -> Self {
        Self {
            row: saturating_i32(dup.row),
            title: dup.title.into(),
            existing: dup.existing.map(Into::into),
        }
    }
}

/// Converts a row number or a count into an [`i32`], saturating on overflow.
fn saturating_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod spec {
    use service::domain::import::{self, Field};

    use super::Preview;

    #[test]
    fn previews_rejected_files() {
        let preview = Preview::from(import::Outcome {
            errors: vec![import::Issue::at(
                3,
                Field::Title,
                "Title is required",
            )],
            ..import::Outcome::default()
        });

        assert!(!preview.valid);
        assert_eq!(preview.ready, 0);
        assert_eq!(preview.errors[0].row, Some(3));
        assert_eq!(preview.errors[0].field, "Title");
        assert!(preview.report.contains("Row 3: Title is required"));
    }

    #[test]
    fn previews_file_level_issues_without_row() {
        let preview = Preview::from(import::Outcome {
            errors: vec![import::Issue::file("Cannot parse CSV")],
            ..import::Outcome::default()
        });

        assert_eq!(preview.errors[0].row, None);
        assert_eq!(preview.errors[0].field, "File");
    }
}
