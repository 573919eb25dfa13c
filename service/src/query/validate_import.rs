//! [`ValidateImport`] definition.

use std::collections::{HashMap, HashSet};

use common::operations::{By, Resolve, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        import::{self, Draft, Duplicate, Field, Issue, Outcome, Sheet},
        location::Place,
        project::{Coordinates, Year},
        Project,
    },
    infra::{database, geocoder, Database, Geocoder},
    read::project::Filter,
    Service,
};

use super::{Locate, Query};

/// [`Query`] validating an uploaded CSV [`Sheet`] against the stored
/// [`Project`]s, without storing anything.
///
/// Rows are located serially, in file order.
#[derive(Clone, Debug)]
pub struct ValidateImport {
    /// Raw uploaded CSV.
    pub csv: Vec<u8>,
}

impl<Db, Geo> Query<ValidateImport> for Service<Db, Geo>
where
    Db: Database<
        Select<By<Vec<Project>, Filter>>,
        Ok = Vec<Project>,
        Err = Traced<database::Error>,
    >,
    Geo: Geocoder<
        Resolve<String>,
        Ok = Option<Coordinates>,
        Err = Traced<geocoder::Error>,
    >,
{
    type Ok = Outcome;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ValidateImport { csv }: ValidateImport,
    ) -> Result<Self::Ok, Self::Err> {
        let sheet = match Sheet::parse(&csv) {
            Ok(sheet) => sheet,
            Err(issue) => {
                log::debug!("rejected unreadable import: {issue}");
                return Ok(Outcome {
                    errors: vec![issue],
                    ..Outcome::default()
                });
            }
        };

        let existing = self
            .database()
            .execute(Select(By::new(Filter::default())))
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|p| (p.details.title.normalized(), p.id))
            .collect::<HashMap<_, _>>();

        let import::Config { jitter, features } = self.config().import;
        let current_year = Year::current();
        let mut seen = HashSet::new();
        let mut outcome = Outcome::default();
        for row in sheet.rows() {
            let mut candidate = match row.interpret(current_year) {
                Ok(c) => c,
                Err(errors) => {
                    log::debug!(
                        "import row {} has {} error(s)",
                        row.number(),
                        errors.len(),
                    );
                    outcome.errors.extend(errors);
                    continue;
                }
            };
            let number = candidate.row;

            let title = candidate.title.normalized();
            let known = existing.get(&title).copied();
            if !seen.insert(title) || known.is_some() {
                outcome.duplicates.push(Duplicate {
                    row: number,
                    title: candidate.title.clone(),
                    existing: known,
                });
            }

            outcome.warnings.append(&mut candidate.warnings);

            let place = Place::new("", &candidate.city);
            let Some(coordinates) = self
                .execute(Locate(place))
                .await
                .unwrap_or_else(|e| match e {})
            else {
                log::debug!("import row {number} cannot be located");
                outcome.errors.push(Issue::at(
                    number,
                    Field::Location,
                    format!("Could not locate city \"{}\"", candidate.city),
                ));
                continue;
            };

            let details = candidate
                .into_details(coordinates.jittered(jitter), features.assign());
            outcome.drafts.push(Draft {
                row: number,
                details,
            });
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;

    use crate::{
        domain::{
            import::{Draft, Field},
            project::Status,
        },
        fixture,
        infra::Database as _,
        read::project::{
            fixture::{details, project},
            Export,
        },
        Query as _,
    };

    use super::ValidateImport;

    const PLACES: &[(&str, f64, f64)] =
        &[("Albany", 42.65, -73.75), ("Troy", 42.73, -73.69)];

    fn titles(drafts: &[Draft]) -> Vec<String> {
        drafts.iter().map(|d| d.details.title.to_string()).collect()
    }

    fn csv(text: &str) -> ValidateImport {
        ValidateImport {
            csv: text.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn prepares_valid_rows() {
        let svc = fixture::service(PLACES);

        let outcome = svc
            .execute(csv(
                "Long Name,City,Primary Client Name,Compensation,Year\n\
                 Main Hall,Albany,NYS OGS,\"$1,500\",2019\n\
                 River Walk,Troy,City of Troy,,2021\n",
            ))
            .await
            .unwrap();

        assert!(outcome.is_valid(), "{}", outcome.report());
        assert_eq!(titles(&outcome.drafts), ["Main Hall", "River Walk"]);
        assert!(outcome.duplicates.is_empty());

        let hall = &outcome.drafts[0].details;
        assert!((hall.coordinates.latitude() - 42.65).abs() <= 0.005 + 1e-9);
        assert!((hall.coordinates.longitude() + 73.75).abs() <= 0.005 + 1e-9);
        assert_eq!(hall.compensation.to_string(), "1500");
        assert!(!hall.featured && !hall.recent);
    }

    #[tokio::test]
    async fn reports_missing_required_fields_per_row() {
        let svc = fixture::service(PLACES);

        let outcome = svc
            .execute(csv(
                "Name,City,Client\n\
                 ,Albany,NYS OGS\n\
                 Main Hall,,\n\
                 River Walk,Troy,City of Troy\n",
            ))
            .await
            .unwrap();

        assert!(!outcome.is_valid());
        let errors = outcome
            .errors
            .iter()
            .map(|e| (e.row, e.field))
            .collect::<Vec<_>>();
        assert_eq!(
            errors,
            [
                (Some(2), Field::Title),
                (Some(3), Field::City),
                (Some(3), Field::Client),
            ],
        );
        assert_eq!(titles(&outcome.drafts), ["River Walk"]);
    }

    #[tokio::test]
    async fn reports_unlocatable_city() {
        let svc = fixture::service(PLACES);

        let outcome = svc
            .execute(csv("Title,City,Client\nMain Hall,Atlantis,Poseidon\n"))
            .await
            .unwrap();

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, Some(2));
        assert_eq!(outcome.errors[0].field, Field::Location);
        assert!(outcome.drafts.is_empty());
    }

    #[tokio::test]
    async fn keeps_warnings_of_unlocatable_rows() {
        let svc = fixture::service(PLACES);

        let outcome = svc
            .execute(csv(
                "Name,City,Client,Description,Market Sector\n\
                 Bridge,Atlantis,DOT,Arch bridge,Widgets\n",
            ))
            .await
            .unwrap();

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].field, Field::Location);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].row, Some(2));
        assert_eq!(outcome.warnings[0].field, Field::MarketSector);
        assert!(outcome.report().to_string().contains("Widgets"));
    }

    #[tokio::test]
    async fn skips_whitespace_only_rows() {
        let svc = fixture::service(PLACES);

        let outcome = svc
            .execute(csv("Name,City,Client\nBridge,Albany,DOT\n   \n"))
            .await
            .unwrap();

        assert!(outcome.is_valid(), "{}", outcome.report());
        assert_eq!(titles(&outcome.drafts), ["Bridge"]);
    }

    #[tokio::test]
    async fn rejects_unreadable_file() {
        let svc = fixture::service(PLACES);

        let outcome = svc
            .execute(ValidateImport {
                csv: vec![0xff, 0xfe, 0x00],
            })
            .await
            .unwrap();

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, None);
        assert_eq!(outcome.errors[0].field, Field::File);
    }

    #[tokio::test]
    async fn detects_duplicates() {
        let svc = fixture::service(PLACES);
        let stored = svc
            .database()
            .execute(Insert(details("Main Hall", 42.65, -73.75)))
            .await
            .unwrap();

        let outcome = svc
            .execute(csv(
                "Title,City,Client\n\
                 main hall ,Albany,NYS OGS\n\
                 River Walk,Troy,City of Troy\n\
                 RIVER WALK,Troy,City of Troy\n",
            ))
            .await
            .unwrap();

        assert!(outcome.is_valid());
        assert_eq!(outcome.drafts.len(), 3);
        let duplicates = outcome
            .duplicates
            .iter()
            .map(|d| (d.row, d.existing))
            .collect::<Vec<_>>();
        assert_eq!(duplicates, [(2, Some(stored.id)), (4, None)]);
    }

    #[tokio::test]
    async fn reimports_export() {
        let svc = fixture::service(PLACES);
        let mut original = project("Main Hall", 42.65, -73.75);
        original.details.status = Status::Dormant;

        let export = Export::render(&[original.clone()]).unwrap();
        let outcome = svc
            .execute(ValidateImport {
                csv: String::from(export).into_bytes(),
            })
            .await
            .unwrap();

        assert!(outcome.is_valid(), "{}", outcome.report());
        let imported = &outcome.drafts[0].details;
        assert_eq!(imported.title, original.details.title);
        assert_eq!(imported.city, original.details.city);
        assert_eq!(imported.client, original.details.client);
        assert_eq!(imported.status, original.details.status);
    }
}
