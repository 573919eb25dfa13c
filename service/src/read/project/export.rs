//! [`Export`] definitions.

use derive_more::{Display, Error as StdError, From};

use crate::domain::Project;

/// Header of an [`Export`]ed CSV.
pub const HEADER: [&str; 14] = [
    "Project Title",
    "Address",
    "City",
    "Building Type",
    "Market Sector",
    "Description",
    "Mini Description",
    "Primary Client Name",
    "Project Manager Name",
    "Status Description",
    "Compensation",
    "Year",
    "Latitude",
    "Longitude",
];

/// CSV export of [`Project`]s, importable back.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct Export(String);

impl Export {
    /// Renders the provided [`Project`]s as CSV, one row per [`Project`] in
    /// the given order.
    ///
    /// # Errors
    ///
    /// If the CSV writer fails.
    pub fn render(projects: &[Project]) -> Result<Self, Error> {
        let mut w = csv::Writer::from_writer(vec![]);
        w.write_record(HEADER)?;
        for p in projects {
            let d = &p.details;
            w.write_record([
                d.title.to_string(),
                d.address
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                d.city.to_string(),
                d.building_type
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                d.market_sector.id().to_owned(),
                d.description.to_string(),
                d.mini_description
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                d.client.to_string(),
                d.project_manager
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                d.status.label().to_owned(),
                d.compensation.to_string(),
                d.year.to_string(),
                d.coordinates.latitude().to_string(),
                d.coordinates.longitude().to_string(),
            ])?;
        }
        let bytes =
            w.into_inner().map_err(|e| Error::Flush(e.into_error()))?;
        Ok(Self(String::from_utf8(bytes)?))
    }
}

impl AsRef<str> for Export {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Export> for String {
    fn from(export: Export) -> Self {
        export.0
    }
}

/// Error of rendering an [`Export`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to write a CSV record.
    #[display("Failed to write CSV record: {_0}")]
    Csv(csv::Error),

    /// Failed to flush the CSV writer.
    #[display("Failed to flush CSV writer: {_0}")]
    #[from(ignore)]
    Flush(std::io::Error),

    /// Rendered CSV is not valid UTF-8.
    #[display("Rendered CSV is not UTF-8: {_0}")]
    Encoding(std::string::FromUtf8Error),
}

#[cfg(test)]
mod spec {
    use crate::domain::project::{Address, Status};

    use super::{super::fixture::project, Export};

    #[test]
    fn renders_header_and_rows() {
        let mut p = project("Main Hall", 42.5, -73.75);
        p.details.address = Some(Address::new("1 Main St, Suite 2").unwrap());
        p.details.status = Status::Dormant;

        let csv = Export::render(&[p]).unwrap();
        let mut lines = csv.as_ref().lines();

        assert_eq!(
            lines.next(),
            Some(
                "Project Title,Address,City,Building Type,Market Sector,\
                 Description,Mini Description,Primary Client Name,\
                 Project Manager Name,Status Description,Compensation,Year,\
                 Latitude,Longitude",
            ),
        );
        assert_eq!(
            lines.next(),
            Some(
                "Main Hall,\"1 Main St, Suite 2\",Albany,,commercial,\
                 Main Hall,,State of New York,,Dormant,0,2020,42.5,-73.75",
            ),
        );
        assert_eq!(lines.next(), None);
    }
}
