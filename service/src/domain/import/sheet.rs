//! [`Sheet`] definitions.

use std::str::FromStr;

use csv::StringRecord;

use crate::domain::project::{
    self, Address, BuildingType, City, Client, Compensation, Coordinates,
    Description, MarketSector, MiniDescription, ProjectManager, Status, Title,
    Year,
};

use super::{Field, Issue};

/// Recognized column of a [`Sheet`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Column {
    Title,
    City,
    Client,
    Address,
    Compensation,
    Year,
    ProjectManager,
    Description,
    MiniDescription,
    Status,
    MarketSector,
    ProjectType,
    BuildingType,
}

impl Column {
    /// All the [`Column`]s, indexed by their discriminants.
    const ALL: [Self; 13] = [
        Self::Title,
        Self::City,
        Self::Client,
        Self::Address,
        Self::Compensation,
        Self::Year,
        Self::ProjectManager,
        Self::Description,
        Self::MiniDescription,
        Self::Status,
        Self::MarketSector,
        Self::ProjectType,
        Self::BuildingType,
    ];

    /// Header names of this [`Column`], in priority order.
    const fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Title => &["Long Name", "Name", "Title", "Project Title"],
            Self::City => &["City"],
            Self::Client => &["Primary Client Name", "Client"],
            Self::Address => &["Address", "Address Description"],
            Self::Compensation => &["Compensation", "Project Value"],
            Self::Year => &["Year"],
            Self::ProjectManager => {
                &["Project Manager Name", "Project Manager"]
            }
            Self::Description => &["Description"],
            Self::MiniDescription => &["Mini Description", "Short Description"],
            Self::Status => &["Status Description", "Status"],
            Self::MarketSector => &["Market Sector", "Sector"],
            Self::ProjectType => {
                &["Project Type Description", "Project Type"]
            }
            Self::BuildingType => &["Building Type"],
        }
    }
}

/// Parsed CSV spreadsheet of projects.
#[derive(Clone, Debug)]
pub struct Sheet {
    /// Record indices of every [`Column`] present, in header priority order.
    layout: Vec<Vec<usize>>,

    /// Data records, in file order.
    records: Vec<StringRecord>,
}

impl Sheet {
    /// Parses the provided CSV `data`, whose first line is a header.
    ///
    /// Headers are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// With a file-level [`Issue`] if the `data` is not a well-formed UTF-8
    /// CSV or has no header.
    pub fn parse(data: &[u8]) -> Result<Self, Issue> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers = reader
            .headers()
            .map_err(|e| Issue::file(format!("Cannot parse CSV file: {e}")))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect::<Vec<_>>();
        if headers.iter().all(String::is_empty) {
            return Err(Issue::file("CSV file has no header row"));
        }

        let layout = Column::ALL
            .iter()
            .map(|col| {
                col.headers()
                    .iter()
                    .filter_map(|name| {
                        headers.iter().position(|h| *h == name.to_lowercase())
                    })
                    .collect()
            })
            .collect();

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Issue::file(format!("Cannot parse CSV file: {e}")))?;

        Ok(Self { layout, records })
    }

    /// Returns the non-blank [`Row`]s of this [`Sheet`], in file order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.iter().any(|v| !v.is_empty()))
            .map(|(i, record)| Row {
                // Header occupies the first spreadsheet row.
                number: i + 2,
                record,
                layout: &self.layout,
            })
    }
}

/// Single data row of a [`Sheet`].
#[derive(Clone, Copy, Debug)]
pub struct Row<'s> {
    /// Spreadsheet row number.
    number: usize,

    /// Underlying CSV record.
    record: &'s StringRecord,

    /// Column layout of the [`Sheet`].
    layout: &'s [Vec<usize>],
}

impl Row<'_> {
    /// Returns the spreadsheet number of this [`Row`].
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Returns the first non-blank value of the given [`Column`].
    fn get(&self, col: Column) -> Option<&str> {
        self.layout[col as usize]
            .iter()
            .filter_map(|&i| self.record.get(i))
            .find(|v| !v.is_empty())
    }

    /// Interprets this [`Row`] as a [`Candidate`] project.
    ///
    /// Missing optional values fall back to defaults, recording warnings.
    /// The `current_year` is the default [`Year`].
    ///
    /// # Errors
    ///
    /// With one [`Issue`] per missing or invalid required field.
    pub fn interpret(
        &self,
        current_year: Year,
    ) -> Result<Candidate, Vec<Issue>> {
        let row = self.number;
        let mut errors = vec![];

        let title = self.required::<Title>(Column::Title, Field::Title, &mut errors);
        let city = self.required::<City>(Column::City, Field::City, &mut errors);
        let client =
            self.required::<Client>(Column::Client, Field::Client, &mut errors);
        let (Some(title), Some(city), Some(client)) = (title, city, client)
        else {
            return Err(errors);
        };

        let mut warnings = vec![];

        let mini_description = self.optional::<MiniDescription>(
            Column::MiniDescription,
            &mut warnings,
        );
        let description = self
            .optional::<Description>(Column::Description, &mut warnings)
            .or_else(|| {
                mini_description
                    .as_ref()
                    .and_then(|m| Description::new(m))
            })
            .unwrap_or_else(|| {
                warnings.push(Issue::at(
                    row,
                    Field::Description,
                    "Description is missing, using the title instead",
                ));
                // SAFETY: `Title` is trimmed, non-empty, and always shorter
                //         than the `Description` limit.
                #[expect(unsafe_code, reason = "invariants are preserved")]
                unsafe {
                    Description::new_unchecked(title.to_string())
                }
            });

        let status = match self.get(Column::Status) {
            None => Status::default(),
            Some(s) => s.parse().unwrap_or_else(|_| {
                warnings.push(Issue::at(
                    row,
                    Field::Status,
                    format!("Unknown status \"{s}\", using \"Active\""),
                ));
                Status::default()
            }),
        };

        let market_sector = match self
            .get(Column::MarketSector)
            .or_else(|| self.get(Column::ProjectType))
        {
            None => MarketSector::default(),
            Some(s) => MarketSector::resolve(s).unwrap_or_else(|| {
                warnings.push(Issue::at(
                    row,
                    Field::MarketSector,
                    format!(
                        "Unknown market sector \"{s}\", using \"{}\"",
                        MarketSector::default().name(),
                    ),
                ));
                MarketSector::default()
            }),
        };

        let compensation = match self.get(Column::Compensation) {
            None => Compensation::ZERO,
            Some(s) => Compensation::parse_lenient(s).unwrap_or_else(|| {
                warnings.push(Issue::at(
                    row,
                    Field::Compensation,
                    format!("Invalid compensation \"{s}\", using 0"),
                ));
                Compensation::ZERO
            }),
        };

        let year = match self.get(Column::Year) {
            None => current_year,
            Some(s) => s.parse().unwrap_or_else(|_| {
                warnings.push(Issue::at(
                    row,
                    Field::Year,
                    format!("Invalid year \"{s}\", using {current_year}"),
                ));
                current_year
            }),
        };

        Ok(Candidate {
            row,
            address: self.optional(Column::Address, &mut warnings),
            building_type: self.optional(Column::BuildingType, &mut warnings),
            project_manager: self
                .optional(Column::ProjectManager, &mut warnings),
            title,
            city,
            client,
            description,
            mini_description,
            status,
            market_sector,
            compensation,
            year,
            warnings,
        })
    }

    /// Parses a required value of the given [`Column`], recording an error
    /// if it's missing or invalid.
    fn required<T: FromStr>(
        &self,
        col: Column,
        field: Field,
        errors: &mut Vec<Issue>,
    ) -> Option<T> {
        let Some(value) = self.get(col) else {
            errors.push(Issue::at(
                self.number,
                field,
                format!("{field} is required"),
            ));
            return None;
        };
        let parsed = value.parse().ok();
        if parsed.is_none() {
            errors.push(Issue::at(
                self.number,
                field,
                format!("{field} is invalid"),
            ));
        }
        parsed
    }

    /// Parses an optional value of the given [`Column`], recording a warning
    /// if it's present, but invalid.
    fn optional<T: FromStr>(
        &self,
        col: Column,
        warnings: &mut Vec<Issue>,
    ) -> Option<T> {
        let value = self.get(col)?;
        let parsed = value.parse().ok();
        if parsed.is_none() {
            warnings.push(Issue::at(
                self.number,
                Field::Other,
                format!("Ignoring invalid \"{}\" value", col.headers()[0]),
            ));
        }
        parsed
    }
}

/// Project interpreted from a [`Row`], but not located on the map yet.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Spreadsheet row number this [`Candidate`] comes from.
    pub row: usize,

    /// [`Title`] of the project.
    pub title: Title,

    /// [`City`] of the project.
    pub city: City,

    /// [`Client`] of the project.
    pub client: Client,

    /// [`Address`] of the project, if any.
    pub address: Option<Address>,

    /// [`BuildingType`] of the project, if any.
    pub building_type: Option<BuildingType>,

    /// [`Description`] of the project.
    pub description: Description,

    /// [`MiniDescription`] of the project, if any.
    pub mini_description: Option<MiniDescription>,

    /// [`ProjectManager`] of the project, if any.
    pub project_manager: Option<ProjectManager>,

    /// [`Status`] of the project.
    pub status: Status,

    /// [`MarketSector`] of the project.
    pub market_sector: MarketSector,

    /// [`Compensation`] of the project.
    pub compensation: Compensation,

    /// [`Year`] of the project.
    pub year: Year,

    /// Warnings raised while interpreting the [`Row`].
    pub warnings: Vec<Issue>,
}

impl Candidate {
    /// Completes this [`Candidate`] into [`project::Details`] with the
    /// provided [`Coordinates`] and `(featured, recent)` flags.
    #[must_use]
    pub fn into_details(
        self,
        coordinates: Coordinates,
        (featured, recent): (bool, bool),
    ) -> project::Details {
        let Self {
            row: _,
            title,
            city,
            client,
            address,
            building_type,
            description,
            mini_description,
            project_manager,
            status,
            market_sector,
            compensation,
            year,
            warnings: _,
        } = self;

        project::Details {
            title,
            address,
            city,
            coordinates,
            market_sector,
            building_type,
            description,
            mini_description,
            client,
            project_manager,
            status,
            compensation,
            year,
            featured,
            recent,
            image_urls: vec![],
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::{
        import::{Field, Issue},
        project::{Compensation, MarketSector, Status, Year},
    };

    use super::Sheet;

    fn year() -> Year {
        Year::new(2024).unwrap()
    }

    #[test]
    fn matches_headers_case_insensitively() {
        let sheet = Sheet::parse(
            b"LONG NAME ,city,primary client name\n\
              Bridge,Albany,DOT\n",
        )
        .unwrap();

        let rows = sheet.rows().collect::<Vec<_>>();
        assert_eq!(rows.len(), 1);
        let c = rows[0].interpret(year()).unwrap();
        assert_eq!(c.title.as_ref(), "Bridge");
        assert_eq!(c.city.as_ref(), "Albany");
        assert_eq!(c.client.as_ref(), "DOT");
        assert_eq!(c.row, 2);
    }

    #[test]
    fn prefers_first_non_blank_synonym() {
        let sheet = Sheet::parse(
            b"Long Name,Name,City,Client\n\
              ,Short Title,Albany,DOT\n\
              Long Title,Short Title,Albany,DOT\n",
        )
        .unwrap();

        let titles = sheet
            .rows()
            .map(|r| r.interpret(year()).unwrap().title.to_string())
            .collect::<Vec<_>>();
        assert_eq!(titles, ["Short Title", "Long Title"]);
    }

    #[test]
    fn reports_each_missing_required_field() {
        let sheet = Sheet::parse(
            b"Name,City,Client\n\
              ,,\n\
              Bridge,,\n\
              ,Albany,DOT\n",
        )
        .unwrap();

        let errors = sheet
            .rows()
            .map(|r| r.interpret(year()).unwrap_err())
            .collect::<Vec<_>>();

        // Completely blank row 2 is skipped.
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            [
                Issue::at(3, Field::City, "City is required"),
                Issue::at(3, Field::Client, "Client is required"),
            ],
        );
        assert_eq!(errors[1], [Issue::at(4, Field::Title, "Title is required")]);
    }

    #[test]
    fn applies_defaults_silently() {
        let sheet = Sheet::parse(b"Name,City,Client\nBridge,Albany,DOT\n")
            .unwrap();

        let c = sheet.rows().next().unwrap().interpret(year()).unwrap();
        assert_eq!(c.status, Status::Active);
        assert_eq!(c.market_sector, MarketSector::Commercial);
        assert_eq!(c.compensation, Compensation::ZERO);
        assert_eq!(c.year, year());
        assert_eq!(c.description.as_ref(), "Bridge");
        assert!(c.address.is_none());
        // Only the description fallback is worth a warning.
        assert_eq!(c.warnings.len(), 1);
        assert_eq!(c.warnings[0].field, Field::Description);
    }

    #[test]
    fn falls_back_to_mini_description() {
        let sheet = Sheet::parse(
            b"Name,City,Client,Short Description\n\
              Bridge,Albany,DOT,Steel arch\n",
        )
        .unwrap();

        let c = sheet.rows().next().unwrap().interpret(year()).unwrap();
        assert_eq!(c.description.as_ref(), "Steel arch");
        assert_eq!(c.mini_description.unwrap().as_ref(), "Steel arch");
        assert!(c.warnings.is_empty());
    }

    #[test]
    fn warns_once_about_unknown_sector() {
        let sheet = Sheet::parse(
            b"Name,City,Client,Description,Market Sector\n\
              Bridge,Albany,DOT,Arch,Widgets\n",
        )
        .unwrap();

        let c = sheet.rows().next().unwrap().interpret(year()).unwrap();
        assert_eq!(c.market_sector, MarketSector::Commercial);
        assert_eq!(c.warnings.len(), 1);
        assert_eq!(c.warnings[0].field, Field::MarketSector);
        assert_eq!(c.warnings[0].row, Some(2));
        assert!(c.warnings[0].message.contains("Widgets"));
    }

    #[test]
    fn infers_sector_from_project_type() {
        let sheet = Sheet::parse(
            b"Name,City,Client,Description,Project Type Description\n\
              School,Albany,District,New wing,Higher Education Facility\n",
        )
        .unwrap();

        let c = sheet.rows().next().unwrap().interpret(year()).unwrap();
        assert_eq!(c.market_sector, MarketSector::Education);
        assert!(c.warnings.is_empty());
    }

    #[test]
    fn warns_about_unknown_status() {
        let sheet = Sheet::parse(
            b"Name,City,Client,Description,Status\n\
              Bridge,Albany,DOT,Arch,Pending\n\
              Tunnel,Albany,DOT,Bore,dormant\n",
        )
        .unwrap();

        let cs = sheet
            .rows()
            .map(|r| r.interpret(year()).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(cs[0].status, Status::Active);
        assert_eq!(cs[0].warnings.len(), 1);
        assert_eq!(cs[0].warnings[0].field, Field::Status);
        assert_eq!(cs[1].status, Status::Dormant);
        assert!(cs[1].warnings.is_empty());
    }

    #[test]
    fn parses_typed_optionals() {
        let sheet = Sheet::parse(
            b"Name,City,Client,Description,Compensation,Year\n\
              Bridge,Albany,DOT,Arch,\"$1,500\",2019\n\
              Tunnel,Albany,DOT,Bore,a lot,soon\n",
        )
        .unwrap();

        let cs = sheet
            .rows()
            .map(|r| r.interpret(year()).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(cs[0].compensation, Compensation::parse_lenient("1500").unwrap());
        assert_eq!(cs[0].year, Year::new(2019).unwrap());
        assert!(cs[0].warnings.is_empty());

        assert_eq!(cs[1].compensation, Compensation::ZERO);
        assert_eq!(cs[1].year, year());
        let fields = cs[1].warnings.iter().map(|w| w.field).collect::<Vec<_>>();
        assert_eq!(fields, [Field::Compensation, Field::Year]);
    }

    #[test]
    fn rejects_malformed_files() {
        let err = Sheet::parse(b"Name,City\n\xff\xfe,Albany\n").unwrap_err();
        assert_eq!(err.row, None);
        assert_eq!(err.field, Field::File);

        let err = Sheet::parse(b"").unwrap_err();
        assert_eq!(err.field, Field::File);
    }

    #[test]
    fn strips_byte_order_mark() {
        let sheet = Sheet::parse(
            "\u{feff}Name,City,Client\nBridge,Albany,DOT\n".as_bytes(),
        )
        .unwrap();

        assert!(sheet.rows().next().unwrap().interpret(year()).is_ok());
    }

    #[test]
    fn tolerates_ragged_and_whitespace_only_rows() {
        let sheet = Sheet::parse(
            b"Name,City,Client,Year\n\
              Bridge,Albany,DOT\n\
              \x20\x20\x20\n\
              Tower,Troy,City,2020,extra\n",
        )
        .unwrap();

        let rows = sheet.rows().collect::<Vec<_>>();
        assert_eq!(rows.len(), 2);

        let short = rows[0].interpret(year()).unwrap();
        assert_eq!(short.city.to_string(), "Albany");
        assert_eq!(short.year, year());

        let long = rows[1].interpret(year()).unwrap();
        assert_eq!(long.title.to_string(), "Tower");
        assert_eq!(long.year, Year::new(2020).unwrap());
    }
}
