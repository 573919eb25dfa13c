//! [`Project`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::{domain, read};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    Context, Error,
};

/// A project of the portfolio.
#[derive(Clone, Debug, From, Into)]
pub struct Project(domain::Project);

/// A project of the portfolio, shown as a marker on the map.
#[graphql_object(context = Context)]
impl Project {
    /// Unique identifier of this `Project`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Title of this `Project`.
    #[must_use]
    pub fn title(&self) -> Title {
        self.0.details.title.clone().into()
    }

    /// Street address of this `Project`, if known.
    #[must_use]
    pub fn address(&self) -> Option<Address> {
        self.0.details.address.clone().map(Into::into)
    }

    /// City this `Project` is located in.
    #[must_use]
    pub fn city(&self) -> City {
        self.0.details.city.clone().into()
    }

    /// Position of this `Project` on the map.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        self.0.details.coordinates.into()
    }

    /// Market sector of this `Project`.
    #[must_use]
    pub fn market_sector(&self) -> api::sector::MarketSector {
        self.0.details.market_sector.into()
    }

    /// Free-text building type of this `Project`, if any.
    #[must_use]
    pub fn building_type(&self) -> Option<BuildingType> {
        self.0.details.building_type.clone().map(Into::into)
    }

    /// Long description of this `Project`.
    #[must_use]
    pub fn description(&self) -> Description {
        self.0.details.description.clone().into()
    }

    /// Short description of this `Project`, if any.
    #[must_use]
    pub fn mini_description(&self) -> Option<MiniDescription> {
        self.0.details.mini_description.clone().map(Into::into)
    }

    /// Client this `Project` was done for.
    #[must_use]
    pub fn client(&self) -> Client {
        self.0.details.client.clone().into()
    }

    /// Manager of this `Project`, if any.
    #[must_use]
    pub fn project_manager(&self) -> Option<ProjectManager> {
        self.0.details.project_manager.clone().map(Into::into)
    }

    /// Lifecycle status of this `Project`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.details.status.into()
    }

    /// Compensation received for this `Project`.
    ///
    /// Visible to the administrator only, `null` otherwise.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.compensation",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn compensation(
        &self,
        ctx: &Context,
    ) -> Result<Option<Compensation>, Error> {
        Ok(ctx
            .is_admin()
            .await?
            .then_some(self.0.details.compensation.into()))
    }

    /// Year of this `Project`.
    #[must_use]
    pub fn year(&self) -> Year {
        self.0.details.year.into()
    }

    /// Indicator whether this `Project` is highlighted as featured.
    #[must_use]
    pub fn featured(&self) -> bool {
        self.0.details.featured
    }

    /// Indicator whether this `Project` is highlighted as recent.
    #[must_use]
    pub fn recent(&self) -> bool {
        self.0.details.recent
    }

    /// Ordered images of this `Project`, as URLs or data URIs.
    #[must_use]
    pub fn image_urls(&self) -> Vec<ImageUrl> {
        self.0
            .details
            .image_urls
            .iter()
            .cloned()
            .map(Into::into)
            .collect()
    }

    /// `DateTime` when this `Project` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Project` was modified last time.
    #[must_use]
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }
}

/// Unique identifier of a `Project`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::project::Id)]
#[into(domain::project::Id)]
#[graphql(name = "ProjectId", transparent)]
pub struct Id(Uuid);

/// Defines GraphQL scalars wrapping validated text of a [`Project`].
macro_rules! define_text_scalars {
    ($(
        #[doc = $doc:literal]
        $name:ident($gql:literal);
    )*) => {$(
        #[doc = $doc]
        #[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
        #[graphql(
            name = $gql,
            with = scalar::Via::<domain::project::$name>,
        )]
        pub struct $name(domain::project::$name);
    )*};
}

define_text_scalars! {
    #[doc = "Title of a `Project`."]
    Title("ProjectTitle");

    #[doc = "Street address of a `Project`."]
    Address("ProjectAddress");

    #[doc = "City a `Project` is located in."]
    City("ProjectCity");

    #[doc = "Free-text building type of a `Project`."]
    BuildingType("ProjectBuildingType");

    #[doc = "Long description of a `Project`."]
    Description("ProjectDescription");

    #[doc = "Short description of a `Project`."]
    MiniDescription("ProjectMiniDescription");

    #[doc = "Client of a `Project`."]
    Client("ProjectClient");

    #[doc = "Manager of a `Project`."]
    ProjectManager("ProjectManager");

    #[doc = "Image of a `Project`, as a URL or a data URI."]
    ImageUrl("ProjectImageUrl");
}

/// Non-negative compensation of a `Project`, as a decimal string.
///
/// Currency signs and thousand separators are ignored on input.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProjectCompensation",
    with = scalar::Via::<domain::project::Compensation>,
)]
pub struct Compensation(domain::project::Compensation);

/// Four-digit calendar year of a `Project`.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ProjectYear", with = scalar::Via::<domain::project::Year>)]
pub struct Year(domain::project::Year);

/// Lifecycle status of a `Project`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ProjectStatus")]
pub enum Status {
    /// Project is being worked on.
    Active,

    /// Project is finished or cancelled.
    Inactive,

    /// Project is paused.
    Dormant,
}

impl From<domain::project::Status> for Status {
    fn from(status: domain::project::Status) -> Self {
        use domain::project::Status as S;
        match status {
            S::Active => Self::Active,
            S::Inactive => Self::Inactive,
            S::Dormant => Self::Dormant,
        }
    }
}

impl From<Status> for domain::project::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Active => Self::Active,
            Status::Inactive => Self::Inactive,
            Status::Dormant => Self::Dormant,
        }
    }
}

/// Geographic position on the map.
#[derive(Clone, Copy, Debug, GraphQLObject, PartialEq)]
#[graphql(context = Context)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,
}

impl From<domain::project::Coordinates> for Coordinates {
    fn from(c: domain::project::Coordinates) -> Self {
        Self {
            latitude: c.latitude(),
            longitude: c.longitude(),
        }
    }
}

/// Geographic position on the map, as provided by a client.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
pub struct CoordinatesInput {
    /// Latitude in degrees, within `[-90, 90]`.
    pub latitude: f64,

    /// Longitude in degrees, within `[-180, 180]`.
    pub longitude: f64,
}

impl TryFrom<CoordinatesInput> for domain::project::Coordinates {
    type Error = Error;

    fn try_from(input: CoordinatesInput) -> Result<Self, Self::Error> {
        Self::new(input.latitude, input.longitude)
            .ok_or_else(|| CoordinatesError::OutOfBounds.into())
    }
}

crate::define_error! {
    enum CoordinatesError {
        #[code = "INVALID_COORDINATES"]
        #[status = BAD_REQUEST]
        #[message = "Coordinates are out of the Earth bounds"]
        OutOfBounds,
    }
}

/// Filter narrowing a list of `Project`s.
///
/// Omitted or empty criteria match every `Project`.
#[derive(Clone, Debug, Default, GraphQLInputObject)]
#[graphql(name = "ProjectFilter")]
pub struct Filter {
    /// `MarketSector`s to match any of.
    pub sectors: Option<Vec<api::sector::MarketSector>>,

    /// `ProjectStatus`es to match any of.
    pub statuses: Option<Vec<Status>>,

    /// Text to search for in the title, city, client, description and
    /// building type, ignoring case.
    pub search: Option<String>,
}

impl From<Filter> for read::project::Filter {
    fn from(filter: Filter) -> Self {
        let Filter {
            sectors,
            statuses,
            search,
        } = filter;
        Self {
            sectors: sectors
                .into_iter()
                .flatten()
                .map(Into::into)
                .collect(),
            statuses: statuses
                .into_iter()
                .flatten()
                .map(Into::into)
                .collect(),
            search: search.and_then(read::project::Search::new),
        }
    }
}

impl Filter {
    /// Converts the provided optional [`Filter`] into a
    /// [`read::project::Filter`], matching everything if [`None`].
    #[must_use]
    pub fn into_read(filter: Option<Self>) -> read::project::Filter {
        filter.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod spec {
    use service::{domain, read};

    use crate::api::sector::MarketSector;

    use super::{CoordinatesInput, Filter, Status};

    #[test]
    fn converts_filter() {
        let filter = Filter::into_read(Some(Filter {
            sectors: Some(vec![MarketSector::Education]),
            statuses: None,
            search: Some("  ".to_owned()),
        }));

        assert_eq!(
            filter,
            read::project::Filter {
                sectors: vec![domain::project::MarketSector::Education],
                ..read::project::Filter::default()
            },
        );
        assert_eq!(Filter::into_read(None), read::project::Filter::default());
    }

    #[test]
    fn round_trips_statuses() {
        for status in domain::project::Status::ALL {
            let api = Status::from(*status);

            assert_eq!(domain::project::Status::from(api), *status);
        }
    }

    #[test]
    fn validates_coordinates() {
        let ok = domain::project::Coordinates::try_from(CoordinatesInput {
            latitude: 42.65,
            longitude: -73.75,
        });
        let err = domain::project::Coordinates::try_from(CoordinatesInput {
            latitude: 91.0,
            longitude: 0.0,
        });

        assert!(ok.is_ok());
        assert_eq!(err.unwrap_err().code, "INVALID_COORDINATES");
    }
}
