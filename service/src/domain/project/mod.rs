//! [`Project`] definitions.

pub mod coordinates;
pub mod sector;

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::{coordinates::Coordinates, sector::MarketSector};

/// Stored portfolio project.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    /// ID of this [`Project`], assigned by the storage on creation.
    pub id: Id,

    /// [`Details`] of this [`Project`].
    pub details: Details,

    /// [`DateTime`] when this [`Project`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Project`] was modified last time.
    pub updated_at: ModificationDateTime,
}

/// Everything describing a [`Project`] except its identity and timestamps.
///
/// This is what gets written on creation and fully overwritten on update.
#[derive(Clone, Debug, PartialEq)]
pub struct Details {
    /// [`Title`] of the [`Project`].
    pub title: Title,

    /// Street [`Address`] of the [`Project`], if known.
    pub address: Option<Address>,

    /// [`City`] the [`Project`] is located in.
    pub city: City,

    /// [`Coordinates`] of the [`Project`] on the map.
    pub coordinates: Coordinates,

    /// [`MarketSector`] of the [`Project`].
    pub market_sector: MarketSector,

    /// [`BuildingType`] of the [`Project`], if any.
    pub building_type: Option<BuildingType>,

    /// Long [`Description`] of the [`Project`].
    pub description: Description,

    /// Short [`MiniDescription`] of the [`Project`], if any.
    pub mini_description: Option<MiniDescription>,

    /// [`Client`] the [`Project`] was done for.
    pub client: Client,

    /// [`ProjectManager`] of the [`Project`], if any.
    pub project_manager: Option<ProjectManager>,

    /// [`Status`] of the [`Project`].
    pub status: Status,

    /// [`Compensation`] received for the [`Project`].
    pub compensation: Compensation,

    /// [`Year`] of the [`Project`].
    pub year: Year,

    /// Indicator whether the [`Project`] is highlighted as featured.
    pub featured: bool,

    /// Indicator whether the [`Project`] is highlighted as recent.
    pub recent: bool,

    /// Ordered [`ImageUrl`]s of the [`Project`].
    pub image_urls: Vec<ImageUrl>,
}

/// ID of a [`Project`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    derive_more::FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Defines trimmed non-empty text newtypes of a bounded length.
macro_rules! define_text {
    ($(
        #[doc = $doc:literal]
        $name:ident(max = $max:literal);
    )*) => {$(
        #[doc = $doc]
        #[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
        #[as_ref(str)]
        #[cfg_attr(
            feature = "postgres",
            derive(FromSql, ToSql),
            postgres(transparent),
        )]
        pub struct $name(String);

        impl $name {
            #[doc = ::core::concat!(
                "Creates a new [`", ::core::stringify!($name), "`] without ",
                "checking it.",
            )]
            ///
            /// # Safety
            ///
            /// The caller must ensure that the given `text` is trimmed,
            /// non-empty and fits the length limit.
            #[expect(unsafe_code, reason = "bypass")]
            #[must_use]
            pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
                Self(text.into())
            }

            #[doc = ::core::concat!(
                "Creates a new [`", ::core::stringify!($name), "`] out of ",
                "the given `text` with surrounding whitespace trimmed.",
            )]
            ///
            /// [`None`] is returned if nothing is left after trimming or the
            /// text is too long.
            #[must_use]
            pub fn new(text: impl AsRef<str>) -> Option<Self> {
                let text = text.as_ref().trim();
                Self::check(text).then(|| Self(text.to_owned()))
            }

            /// Checks whether the given `text` satisfies the invariants.
            fn check(text: &str) -> bool {
                text.trim() == text
                    && !text.is_empty()
                    && text.chars().count() <= $max
            }
        }

        impl FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(::core::concat!(
                    "invalid `", ::core::stringify!($name), "`",
                ))
            }
        }
    )*};
}

define_text! {
    #[doc = "Title of a [`Project`]."]
    Title(max = 512);

    #[doc = "Street address of a [`Project`]."]
    Address(max = 512);

    #[doc = "City a [`Project`] is located in."]
    City(max = 256);

    #[doc = "Free-text building type of a [`Project`]."]
    BuildingType(max = 256);

    #[doc = "Long description of a [`Project`]."]
    Description(max = 16384);

    #[doc = "Short description of a [`Project`]."]
    MiniDescription(max = 1024);

    #[doc = "Client of a [`Project`]."]
    Client(max = 512);

    #[doc = "Manager of a [`Project`]."]
    ProjectManager(max = 256);

    #[doc = "Reference to an image of a [`Project`] (URL or data URI)."]
    ImageUrl(max = 4_194_304);
}

impl Title {
    /// Returns the form of this [`Title`] used for duplicate detection.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

define_kind! {
    #[doc = "Lifecycle status of a [`Project`]."]
    enum Status {
        #[doc = "Project is being worked on."]
        Active = 1,

        #[doc = "Project is finished or cancelled."]
        Inactive = 2,

        #[doc = "Project is paused."]
        Dormant = 3,
    }
}

impl Status {
    /// Returns the human-readable label of this [`Status`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Dormant => "Dormant",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Active
    }
}

/// Non-negative compensation received for a [`Project`].
#[derive(
    AsRef, Clone, Copy, Debug, Default, Display, Eq, Into, Ord, PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Compensation(Decimal);

impl Compensation {
    /// Zero [`Compensation`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Compensation`] if the given `amount` is non-negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative() || amount.is_zero())
            .then(|| Self(amount.normalize()))
    }

    /// Parses a [`Compensation`] out of human-written money text, ignoring
    /// currency signs, thousand separators and surrounding whitespace.
    ///
    /// [`None`] is returned if the text is not a non-negative number.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Option<Self> {
        let cleaned = text
            .trim()
            .chars()
            .filter(|c| !matches!(c, '$' | ',' | ' '))
            .collect::<String>();
        Self::new(cleaned.parse().ok()?)
    }
}

impl FromStr for Compensation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or("invalid `Compensation`")
    }
}

/// Calendar year of a [`Project`].
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Year(i32);

impl Year {
    /// Creates a new [`Year`] if the given `year` has four digits.
    #[must_use]
    pub fn new(year: i32) -> Option<Self> {
        (1000..=9999).contains(&year).then_some(Self(year))
    }

    /// Returns the current [`Year`].
    #[must_use]
    pub fn current() -> Self {
        Self(common::DateTime::now().year())
    }
}

impl FromStr for Year {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Year`")
    }
}

/// [`DateTime`] when a [`Project`] was created.
pub type CreationDateTime = DateTimeOf<(Project, unit::Creation)>;

/// [`DateTime`] when a [`Project`] was modified.
pub type ModificationDateTime = DateTimeOf<(Project, unit::Modification)>;
