//! [`MarketSector`] definitions.

use common::define_kind;

#[cfg(doc)]
use crate::domain::Project;

define_kind! {
    #[doc = "Market sector a [`Project`] belongs to."]
    enum MarketSector {
        #[doc = "Commercial buildings."]
        Commercial = 1,

        #[doc = "Schools, colleges and universities."]
        Education = 2,

        #[doc = "Government facilities."]
        Government = 3,

        #[doc = "Manufacturing and distribution facilities."]
        Manufacturing = 4,

        #[doc = "Mixed use developments."]
        MixedUse = 5,

        #[doc = "Parks and recreation."]
        Parks = 6,

        #[doc = "Housing."]
        Housing = 7,

        #[doc = "Professional offices."]
        Professional = 8,

        #[doc = "Industrial and manufacturing facilities."]
        Industrial = 9,

        #[doc = "Research and development facilities."]
        Research = 10,
    }
}

impl Default for MarketSector {
    fn default() -> Self {
        Self::Commercial
    }
}

/// Additional spellings recognized as [`MarketSector`]s, in a normalized
/// (lowercase alphanumeric) form.
const SYNONYMS: &[(&str, MarketSector)] = &[
    ("retail", MarketSector::Commercial),
    ("hospitality", MarketSector::Commercial),
    ("school", MarketSector::Education),
    ("k12", MarketSector::Education),
    ("highereducation", MarketSector::Education),
    ("academic", MarketSector::Education),
    ("municipal", MarketSector::Government),
    ("civic", MarketSector::Government),
    ("public", MarketSector::Government),
    ("warehouse", MarketSector::Manufacturing),
    ("distribution", MarketSector::Manufacturing),
    ("mixed", MarketSector::MixedUse),
    ("park", MarketSector::Parks),
    ("recreation", MarketSector::Parks),
    ("residential", MarketSector::Housing),
    ("multifamily", MarketSector::Housing),
    ("office", MarketSector::Professional),
    ("offices", MarketSector::Professional),
    ("rd", MarketSector::Research),
    ("laboratory", MarketSector::Research),
];

/// Keyword heuristics inferring a [`MarketSector`] from a free-text project
/// type description. Checked in order, first hit wins.
const KEYWORDS: &[(&[&str], MarketSector)] = &[
    (&["housing", "residential"], MarketSector::Housing),
    (&["parks", "recreation"], MarketSector::Parks),
    (&["industrial", "manufacturing"], MarketSector::Industrial),
    (&["academic", "education"], MarketSector::Education),
    (&["office", "administrative"], MarketSector::Professional),
    (&["research", "development"], MarketSector::Research),
    (&["mixed"], MarketSector::MixedUse),
    (&["commercial"], MarketSector::Commercial),
    (&["government"], MarketSector::Government),
];

impl MarketSector {
    /// Returns the stable textual ID of this [`MarketSector`].
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::Education => "education",
            Self::Government => "government",
            Self::Manufacturing => "manufacturing",
            Self::MixedUse => "mixed-use",
            Self::Parks => "parks",
            Self::Housing => "housing",
            Self::Professional => "professional",
            Self::Industrial => "industrial",
            Self::Research => "research",
        }
    }

    /// Returns the display name of this [`MarketSector`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Commercial => "Commercial",
            Self::Education => "Education",
            Self::Government => "Government",
            Self::Manufacturing => "Manufacturing & Distribution",
            Self::MixedUse => "Mixed Use",
            Self::Parks => "Parks & Recreation",
            Self::Housing => "Housing",
            Self::Professional => "Professional Offices",
            Self::Industrial => "Industrial/Manufacturing",
            Self::Research => "Research and Development",
        }
    }

    /// Returns the map color of this [`MarketSector`] as a `#rrggbb` hex.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Commercial => "#6d0020",
            Self::Education => "#f7941d",
            Self::Government => "#91982c",
            Self::Manufacturing => "#dc2626",
            Self::MixedUse => "#7c3aed",
            Self::Parks => "#059669",
            Self::Housing => "#0891b2",
            Self::Professional => "#64748b",
            Self::Industrial => "#ea580c",
            Self::Research => "#8b5cf6",
        }
    }

    /// Looks up the [`MarketSector`] with the given textual [ID].
    ///
    /// [ID]: MarketSector::id
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.id() == id)
    }

    /// Resolves the given free text into a [`MarketSector`].
    ///
    /// The text is matched case- and punctuation-insensitively against IDs,
    /// names and known synonyms first, and then falls back to the
    /// [keyword inference](MarketSector::infer).
    #[must_use]
    pub fn resolve(text: &str) -> Option<Self> {
        let key = normalize(text);
        if key.is_empty() {
            return None;
        }

        Self::ALL
            .iter()
            .copied()
            .find(|s| normalize(s.id()) == key || normalize(s.name()) == key)
            .or_else(|| {
                SYNONYMS.iter().find(|(k, _)| *k == key).map(|(_, s)| *s)
            })
            .or_else(|| Self::infer(text))
    }

    /// Infers a [`MarketSector`] from a free-text project type description.
    #[must_use]
    pub fn infer(description: &str) -> Option<Self> {
        let description = description.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(words, _)| words.iter().any(|w| description.contains(w)))
            .map(|(_, sector)| *sector)
    }
}

/// Leaves only lowercased alphanumeric characters of the given `text`.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod spec {
    use super::MarketSector;

    #[test]
    fn resolves_ids_and_names() {
        for sector in MarketSector::ALL {
            assert_eq!(MarketSector::resolve(sector.id()), Some(*sector));
            assert_eq!(MarketSector::resolve(sector.name()), Some(*sector));
            assert_eq!(MarketSector::from_id(sector.id()), Some(*sector));
        }
    }

    #[test]
    fn resolves_fuzzily() {
        assert_eq!(
            MarketSector::resolve("MIXED USE"),
            Some(MarketSector::MixedUse),
        );
        assert_eq!(
            MarketSector::resolve(" parks and recreation "),
            Some(MarketSector::Parks),
        );
        assert_eq!(
            MarketSector::resolve("Residential"),
            Some(MarketSector::Housing),
        );
        assert_eq!(MarketSector::resolve("R&D"), Some(MarketSector::Research));
    }

    #[test]
    fn leaves_unknown_unresolved() {
        assert_eq!(MarketSector::resolve("Widgets"), None);
        assert_eq!(MarketSector::resolve("  "), None);
    }

    #[test]
    fn infers_by_keywords_in_order() {
        assert_eq!(
            MarketSector::infer("Residential Development"),
            Some(MarketSector::Housing),
        );
        assert_eq!(
            MarketSector::infer("Light Manufacturing Plant"),
            Some(MarketSector::Industrial),
        );
        assert_eq!(
            MarketSector::infer("Administrative Building"),
            Some(MarketSector::Professional),
        );
        assert_eq!(
            MarketSector::infer("Mixed retail/housing"),
            Some(MarketSector::Housing),
        );
        assert_eq!(MarketSector::infer("Bridge"), None);
    }
}
