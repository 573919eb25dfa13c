//! Location lookup policy.
//!
//! A geocoder is queried with free text. Ambiguous or unknown inputs are
//! retried in progressively looser forms, see [`Stage`].

use std::collections::HashMap;

use smart_default::SmartDefault;

/// Free-text location to look up.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Place {
    /// Street address, possibly empty.
    pub address: String,

    /// City, possibly empty.
    pub city: String,
}

impl Place {
    /// Creates a new [`Place`] out of the provided parts, trimming them.
    #[must_use]
    pub fn new(address: impl AsRef<str>, city: impl AsRef<str>) -> Self {
        Self {
            address: address.as_ref().trim().to_owned(),
            city: city.as_ref().trim().to_owned(),
        }
    }

    /// Returns the literal query text of this [`Place`], or [`None`] if it
    /// is completely blank.
    #[must_use]
    pub fn query(&self) -> Option<String> {
        match (self.address.is_empty(), self.city.is_empty()) {
            (true, true) => None,
            (false, false) => Some(format!("{}, {}", self.address, self.city)),
            (false, true) => Some(self.address.clone()),
            (true, false) => Some(self.city.clone()),
        }
    }
}

/// Stage of the lookup retry chain.
///
/// Stages are attempted strictly in declaration order, stopping at the first
/// one yielding coordinates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Literal input as given.
    Exact,

    /// Known-exception form of the city (e.g. a city name that is ambiguous
    /// across states).
    Disambiguated,

    /// City qualified with the N-th configured neighboring state.
    StateSweep(usize),

    /// City alone, without the address. Its result is jittered, since it
    /// only approximates the real position.
    BareCity,
}

/// Location lookup policy.
#[derive(Clone, Debug, SmartDefault)]
pub struct Policy {
    /// Known-exception forms of cities, keyed by a lowercased city name.
    pub aliases: HashMap<String, String>,

    /// Ordered neighboring state qualifiers to sweep through.
    #[default(vec![
        "NY".to_owned(),
        "VT".to_owned(),
        "MA".to_owned(),
        "CT".to_owned(),
        "NJ".to_owned(),
        "PA".to_owned(),
    ])]
    pub states: Vec<String>,

    /// Maximum offset in degrees applied to [`Stage::BareCity`] results.
    #[default(0.005)]
    pub bare_city_jitter: f64,
}

impl Policy {
    /// Plans the queries to attempt for the given [`Place`], in order.
    ///
    /// An empty plan means the [`Place`] cannot be looked up at all.
    #[must_use]
    pub fn plan(&self, place: &Place) -> Vec<(Stage, String)> {
        let Some(exact) = place.query() else {
            return vec![];
        };
        let mut plan = vec![(Stage::Exact, exact)];

        let city = place.city.as_str();
        if city.is_empty() {
            return plan;
        }

        if let Some(alias) = self.aliases.get(&city.to_lowercase()) {
            plan.push((Stage::Disambiguated, alias.clone()));
        }

        plan.extend(
            self.states
                .iter()
                .map(|state| format!("{city}, {state}"))
                .enumerate()
                .map(|(i, q)| (Stage::StateSweep(i), q)),
        );

        if !place.address.is_empty() {
            plan.push((Stage::BareCity, city.to_owned()));
        }

        // Drop repeated queries, as their outcome is already known.
        let mut seen = Vec::<String>::with_capacity(plan.len());
        plan.retain(|(_, q)| {
            let key = q.to_lowercase();
            if seen.contains(&key) {
                false
            } else {
                seen.push(key);
                true
            }
        });

        plan
    }
}

#[cfg(test)]
mod spec {
    use std::collections::HashMap;

    use super::{Place, Policy, Stage};

    fn policy() -> Policy {
        Policy {
            aliases: HashMap::from([(
                "jamestown".to_owned(),
                "Jamestown, Chautauqua County, NY".to_owned(),
            )]),
            states: vec!["NY".to_owned(), "VT".to_owned()],
            bare_city_jitter: 0.005,
        }
    }

    #[test]
    fn builds_literal_queries() {
        assert_eq!(
            Place::new("1 Main St", "Albany").query().as_deref(),
            Some("1 Main St, Albany"),
        );
        assert_eq!(
            Place::new("", " Albany ").query().as_deref(),
            Some("Albany"),
        );
        assert_eq!(Place::new(" ", "").query(), None);
    }

    #[test]
    fn plans_stages_in_order() {
        let plan = policy().plan(&Place::new("1 Main St", "Jamestown"));

        assert_eq!(
            plan,
            [
                (Stage::Exact, "1 Main St, Jamestown".to_owned()),
                (
                    Stage::Disambiguated,
                    "Jamestown, Chautauqua County, NY".to_owned(),
                ),
                (Stage::StateSweep(0), "Jamestown, NY".to_owned()),
                (Stage::StateSweep(1), "Jamestown, VT".to_owned()),
                (Stage::BareCity, "Jamestown".to_owned()),
            ],
        );
    }

    #[test]
    fn skips_disambiguation_and_bare_city_when_not_applicable() {
        let plan = policy().plan(&Place::new("", "Albany"));

        assert_eq!(
            plan,
            [
                (Stage::Exact, "Albany".to_owned()),
                (Stage::StateSweep(0), "Albany, NY".to_owned()),
                (Stage::StateSweep(1), "Albany, VT".to_owned()),
            ],
        );
    }

    #[test]
    fn plans_nothing_for_blank_place() {
        assert!(policy().plan(&Place::default()).is_empty());
    }

    #[test]
    fn drops_repeated_queries() {
        let mut policy = policy();
        drop(policy.aliases.insert("albany".to_owned(), "ALBANY".to_owned()));

        let plan = policy.plan(&Place::new("", "Albany"));

        assert_eq!(plan[0], (Stage::Exact, "Albany".to_owned()));
        assert!(plan.iter().all(|(s, _)| *s != Stage::Disambiguated));
        assert_eq!(plan.len(), 3);
    }
}
