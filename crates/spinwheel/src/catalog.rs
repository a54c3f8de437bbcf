use crate::recipe::{Category, Country, CountryCode, Recipe};
use crate::result::CountryNames;
use serde_with::DeserializeFromStr;
use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Cuisine filter: either every cuisine or one country display name.
#[derive(Debug, Clone, PartialEq, Eq, Default, DeserializeFromStr)]
pub enum Cuisine {
    #[default]
    All,
    Named(String),
}

impl FromStr for Cuisine {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Named(s.to_string()))
        }
    }
}

impl std::fmt::Display for Cuisine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Total-time buckets over `cooking + prepare` minutes. The medium bucket is
/// closed on both ends.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum TimeBucket {
    #[default]
    All,
    Quick,
    Medium,
    Long,
}

impl TimeBucket {
    pub fn contains(&self, total_minutes: u32) -> bool {
        match self {
            Self::All => true,
            Self::Quick => total_minutes < 30,
            Self::Medium => (30..=60).contains(&total_minutes),
            Self::Long => total_minutes > 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeFilter {
    pub cuisine: Cuisine,
    pub time: TimeBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Matched(usize),
    /// Nothing matched; the active set fell back to every recipe.
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    all: Vec<Recipe>,
    active: Vec<Recipe>,
    countries: Vec<Country>,
    country_names: HashMap<CountryCode, String>,
    categories: Vec<Category>,
    filter: RecipeFilter,
}

impl RecipeCatalog {
    pub fn new(recipes: Vec<Recipe>, countries: Vec<Country>, categories: Vec<Category>) -> Self {
        let country_names = countries
            .iter()
            .map(|c| (c.code.clone(), c.name.clone()))
            .collect();

        Self {
            active: recipes.clone(),
            all: recipes,
            countries,
            country_names,
            categories,
            filter: RecipeFilter::default(),
        }
    }

    pub fn all(&self) -> &[Recipe] {
        &self.all
    }

    pub fn active(&self) -> &[Recipe] {
        &self.active
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn filter(&self) -> &RecipeFilter {
        &self.filter
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Unique cuisine names in directory order.
    pub fn cuisines(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for country in &self.countries {
            if !seen.contains(&country.name.as_str()) {
                seen.push(country.name.as_str());
            }
        }
        seen
    }

    pub fn apply_filter(&mut self, cuisine: Cuisine, time: TimeBucket) -> FilterOutcome {
        let active: Vec<Recipe> = self
            .all
            .iter()
            .filter(|recipe| self.matches_cuisine(recipe, &cuisine))
            .filter(|recipe| time.contains(recipe.total_minutes()))
            .cloned()
            .collect();

        self.filter = RecipeFilter { cuisine, time };

        if active.is_empty() {
            log::info!(
                "Filter {}/{} matched nothing, showing all {} recipes",
                self.filter.cuisine,
                self.filter.time,
                self.all.len()
            );
            self.active = self.all.clone();
            FilterOutcome::Reset
        } else {
            let matched = active.len();
            self.active = active;
            FilterOutcome::Matched(matched)
        }
    }

    fn matches_cuisine(&self, recipe: &Recipe, cuisine: &Cuisine) -> bool {
        match cuisine {
            Cuisine::All => true,
            Cuisine::Named(name) => self
                .country_names
                .get(&recipe.country)
                .is_some_and(|n| n == name),
        }
    }
}

impl CountryNames for RecipeCatalog {
    fn country_name<'a>(&'a self, code: &'a CountryCode) -> &'a str {
        self.country_names.country_name(code)
    }
}
