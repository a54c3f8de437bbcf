use crate::recipe::{CountryCode, Recipe};
use std::collections::HashMap;

/// Coarse effort rating from total minutes; 1 is quickest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MAX: u8 = 3;

    pub fn from_minutes(total: u32) -> Self {
        match total {
            0..=29 => Self(1),
            30..=59 => Self(2),
            _ => Self(3),
        }
    }

    pub fn tier(&self) -> u8 {
        self.0
    }

    pub fn stars(&self) -> String {
        let filled = usize::from(self.0);
        let empty = usize::from(Self::MAX - self.0);
        format!("{}{}", "⭐".repeat(filled), "☆".repeat(empty))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instructions {
    Provided(String),
    /// The caller shows its own localized placeholder.
    Missing,
}

/// Everything the result panel shows for a winning recipe. Optional fields
/// are `None` when the recipe has nothing worth displaying for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub recipe: Recipe,
    pub name: String,
    pub country: String,
    pub description: Option<String>,
    pub cooking_minutes: Option<u32>,
    pub prepare_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub instructions: Instructions,
    pub difficulty: Difficulty,
}

fn non_empty(text: &Option<String>) -> Option<String> {
    text.as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ResultCard {
    /// `None` when no recipe sits at `index`, as on a sparse wheel.
    pub fn resolve(
        index: usize,
        recipes: &[Recipe],
        countries: &dyn CountryNames,
    ) -> Option<Self> {
        recipes
            .get(index)
            .map(|recipe| Self::for_recipe(recipe, countries))
    }

    pub fn for_recipe(recipe: &Recipe, countries: &dyn CountryNames) -> Self {
        Self {
            name: recipe.name.clone(),
            country: countries.country_name(&recipe.country).to_string(),
            description: non_empty(&recipe.description),
            cooking_minutes: (recipe.cooking_time > 0).then_some(recipe.cooking_time),
            prepare_minutes: (recipe.prepare_time > 0).then_some(recipe.prepare_time),
            servings: recipe.serving_size.filter(|&n| n > 0),
            instructions: non_empty(&recipe.instructions)
                .map(Instructions::Provided)
                .unwrap_or(Instructions::Missing),
            difficulty: Difficulty::from_minutes(recipe.total_minutes()),
            recipe: recipe.clone(),
        }
    }
}

/// Country code to display name, falling back to the raw code.
pub trait CountryNames {
    fn country_name<'a>(&'a self, code: &'a CountryCode) -> &'a str;
}

impl CountryNames for HashMap<CountryCode, String> {
    fn country_name<'a>(&'a self, code: &'a CountryCode) -> &'a str {
        self.get(code).map(String::as_str).unwrap_or(code.as_str())
    }
}
