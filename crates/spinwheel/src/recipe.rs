use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

/// Identifiers arrive as JSON strings from the snapshot and as integers from
/// the API; both collapse into the string newtypes below.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(from = "RawId", into = "String")]
pub struct RecipeId(String);

crate::impl_string_newtype!(RecipeId);

impl From<RawId> for RecipeId {
    fn from(raw: RawId) -> Self {
        Self(raw.into())
    }
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct CountryCode(String);

crate::impl_string_newtype!(CountryCode);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(from = "RawId", into = "String")]
pub struct CategoryId(String);

crate::impl_string_newtype!(CategoryId);

impl From<RawId> for CategoryId {
    fn from(raw: RawId) -> Self {
        Self(raw.into())
    }
}

/// A single dish. Missing or null times read as zero minutes.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, alias = "cooking_time")]
    pub cooking_time: u32,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, alias = "prepare_time")]
    pub prepare_time: u32,
    #[serde(default, alias = "serving_size")]
    pub serving_size: Option<u32>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(alias = "country_code")]
    pub country: CountryCode,
    #[serde(default, alias = "category_id")]
    pub category_id: Option<CategoryId>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, name: impl Into<String>, country: &str) -> Self {
        Self {
            id: RecipeId::new(id),
            name: name.into(),
            description: None,
            cooking_time: 0,
            prepare_time: 0,
            serving_size: None,
            instructions: None,
            country: CountryCode::new(country),
            category_id: None,
        }
    }

    pub fn with_times(mut self, cooking: u32, prepare: u32) -> Self {
        self.cooking_time = cooking;
        self.prepare_time = prepare;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_servings(mut self, servings: u32) -> Self {
        self.serving_size = Some(servings);
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn total_minutes(&self) -> u32 {
        self.cooking_time.saturating_add(self.prepare_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(alias = "country_code")]
    pub code: CountryCode,
    #[serde(alias = "country_name")]
    pub name: String,
}

impl Country {
    pub fn new(code: &str, name: impl Into<String>) -> Self {
        Self {
            code: CountryCode::new(code),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_recipe_deserialization() {
        let json = r#"{
            "id": "r1",
            "name": "Ghormeh Sabzi",
            "cookingTime": 120,
            "prepareTime": null,
            "servingSize": 4,
            "country": "IR"
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, RecipeId::new("r1"));
        assert_eq!(recipe.cooking_time, 120);
        assert_eq!(recipe.prepare_time, 0);
        assert_eq!(recipe.serving_size, Some(4));
        assert_eq!(recipe.country, CountryCode::new("IR"));
        assert_eq!(recipe.total_minutes(), 120);
    }

    #[test]
    fn test_api_recipe_deserialization() {
        let json = r#"{
            "id": 17,
            "name": "Pad Thai",
            "cooking_time": 15,
            "prepare_time": 20,
            "category_id": 3,
            "country": "TH",
            "countries": { "country_code": "TH", "country_name": "Thailand" }
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id.as_str(), "17");
        assert_eq!(recipe.category_id, Some(CategoryId::new("3")));
        assert_eq!(recipe.total_minutes(), 35);
        assert_eq!(recipe.description, None);
    }

    #[test]
    fn test_missing_times_default_to_zero() {
        let recipe: Recipe =
            serde_json::from_str(r#"{"id": "x", "name": "Toast", "country": "GB"}"#).unwrap();
        assert_eq!(recipe.total_minutes(), 0);
    }

    #[test]
    fn test_country_aliases() {
        let a: Country = serde_json::from_str(r#"{"code": "IT", "name": "Italy"}"#).unwrap();
        let b: Country =
            serde_json::from_str(r#"{"country_code": "IT", "country_name": "Italy"}"#).unwrap();
        assert_eq!(a, b);
    }
}
