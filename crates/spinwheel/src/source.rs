use crate::catalog::RecipeCatalog;
use crate::config::DataSettings;
use crate::recipe::{Category, Country, CountryCode, Recipe, RecipeId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No {0} configured")]
    NotConfigured(&'static str),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("API response carried no data")]
    MissingData,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Catalog has no recipes")]
    Empty,
}

/// `{success, count?, data?, error?}` wrapper every API route answers with.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub count: Option<usize>,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, SourceError> {
        if !self.success {
            return Err(SourceError::Api(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        self.data.ok_or(SourceError::MissingData)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    pub country: Option<CountryCode>,
    pub max_time: Option<u32>,
}

impl RecipeQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(country) = &self.country {
            pairs.push(("country", country.to_string()));
        }
        if let Some(max_time) = self.max_time {
            pairs.push(("maxTime", max_time.to_string()));
        }
        pairs
    }
}

/// Read-only client for the recipe REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, SourceError> {
        let url = format!("{}/{}", self.base_url, path);
        log::debug!("GET {}", url);
        // error statuses still carry an envelope, so the body decides
        let envelope: Envelope<T> = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .json()
            .await?;
        envelope.into_result()
    }

    pub async fn recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, SourceError> {
        self.get("recipes", &query.pairs()).await
    }

    pub async fn recipe(&self, id: &RecipeId) -> Result<Recipe, SourceError> {
        self.get(&format!("recipes/{}", id), &[]).await
    }

    pub async fn countries(&self) -> Result<Vec<Country>, SourceError> {
        self.get("countries", &[]).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, SourceError> {
        self.get("categories", &[]).await
    }

    pub async fn catalog(&self) -> Result<RecipeCatalog, SourceError> {
        let query = RecipeQuery::default();
        let (recipes, countries, categories) =
            tokio::try_join!(self.recipes(&query), self.countries(), self.categories())?;
        non_empty(RecipeCatalog::new(recipes, countries, categories))
    }
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    recipes: Vec<Recipe>,
    #[serde(default)]
    countries: Vec<Country>,
    #[serde(default)]
    categories: Vec<Category>,
}

fn non_empty(catalog: RecipeCatalog) -> Result<RecipeCatalog, SourceError> {
    if catalog.is_empty() {
        Err(SourceError::Empty)
    } else {
        Ok(catalog)
    }
}

pub fn parse_snapshot(json: &str) -> Result<RecipeCatalog, SourceError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    non_empty(RecipeCatalog::new(
        snapshot.recipes,
        snapshot.countries,
        snapshot.categories,
    ))
}

pub fn read_snapshot(path: &Path) -> Result<RecipeCatalog, SourceError> {
    parse_snapshot(&fs_err::read_to_string(path)?)
}

/// Small built-in set so there is always something to spin.
pub fn demo_catalog() -> RecipeCatalog {
    RecipeCatalog::new(
        vec![
            Recipe::new("demo-1", "Margherita Pizza", "IT")
                .with_times(15, 20)
                .with_servings(2)
                .with_description("Tomato, mozzarella and basil on a thin crust."),
            Recipe::new("demo-2", "Ghormeh Sabzi", "IR")
                .with_times(150, 30)
                .with_servings(4)
                .with_description("Slow-cooked herb stew with kidney beans and dried lime."),
            Recipe::new("demo-3", "Pad Thai", "TH")
                .with_times(15, 15)
                .with_servings(2),
            Recipe::new("demo-4", "Tacos al Pastor", "MX")
                .with_times(20, 40)
                .with_servings(4),
            Recipe::new("demo-5", "Miso Soup", "JP")
                .with_times(10, 5)
                .with_servings(2)
                .with_instructions("Simmer dashi, add tofu and wakame, stir in miso off the heat."),
            Recipe::new("demo-6", "Kuku Sabzi", "IR")
                .with_times(30, 15)
                .with_servings(4),
            Recipe::new("demo-7", "Spaghetti Carbonara", "IT")
                .with_times(15, 10)
                .with_servings(2),
            Recipe::new("demo-8", "Chicken Biryani", "IN")
                .with_times(60, 30)
                .with_servings(6),
        ],
        vec![
            Country::new("IT", "Italy"),
            Country::new("IR", "Iran"),
            Country::new("TH", "Thailand"),
            Country::new("MX", "Mexico"),
            Country::new("JP", "Japan"),
            Country::new("IN", "India"),
        ],
        Vec::new(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    Api(String),
    Snapshot(PathBuf),
    Demo,
}

impl std::fmt::Display for CatalogOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Api(url) => write!(f, "API at {}", url),
            Self::Snapshot(path) => write!(f, "snapshot {}", path.display()),
            Self::Demo => f.write_str("built-in demo set"),
        }
    }
}

async fn from_api(data: &DataSettings) -> Result<(RecipeCatalog, String), SourceError> {
    let url = data.api_url.as_ref().ok_or(SourceError::NotConfigured("API URL"))?;
    let client = ApiClient::new(url.as_str(), Duration::from_secs(data.timeout_secs))?;
    Ok((client.catalog().await?, url.clone()))
}

fn from_snapshot(data: &DataSettings) -> Result<(RecipeCatalog, PathBuf), SourceError> {
    let path = data
        .static_snapshot_path()
        .ok_or(SourceError::NotConfigured("static snapshot"))?;
    Ok((read_snapshot(&path)?, path))
}

/// Loads recipes from the API, then the static snapshot, then the built-in
/// demo set. Each failed tier is logged and skipped; the last cannot fail.
pub async fn load_catalog(data: &DataSettings) -> (RecipeCatalog, CatalogOrigin) {
    match from_api(data).await {
        Ok((catalog, url)) => return (catalog, CatalogOrigin::Api(url)),
        Err(e) => log::warn!("Recipe API unavailable: {}", e),
    }

    match from_snapshot(data) {
        Ok((catalog, path)) => return (catalog, CatalogOrigin::Snapshot(path)),
        Err(e) => log::warn!("Recipe snapshot unavailable: {}", e),
    }

    (demo_catalog(), CatalogOrigin::Demo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    const RECIPES: &str = r#"{
        "success": true,
        "count": 2,
        "data": [
            {"id": 7, "name": "Fesenjan", "cooking_time": 90, "prepare_time": 20,
             "serving_size": 4, "country_code": "IR", "category_id": 1},
            {"id": 8, "name": "Risotto", "cooking_time": 30, "prepare_time": null,
             "country_code": "IT"}
        ]
    }"#;
    const COUNTRIES: &str = r#"{
        "success": true,
        "data": [
            {"country_code": "IR", "country_name": "Iran"},
            {"country_code": "IT", "country_name": "Italy"}
        ]
    }"#;
    const CATEGORIES: &str = r#"{"success": true, "data": [{"id": 1, "name": "Stew"}]}"#;

    /// Answers each request with the envelope routed to its path, or a
    /// failure envelope for unknown paths. Returns the API base URL.
    async fn serve(routes: Vec<(&'static str, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let (read, mut write) = stream.into_split();
                    let mut lines = BufReader::new(read).lines();
                    let request = lines.next_line().await.ok().flatten().unwrap_or_default();
                    while let Ok(Some(header)) = lines.next_line().await {
                        if header.is_empty() {
                            break;
                        }
                    }

                    let target = request.split_whitespace().nth(1).unwrap_or("/");
                    let path = target.split('?').next().unwrap_or(target);
                    let body = routes
                        .iter()
                        .find(|(route, _)| *route == path)
                        .map_or(r#"{"success": false, "error": "Not found"}"#, |(_, body)| {
                            *body
                        });

                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = write.write_all(response.as_bytes()).await;
                    let _ = write.shutdown().await;
                });
            }
        });

        format!("http://{}/api", addr)
    }

    fn temp_snapshot(tag: &str, json: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "foodwheel-{}-{}.json",
            tag,
            std::process::id()
        ));
        fs_err::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_envelope_success() {
        let envelope: Envelope<Vec<Country>> = serde_json::from_str(
            r#"{"success": true, "count": 1, "data": [{"country_code": "IR", "country_name": "Iran"}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.count, Some(1));
        assert_eq!(envelope.into_result().unwrap(), vec![Country::new("IR", "Iran")]);
    }

    #[test]
    fn test_envelope_failure() {
        let envelope: Envelope<Recipe> =
            serde_json::from_str(r#"{"success": false, "error": "Recipe not found"}"#).unwrap();
        match envelope.into_result() {
            Err(SourceError::Api(msg)) => assert_eq!(msg, "Recipe not found"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: Envelope<Vec<Recipe>> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(envelope.into_result(), Err(SourceError::MissingData)));
    }

    #[test]
    fn test_query_pairs() {
        let query = RecipeQuery {
            country: Some(CountryCode::new("IT")),
            max_time: Some(45),
        };
        assert_eq!(
            query.pairs(),
            vec![("country", "IT".to_string()), ("maxTime", "45".to_string())]
        );
        assert!(RecipeQuery::default().pairs().is_empty());
    }

    #[test]
    fn test_parse_snapshot() {
        let catalog = parse_snapshot(
            r#"{
                "recipes": [
                    {"id": "1", "name": "Fesenjan", "cookingTime": 90, "country": "IR"},
                    {"id": 2, "name": "Risotto", "cooking_time": 30, "prepare_time": 5, "country": "IT"}
                ],
                "countries": [{"code": "IR", "name": "Iran"}]
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.all().len(), 2);
        assert_eq!(catalog.active().len(), 2);
        assert_eq!(catalog.all()[1].total_minutes(), 35);
        assert_eq!(catalog.cuisines(), ["Iran"]);
    }

    #[test]
    fn test_empty_snapshot_is_rejected() {
        assert!(matches!(
            parse_snapshot(r#"{"recipes": []}"#),
            Err(SourceError::Empty)
        ));
    }

    #[test]
    fn test_bundled_snapshot_parses() {
        let catalog =
            parse_snapshot(include_str!("../../../data/foods.json")).unwrap();
        assert!(catalog.all().len() >= 8);
        for recipe in catalog.all() {
            assert!(
                catalog.countries().iter().any(|c| c.code == recipe.country),
                "{} has unknown country {}",
                recipe.name,
                recipe.country
            );
        }
    }

    #[test]
    fn test_demo_catalog_is_spinnable() {
        let catalog = demo_catalog();
        assert_eq!(catalog.all().len(), 8);
        assert!(!catalog.cuisines().is_empty());
    }

    #[tokio::test]
    async fn test_client_reads_each_route() {
        let url = serve(vec![
            ("/api/recipes", RECIPES),
            ("/api/countries", COUNTRIES),
        ])
        .await;
        let client = ApiClient::new(format!("{}/", url), Duration::from_secs(2)).unwrap();

        let recipes = client.recipes(&RecipeQuery::default()).await.unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(client.countries().await.unwrap().len(), 2);
        match client.categories().await {
            Err(SourceError::Api(msg)) => assert_eq!(msg, "Not found"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_prefers_api() {
        let url = serve(vec![
            ("/api/recipes", RECIPES),
            ("/api/countries", COUNTRIES),
            ("/api/categories", CATEGORIES),
        ])
        .await;
        let data = DataSettings {
            api_url: Some(url.clone()),
            static_path: Some(PathBuf::from("/nonexistent/foodwheel/foods.json")),
            timeout_secs: 2,
        };

        let (catalog, origin) = load_catalog(&data).await;
        assert_eq!(origin, CatalogOrigin::Api(url));
        assert_eq!(catalog.all().len(), 2);
        assert_eq!(catalog.cuisines(), ["Iran", "Italy"]);
        assert_eq!(catalog.categories()[0].name, "Stew");

        let fesenjan = &catalog.all()[0];
        assert_eq!(fesenjan.id, RecipeId::new("7"));
        assert_eq!(fesenjan.country, CountryCode::new("IR"));
        assert_eq!(fesenjan.cooking_time, 90);
        assert_eq!(fesenjan.prepare_time, 20);
        assert_eq!(fesenjan.serving_size, Some(4));
        assert_eq!(fesenjan.total_minutes(), 110);

        let risotto = &catalog.all()[1];
        assert_eq!(risotto.prepare_time, 0);
        assert_eq!(risotto.serving_size, None);
    }

    #[tokio::test]
    async fn test_failed_route_falls_back_to_snapshot() {
        let url = serve(vec![
            ("/api/recipes", RECIPES),
            ("/api/countries", COUNTRIES),
            ("/api/categories", r#"{"success": false, "error": "boom"}"#),
        ])
        .await;
        let path = temp_snapshot(
            "route",
            r#"{"recipes": [{"id": "a", "name": "Borscht", "country": "UA"}]}"#,
        );
        let data = DataSettings {
            api_url: Some(url),
            static_path: Some(path.clone()),
            timeout_secs: 2,
        };

        let (catalog, origin) = load_catalog(&data).await;
        let _ = fs_err::remove_file(&path);

        assert_eq!(origin, CatalogOrigin::Snapshot(path));
        assert_eq!(catalog.all().len(), 1);
        assert_eq!(catalog.all()[0].name, "Borscht");
    }

    #[tokio::test]
    async fn test_load_falls_back_to_snapshot() {
        let path = temp_snapshot(
            "test",
            r#"{"recipes": [{"id": "a", "name": "Borscht", "country": "UA"}]}"#,
        );

        let data = DataSettings {
            api_url: None,
            static_path: Some(path.clone()),
            timeout_secs: 1,
        };
        let (catalog, origin) = load_catalog(&data).await;
        let _ = fs_err::remove_file(&path);

        assert_eq!(origin, CatalogOrigin::Snapshot(path));
        assert_eq!(catalog.all()[0].name, "Borscht");
    }

    #[tokio::test]
    async fn test_load_falls_back_to_demo() {
        let data = DataSettings {
            api_url: Some("http://127.0.0.1:9/api".to_string()),
            static_path: Some(PathBuf::from("/nonexistent/foodwheel/foods.json")),
            timeout_secs: 1,
        };
        let (catalog, origin) = load_catalog(&data).await;
        assert_eq!(origin, CatalogOrigin::Demo);
        assert_eq!(catalog.all().len(), 8);
    }
}
