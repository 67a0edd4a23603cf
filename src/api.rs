//! Typed access to the optimization service.
//!
//! Wire types mirror the service's JSON. Requests go through a [`Transport`]
//! so the browser build can use `gloo-net` while tests substitute a fake.

use std::fmt;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::detail_cache::DetailSource;
use crate::error::ApiError;

// -- Identifiers --

/// Menu item identifier. The service sends either a string (`"AP001"`) or a
/// bare integer; both normalize to the string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DishId(String);

impl DishId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DishId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

macro_rules! dish_id_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for DishId {
            fn from(id: $t) -> Self {
                Self(id.to_string())
            }
        }
    )*};
}

dish_id_from_int!(i32, i64, u32, u64);

impl<'de> Deserialize<'de> for DishId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => DishId(s),
            Raw::Int(n) => DishId(n.to_string()),
            Raw::Float(n) => DishId(n.to_string()),
        })
    }
}

// -- Optimization results --

/// One row of the optimization result table. Every field except the id may
/// be absent; absence is kept as `None` and never coerced to zero.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OptimizationResultRow {
    pub dish_id: DishId,
    pub dish_name: Option<String>,
    pub current_price: Option<f64>,
    pub optimal_price: Option<f64>,
    pub expected_profit: Option<f64>,
    pub expected_demand: Option<f64>,
    pub elasticity: Option<f64>,
}

/// Response of `POST /optimize-prices`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OptimizationReport {
    #[serde(default)]
    pub results: Vec<OptimizationResultRow>,
    pub baseline_profit: Option<f64>,
    pub optimized_profit: Option<f64>,
    pub co_occurrence_info: Option<String>,
    pub ai_explanation: Option<String>,
}

// -- Combo popularity --

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ComboItem {
    pub id: Option<String>,
    #[serde(default = "unknown_name")]
    pub name: String,
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Combo {
    #[serde(default)]
    pub combo_items: Vec<ComboItem>,
    #[serde(rename = "popularityScore", default)]
    pub popularity_score: f64,
}

impl Combo {
    /// Item names joined for display, e.g. "Spring Rolls + Orange Chicken".
    pub fn label(&self) -> String {
        self.combo_items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// Response of `POST /combo-popularity`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ComboPopularity {
    #[serde(default)]
    pub top_combos: Vec<Combo>,
}

// -- Seasonal heat scores --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Display order of the per-row heatmaps.
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn name(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One heatmap cell: `category_x` is usually a weekday, `category_y` a time
/// slot such as `"11-1"`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeasonalDataPoint {
    #[serde(rename = "x")]
    pub category_x: String,
    #[serde(rename = "y")]
    pub category_y: String,
    pub value: f64,
}

impl SeasonalDataPoint {
    pub fn new(category_x: impl Into<String>, category_y: impl Into<String>, value: f64) -> Self {
        Self {
            category_x: category_x.into(),
            category_y: category_y.into(),
            value,
        }
    }
}

/// Response of `GET /heatscores/{dish_id}`. A season missing from the
/// payload decodes as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SeasonalDataset {
    #[serde(rename = "Winter", default)]
    winter: Vec<SeasonalDataPoint>,
    #[serde(rename = "Spring", default)]
    spring: Vec<SeasonalDataPoint>,
    #[serde(rename = "Summer", default)]
    summer: Vec<SeasonalDataPoint>,
    #[serde(rename = "Fall", default)]
    fall: Vec<SeasonalDataPoint>,
}

impl SeasonalDataset {
    pub fn with_season(mut self, season: Season, points: Vec<SeasonalDataPoint>) -> Self {
        *self.season_mut(season) = points;
        self
    }

    pub fn season(&self, season: Season) -> &[SeasonalDataPoint] {
        match season {
            Season::Winter => &self.winter,
            Season::Spring => &self.spring,
            Season::Summer => &self.summer,
            Season::Fall => &self.fall,
        }
    }

    fn season_mut(&mut self, season: Season) -> &mut Vec<SeasonalDataPoint> {
        match season {
            Season::Winter => &mut self.winter,
            Season::Spring => &mut self.spring,
            Season::Summer => &mut self.summer,
            Season::Fall => &mut self.fall,
        }
    }

    pub fn is_empty(&self) -> bool {
        Season::ALL.iter().all(|s| self.season(*s).is_empty())
    }
}

// -- Transport --

/// Minimal HTTP surface the client needs. Futures are `'static` so they can
/// be handed to `spawn_local` or shared between waiters.
pub trait Transport {
    fn get(&self, url: String) -> LocalBoxFuture<'static, Result<String, ApiError>>;
    fn post(&self, url: String) -> LocalBoxFuture<'static, Result<String, ApiError>>;
}

/// Browser transport backed by `fetch` through `gloo-net`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    fn get(&self, url: String) -> LocalBoxFuture<'static, Result<String, ApiError>> {
        async move {
            let resp = gloo_net::http::Request::get(&url)
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            read_body(resp, url).await
        }
        .boxed_local()
    }

    fn post(&self, url: String) -> LocalBoxFuture<'static, Result<String, ApiError>> {
        async move {
            let resp = gloo_net::http::Request::post(&url)
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            read_body(resp, url).await
        }
        .boxed_local()
    }
}

async fn read_body(resp: gloo_net::http::Response, url: String) -> Result<String, ApiError> {
    if !resp.ok() {
        warn!("{} returned HTTP {}", url, resp.status());
        return Err(ApiError::Status {
            status: resp.status(),
            url,
        });
    }
    resp.text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))
}

// -- Client --

/// Typed client for the three service endpoints.
#[derive(Debug, Clone)]
pub struct ServiceClient<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> ServiceClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn heatscores_url(&self, id: &DishId) -> String {
        format!("{}/heatscores/{}", self.base_url, id)
    }

    pub async fn optimize_prices(&self) -> Result<OptimizationReport, ApiError> {
        let url = format!("{}/optimize-prices", self.base_url);
        info!("Requesting price optimization from {}", url);
        let body = self.transport.post(url).await?;
        let report: OptimizationReport = decode(&body)?;
        info!("Optimization returned {} rows", report.results.len());
        Ok(report)
    }

    pub async fn combo_popularity(&self) -> Result<ComboPopularity, ApiError> {
        let url = format!("{}/combo-popularity", self.base_url);
        info!("Requesting combo popularity from {}", url);
        let body = self.transport.post(url).await?;
        decode(&body)
    }

    /// Fetch the seasonal heat scores for one item. The returned future does
    /// not borrow the client.
    pub fn heatscores(
        &self,
        id: &DishId,
    ) -> LocalBoxFuture<'static, Result<SeasonalDataset, ApiError>> {
        let url = self.heatscores_url(id);
        debug!("GET {}", url);
        let request = self.transport.get(url);
        async move {
            let body = request.await?;
            decode(&body)
        }
        .boxed_local()
    }
}

impl<T: Transport> DetailSource for ServiceClient<T> {
    fn fetch_detail(&self, id: &DishId) -> LocalBoxFuture<'static, Result<SeasonalDataset, ApiError>> {
        self.heatscores(id)
    }
}

fn decode<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    serde_json::from_str(body).map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dish_id_accepts_string_and_integer() {
        let a: DishId = serde_json::from_str("\"AP001\"").unwrap();
        let b: DishId = serde_json::from_str("42").unwrap();
        assert_eq!(a.as_str(), "AP001");
        assert_eq!(b, DishId::from(42));
        assert_eq!(b, DishId::from("42"));
    }

    #[test]
    fn test_result_row_missing_fields_stay_none() {
        let row: OptimizationResultRow = serde_json::from_str(
            r#"{"dish_id": "EN005", "current_price": 12.5, "optimal_price": null}"#,
        )
        .unwrap();
        assert_eq!(row.current_price, Some(12.5));
        assert_eq!(row.optimal_price, None);
        assert_eq!(row.expected_profit, None);
        assert_eq!(row.dish_name, None);
    }

    #[test]
    fn test_zero_price_is_a_value() {
        let row: OptimizationResultRow =
            serde_json::from_str(r#"{"dish_id": 7, "current_price": 0}"#).unwrap();
        assert_eq!(row.current_price, Some(0.0));
    }

    #[test]
    fn test_report_tolerates_missing_results() {
        let report: OptimizationReport =
            serde_json::from_str(r#"{"baseline_profit": 100.0, "optimized_profit": 120.0}"#).unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.co_occurrence_info, None);
    }

    #[test]
    fn test_seasonal_dataset_renames_and_defaults() {
        let dataset: SeasonalDataset = serde_json::from_str(
            r#"{"Winter": [{"x": "Monday", "y": "11-1", "value": 8}], "Summer": []}"#,
        )
        .unwrap();
        let winter = dataset.season(Season::Winter);
        assert_eq!(winter.len(), 1);
        assert_eq!(winter[0].category_x, "Monday");
        assert_eq!(winter[0].category_y, "11-1");
        assert_eq!(winter[0].value, 8.0);
        assert!(dataset.season(Season::Fall).is_empty());
        assert!(!dataset.is_empty());
    }

    #[test]
    fn test_combo_label_and_score() {
        let combos: ComboPopularity = serde_json::from_str(
            r#"{"top_combos": [{"combo_items": [{"id": "AP001", "name": "Spring Rolls"},
                {"id": "EN005", "name": "Orange Chicken"}], "popularityScore": 45}],
                "min_size": 2, "max_size": 2, "top_k": 5}"#,
        )
        .unwrap();
        assert_eq!(combos.top_combos[0].label(), "Spring Rolls + Orange Chicken");
        assert_eq!(combos.top_combos[0].popularity_score, 45.0);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ServiceClient::new("http://localhost:8000/", GlooTransport);
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.heatscores_url(&DishId::from(42)),
            "http://localhost:8000/heatscores/42"
        );
    }
}
