use crate::agent::tools::Tool;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.weatherapi.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_FORECAST_DAYS: u64 = 14;

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: Location,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct DaySummary {
    maxtemp_c: f64,
    mintemp_c: f64,
    avgtemp_c: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: String,
    day: DaySummary,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    location: Location,
    current: Current,
    forecast: Forecast,
}

#[derive(Debug, Serialize)]
struct DailyTemperature {
    date: String,
    min_c: f64,
    max_c: f64,
    avg_c: f64,
}

/// Thin client for weatherapi.com shared by both weather tools.
pub struct WeatherApi {
    api_key: String,
    base_url: String,
    client: Client,
}

impl WeatherApi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_API_BASE)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        extra: &[(&str, String)],
    ) -> Result<T> {
        let mut query = vec![
            ("key", self.api_key.clone()),
            ("aqi", "no".to_string()),
        ];
        query.extend(extra.iter().map(|(k, v)| (*k, v.clone())));

        let resp = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&query)
            .send()
            .await
            .with_context(|| format!("WeatherAPI request to {} failed", endpoint))?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .with_context(|| format!("WeatherAPI returned a non-JSON body ({})", status))?;
        if !status.is_success() {
            let msg = body["error"]["message"].as_str().unwrap_or("Unknown error");
            anyhow::bail!("WeatherAPI ({}): {}", status.as_u16(), msg);
        }

        serde_json::from_value(body).context("Unexpected WeatherAPI response shape")
    }
}

fn city_name(params: &Value) -> Result<&str> {
    params["city_name"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .context("'city_name' must be a non-empty string")
}

pub struct CurrentTemperatureTool {
    api: Arc<WeatherApi>,
}

impl CurrentTemperatureTool {
    pub fn new(api: Arc<WeatherApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for CurrentTemperatureTool {
    fn name(&self) -> &str {
        "get_current_temperature_for_city"
    }

    fn description(&self) -> &str {
        "Get the current temperature in degrees Celsius for a city."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city_name": {
                    "type": "string",
                    "description": "Name of the city, e.g. 'Praha' or 'London'"
                }
            },
            "required": ["city_name"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let city = city_name(&params)?;
        let resp: CurrentResponse = self
            .api
            .get("current.json", &[("q", city.to_string())])
            .await?;
        Ok(json!({
            "city": resp.location.name,
            "temperature_c": resp.current.temp_c,
        }))
    }
}

pub struct TemperatureForecastTool {
    api: Arc<WeatherApi>,
}

impl TemperatureForecastTool {
    pub fn new(api: Arc<WeatherApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for TemperatureForecastTool {
    fn name(&self) -> &str {
        "get_temperature_forecast_for_city"
    }

    fn description(&self) -> &str {
        "Get the daily temperature forecast in degrees Celsius for a city, 1 to 14 days ahead."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city_name": {
                    "type": "string",
                    "description": "Name of the city"
                },
                "days": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_FORECAST_DAYS,
                    "description": "Number of forecast days (1-14)"
                }
            },
            "required": ["city_name", "days"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let city = city_name(&params)?;
        let days = params["days"]
            .as_u64()
            .or_else(|| {
                params["days"]
                    .as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .context("'days' must be a whole number")?;
        if !(1..=MAX_FORECAST_DAYS).contains(&days) {
            anyhow::bail!(
                "The number of days must be between 1 and {}, got {}",
                MAX_FORECAST_DAYS,
                days
            );
        }

        let resp: ForecastResponse = self
            .api
            .get(
                "forecast.json",
                &[("q", city.to_string()), ("days", days.to_string())],
            )
            .await?;

        let forecast: Vec<DailyTemperature> = resp
            .forecast
            .forecastday
            .into_iter()
            .map(|d| DailyTemperature {
                date: d.date,
                min_c: d.day.mintemp_c,
                max_c: d.day.maxtemp_c,
                avg_c: d.day.avgtemp_c,
            })
            .collect();

        Ok(json!({
            "city": resp.location.name,
            "temperature_c": resp.current.temp_c,
            "forecast": forecast,
        }))
    }
}

#[cfg(test)]
mod tests;
