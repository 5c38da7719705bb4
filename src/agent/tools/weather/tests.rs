use super::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> Arc<WeatherApi> {
    Arc::new(WeatherApi::with_base_url("test_key", &server.uri()))
}

fn offline_api() -> Arc<WeatherApi> {
    // Port 9 (discard) is never listening; only used where no request is sent.
    Arc::new(WeatherApi::with_base_url("k", "http://127.0.0.1:9"))
}

#[tokio::test]
async fn test_current_temperature_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("key", "test_key"))
        .and(query_param("q", "Praha"))
        .and(query_param("aqi", "no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": {"name": "Prague", "country": "Czech Republic"},
            "current": {"temp_c": 15.0, "condition": {"text": "Sunny"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tool = CurrentTemperatureTool::new(api(&server));
    let result = tool.execute(json!({"city_name": "Praha"})).await.unwrap();
    assert_eq!(result, json!({"city": "Prague", "temperature_c": 15.0}));
}

#[tokio::test]
async fn test_current_temperature_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 1006, "message": "No matching location found."}
        })))
        .mount(&server)
        .await;

    let tool = CurrentTemperatureTool::new(api(&server));
    let err = tool
        .execute(json!({"city_name": "Atlantis"}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No matching location found."));
    assert!(err.to_string().contains("400"));
}

#[tokio::test]
async fn test_forecast_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "Brno"))
        .and(query_param("days", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": {"name": "Brno"},
            "current": {"temp_c": 11.5},
            "forecast": {"forecastday": [
                {"date": "2026-10-19", "day": {"maxtemp_c": 14.0, "mintemp_c": 6.0, "avgtemp_c": 10.1}},
                {"date": "2026-10-20", "day": {"maxtemp_c": 12.0, "mintemp_c": 5.0, "avgtemp_c": 8.4}}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tool = TemperatureForecastTool::new(api(&server));
    let result = tool
        .execute(json!({"city_name": "Brno", "days": 2}))
        .await
        .unwrap();
    assert_eq!(result["city"], "Brno");
    assert_eq!(result["temperature_c"], 11.5);
    let forecast = result["forecast"].as_array().unwrap();
    assert_eq!(forecast.len(), 2);
    assert_eq!(forecast[1]["date"], "2026-10-20");
    assert_eq!(forecast[1]["min_c"], 5.0);
    assert_eq!(forecast[1]["max_c"], 12.0);
}

#[tokio::test]
async fn test_forecast_days_out_of_range() {
    let tool = TemperatureForecastTool::new(offline_api());
    for days in [0, 15] {
        let err = tool
            .execute(json!({"city_name": "Praha", "days": days}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("between 1 and 14"), "{}", err);
    }
}

#[tokio::test]
async fn test_forecast_accepts_whole_float_days() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("days", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": {"name": "Praha"},
            "current": {"temp_c": 9.0},
            "forecast": {"forecastday": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tool = TemperatureForecastTool::new(api(&server));
    let result = tool
        .execute(json!({"city_name": "Praha", "days": 3.0}))
        .await
        .unwrap();
    assert_eq!(result["forecast"], json!([]));
}

#[tokio::test]
async fn test_blank_city_rejected() {
    let tool = CurrentTemperatureTool::new(offline_api());
    let err = tool.execute(json!({"city_name": "  "})).await.unwrap_err();
    assert!(err.to_string().contains("city_name"));
}

#[test]
fn test_schemas_declare_required_fields() {
    let forecast = TemperatureForecastTool::new(offline_api());
    assert_eq!(forecast.parameters()["required"], json!(["city_name", "days"]));
    let current = CurrentTemperatureTool::new(offline_api());
    assert_eq!(current.parameters()["required"], json!(["city_name"]));
}
