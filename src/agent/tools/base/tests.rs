use super::*;

struct ForecastSchema;

#[async_trait]
impl Tool for ForecastSchema {
    fn name(&self) -> &str {
        "forecast"
    }
    fn description(&self) -> &str {
        "test"
    }
    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city_name": {"type": "string"},
                "days": {"type": "integer"},
                "units": {"type": "string", "enum": ["c", "f"]}
            },
            "required": ["city_name", "days"]
        })
    }
    async fn execute(&self, _params: Value) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }
}

#[test]
fn test_parse_arguments_object() {
    let v = parse_arguments("t", r#"{"city_name": "Praha"}"#).unwrap();
    assert_eq!(v["city_name"], "Praha");
}

#[test]
fn test_parse_arguments_empty_is_empty_object() {
    assert_eq!(parse_arguments("t", "").unwrap(), json!({}));
    assert_eq!(parse_arguments("t", "  \n").unwrap(), json!({}));
}

#[test]
fn test_parse_arguments_invalid_json() {
    let err = parse_arguments("t", "{not json").unwrap_err();
    assert_eq!(err.kind, ToolFailureKind::ArgumentParse);
    assert_eq!(err.tool, "t");
    assert!(err.message.contains("not valid JSON"));
}

#[test]
fn test_parse_arguments_non_object() {
    let err = parse_arguments("t", "[1, 2]").unwrap_err();
    assert_eq!(err.kind, ToolFailureKind::ArgumentParse);
    assert!(err.message.contains("array"));
}

#[test]
fn test_validate_ok() {
    let params = json!({"city_name": "Praha", "days": 3, "units": "c"});
    assert!(validate_params(&ForecastSchema, &params).is_ok());
}

#[test]
fn test_validate_accepts_whole_float_for_integer() {
    let params = json!({"city_name": "Praha", "days": 3.0});
    assert!(validate_params(&ForecastSchema, &params).is_ok());
}

#[test]
fn test_validate_reports_every_problem() {
    let params = json!({"days": "three", "units": "k"});
    let err = validate_params(&ForecastSchema, &params).unwrap_err();
    assert_eq!(err.kind, ToolFailureKind::ArgumentParse);
    assert!(err.message.contains("missing required parameter 'city_name'"));
    assert!(err.message.contains("'days' should be integer but got string"));
    assert!(err.message.contains("'units' must be one of"));
}

#[test]
fn test_validate_null_counts_as_missing() {
    let params = json!({"city_name": null, "days": 1});
    let err = validate_params(&ForecastSchema, &params).unwrap_err();
    assert!(err.message.contains("city_name"));
}

#[test]
fn test_failure_payload_shape() {
    let failure = ToolFailure::new(ToolFailureKind::Invocation, "x", "boom");
    assert_eq!(
        failure.to_payload(),
        json!({"error": {"kind": "invocation", "tool": "x", "message": "boom"}})
    );
}

#[test]
fn test_unknown_tool_lists_available() {
    let failure = ToolFailure::unknown_tool("nope", &["a".into(), "b".into()]);
    assert_eq!(failure.kind, ToolFailureKind::UnknownTool);
    assert!(failure.message.contains("a, b"));
}

#[test]
fn test_tool_result_from_outcome() {
    let ok = ToolResult::from(Ok(json!({"temperature_c": 15.0})));
    assert!(!ok.is_error);
    assert_eq!(ok.content, r#"{"temperature_c":15.0}"#);

    let err = ToolResult::from(Err(ToolFailure::cancelled("x")));
    assert!(err.is_error);
    let parsed: Value = serde_json::from_str(&err.content).unwrap();
    assert_eq!(parsed["error"]["kind"], "cancelled");
}

#[test]
fn test_to_definition() {
    let def = ForecastSchema.to_definition();
    assert_eq!(def.name, "forecast");
    assert_eq!(def.parameters["required"][0], "city_name");
}
