use crate::errors::AgentError;
use serde_json::Value;
use tracing::warn;

/// Maps non-success HTTP responses from a completion endpoint onto [`AgentError`].
///
/// Used as static methods by the concrete clients. Errors come back as
/// `anyhow::Error` wrapping the typed variant so they survive the
/// `CompletionClient` boundary and can be recovered with a downcast.
pub struct HttpErrorMapper;

impl HttpErrorMapper {
    /// Classify a status code plus body into a typed error.
    pub fn classify(status: u16, retry_after: Option<u64>, body: &str) -> AgentError {
        match status {
            429 => {
                match retry_after {
                    Some(secs) => warn!("Rate limit hit. Retry after {} seconds", secs),
                    None => warn!("Rate limit hit (status: {})", status),
                }
                AgentError::RateLimit { retry_after }
            }
            401 | 403 => {
                warn!("Authentication error (status: {}): {}", status, body);
                AgentError::Auth(format!(
                    "Authentication failed. Please check your API key. Error: {}",
                    Self::api_message(body).unwrap_or_else(|| body.to_string())
                ))
            }
            _ => {
                let retryable = (500..600).contains(&status);
                let message = match Self::api_message(body) {
                    Some(msg) => format!("API error ({}): {}", status, msg),
                    None => format!("API error ({}): {}", status, body),
                };
                AgentError::transport(message, retryable)
            }
        }
    }

    /// Pull `error.message` (with `error.type` when present) out of an API error body.
    fn api_message(body: &str) -> Option<String> {
        let json: Value = serde_json::from_str(body).ok()?;
        let err = json.get("error")?;
        let msg = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        Some(match err.get("type").and_then(Value::as_str) {
            Some(kind) => format!("{}: {}", kind, msg),
            None => msg.to_string(),
        })
    }

    /// Return the response unchanged when successful; otherwise consume the body
    /// and return the typed error.
    pub async fn check_http_status(
        resp: reqwest::Response,
        endpoint: &str,
    ) -> anyhow::Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status().as_u16();
        let retry_after = resp
            .headers()
            .get("retry-after")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = Self::classify(status, retry_after, &body);
        warn!("{} request failed: {}", endpoint, err);
        Err(err.into())
    }

    /// Check an HTTP response and decode the JSON body.
    ///
    /// A 200 whose body still carries an `error` object is treated as a
    /// non-retryable transport failure.
    pub async fn check_response(resp: reqwest::Response, endpoint: &str) -> anyhow::Result<Value> {
        let resp = Self::check_http_status(resp, endpoint).await?;

        let json: Value = resp.json().await.map_err(|e| {
            AgentError::transport(format!("Failed to parse {} response: {}", endpoint, e), false)
        })?;

        if let Some(error_val) = json.get("error") {
            let body = serde_json::json!({ "error": error_val }).to_string();
            return Err(Self::classify(200, None, &body).into());
        }

        Ok(json)
    }
}

#[cfg(test)]
mod tests;
