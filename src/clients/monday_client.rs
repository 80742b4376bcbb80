/// Board service GraphQL client
///
/// Wraps every call to the monday.com-style GraphQL endpoint
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use serde_json::{json, Value};
use std::future::Future;
use tracing::debug;

/// One GraphQL round trip: send `query` with `variables`, get back `data`.
///
/// Implementations must surface service-reported errors as `Err`.
pub trait GraphQlTransport {
    fn execute(&self, query: &str, variables: Value) -> impl Future<Output = AppResult<Value>> + Send;
}

/// HTTP client for the board service
pub struct MondayClient {
    http: reqwest::Client,
    api_url: String,
    api_token: String,
}

impl MondayClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
        }
    }
}

impl GraphQlTransport for MondayClient {
    async fn execute(&self, query: &str, variables: Value) -> AppResult<Value> {
        let body = json!({ "query": query, "variables": variables });
        debug!("GraphQL request: {}", body);

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", &self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&self.api_url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&self.api_url, e))?;
        debug!("GraphQL response ({}): {}", status, text);

        let payload: Value = match serde_json::from_str(&text) {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => {
                return Err(ApiError::BadStatus {
                    endpoint: self.api_url.clone(),
                    status: status.as_u16(),
                }
                .into())
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(messages) = service_error_messages(&payload) {
            return Err(AppError::service_errors(messages));
        }
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                endpoint: self.api_url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        Ok(payload.get("data").cloned().unwrap_or(Value::Null))
    }
}

/// Messages from a non-empty `errors` array or a top-level `error_message`.
pub fn service_error_messages(payload: &Value) -> Option<Vec<String>> {
    if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let messages = errors
                .iter()
                .map(|e| {
                    e.get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| e.to_string())
                })
                .collect();
            return Some(messages);
        }
    }
    payload
        .get("error_message")
        .and_then(Value::as_str)
        .map(|message| vec![message.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_errors_are_collected() {
        let payload = json!({
            "errors": [{ "message": "Column not found" }, { "message": "Invalid value" }]
        });
        assert_eq!(
            service_error_messages(&payload),
            Some(vec!["Column not found".to_string(), "Invalid value".to_string()])
        );
    }

    #[test]
    fn error_message_field_is_an_error() {
        let payload = json!({ "error_message": "Not Authenticated", "status_code": 401 });
        assert_eq!(
            service_error_messages(&payload),
            Some(vec!["Not Authenticated".to_string()])
        );
    }

    #[test]
    fn empty_errors_are_ignored() {
        let payload = json!({ "data": { "boards": [] }, "errors": [] });
        assert_eq!(service_error_messages(&payload), None);
    }

    #[tokio::test]
    #[ignore] // needs MONDAY_API_TOKEN and MONDAY_BOARD_ID: cargo test -- --ignored
    async fn test_board_query_against_service() {
        let _ = tracing_subscriber::fmt::try_init();
        let config = Config::from_env();
        let client = MondayClient::new(&config);

        let data = client
            .execute(
                "query($boardId: ID!) { boards(ids: [$boardId]) { id name } }",
                json!({ "boardId": config.board_id }),
            )
            .await
            .expect("board query failed");

        assert!(data.get("boards").is_some());
    }
}
