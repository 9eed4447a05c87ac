//! Google Sheets v4 values client.

use tracing::instrument;

use crate::error::SheetsError;
use crate::types::{ValueRange, ValueRenderOption};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

pub struct SheetsClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl SheetsClient {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(access_token, SHEETS_API_BASE)
    }

    pub fn with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Read a range in A1 notation, e.g. `Full Data` or `Full Data!F2:F40`.
    #[instrument(skip(self), level = "info")]
    pub async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRenderOption,
    ) -> Result<ValueRange, SheetsError> {
        let url = format!(
            "{}/spreadsheets/{}/values/{}?valueRenderOption={}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range),
            render.as_query(),
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, SheetsError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| SheetsError::ApiError(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(SheetsError::TokenExpired)
        } else if status.as_u16() == 403 {
            Err(SheetsError::AuthRequired)
        } else if status.as_u16() == 404 {
            let text = response.text().await.unwrap_or_default();
            Err(SheetsError::NotFound(text))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(SheetsError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(SheetsError::ApiError(format!("{}: {}", status, text)))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_values() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/spreadsheets/abc/values/Places"))
            .and(query_param("valueRenderOption", "FORMATTED_VALUE"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "range": "Places!A1:O2",
                "majorDimension": "ROWS",
                "values": [["Name", "Location"], ["Pier 1", "Savannah, GA"]]
            })))
            .mount(&mock_server)
            .await;

        let client = SheetsClient::with_base_url("test_token", &mock_server.uri());
        let range = client
            .get_values("abc", "Places", ValueRenderOption::FormattedValue)
            .await
            .unwrap();

        let rows = range.into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "Pier 1");
    }

    #[tokio::test]
    async fn test_token_expired() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = SheetsClient::with_base_url("expired", &mock_server.uri());
        let result = client
            .get_values("abc", "Places", ValueRenderOption::FormattedValue)
            .await;

        assert!(matches!(result, Err(SheetsError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_not_shared_with_service_account() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let client = SheetsClient::with_base_url("token", &mock_server.uri());
        let result = client
            .get_values("abc", "Places", ValueRenderOption::FormattedValue)
            .await;

        assert!(matches!(result, Err(SheetsError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).append_header("Retry-After", "30"))
            .mount(&mock_server)
            .await;

        let client = SheetsClient::with_base_url("token", &mock_server.uri());
        let result = client
            .get_values("abc", "Places", ValueRenderOption::Formula)
            .await;

        assert!(matches!(result, Err(SheetsError::RateLimited(30))));
    }
}
