//! OAuth2 JWT-bearer grant for Google service accounts.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use placemap_core::error::ReqwestErrorExt;
use placemap_core::AuthError;
use serde::{Deserialize, Serialize};

use crate::credentials::ServiceAccountKey;
use crate::token::TokenSet;

/// Read-only access to spreadsheet values.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    scope: Option<String>,
}

pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    client: reqwest::Client,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            client: reqwest::Client::new(),
        }
    }

    /// Build the signed assertion posted to the token endpoint.
    fn assertion(&self, scopes: &[&str], now: i64) -> Result<String, AuthError> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: scopes.join(" "),
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Exchange a signed assertion for an access token.
    #[tracing::instrument(skip(self), fields(client_email = %self.key.client_email), level = "info")]
    pub async fn access_token(&self, scopes: &[&str]) -> Result<TokenSet, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let assertion = self.assertion(scopes, now)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AuthError::Network(e.into_network_error()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange(format!("{}: {}", status, error_text)));
        }

        let token: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Network(e.into_network_error()))?;

        let scopes = match token.scope {
            Some(granted) => granted.split(' ').map(str::to_string).collect(),
            None => scopes.iter().map(|s| s.to_string()).collect(),
        };

        tracing::info!("Obtained access token for {}", self.key.client_email);
        Ok(TokenSet {
            access_token: token.access_token,
            expires_at: now + token.expires_in,
            scopes,
        })
    }
}
