//! Centralized error types for placemap.
//!
//! Leaf crates keep their own error enums for their HTTP clients; the
//! failures that end a run are collected here so `main` can report them with
//! a short hint next to the full error chain.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Geocode cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Short, actionable hint printed after the error chain.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Auth(e) => e.user_message(),
            AppError::Cache(e) => e.user_message(),
            AppError::Other(_) => "An unexpected error occurred. Re-run with RUST_LOG=debug.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request was rejected. Check your settings.",
            NetworkError::InvalidResponse(_) => "Received an unexpected response from the server.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// Service account credential and token errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No Google Sheets credentials found (checked ${env_var} and {path:?})")]
    NoCredentials {
        env_var: String,
        path: Option<PathBuf>,
    },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Failed to sign token request: {0}")]
    Signing(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl AuthError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::NoCredentials { .. } => {
                "Set GOOGLE_SHEETS_CREDS_JSON or credentials.key_path to a service account key."
            }
            AuthError::InvalidCredentials(_) => "The service account key could not be read.",
            AuthError::Signing(_) => "The service account private key is not a valid RSA key.",
            AuthError::TokenExchange(_) => {
                "Google rejected the service account. Check that the key is still active."
            }
            AuthError::Network(e) => e.user_message(),
        }
    }
}

/// Errors reading or writing the geocode cache file.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to read cache {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write cache {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cache {path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl CacheError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CacheError::Read { .. } => "The geocode cache could not be read. Check its permissions.",
            CacheError::Write { .. } => "The geocode cache could not be saved.",
            CacheError::Parse { .. } => {
                "The geocode cache is corrupted. Fix or delete it to re-geocode all addresses."
            }
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let auth_err = AuthError::InvalidCredentials("missing client_email".into());
        let app_err: AppError = auth_err.into();
        assert!(matches!(
            app_err,
            AppError::Auth(AuthError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Auth(AuthError::NoCredentials {
            env_var: "GOOGLE_SHEETS_CREDS_JSON".into(),
            path: None,
        });
        assert!(app_err.user_message().contains("GOOGLE_SHEETS_CREDS_JSON"));

        let app_err = AppError::Network(NetworkError::ServerError {
            status: 503,
            message: "unavailable".into(),
        });
        assert!(app_err.user_message().contains("later"));
    }

    #[test]
    fn test_no_credentials_display_names_sources() {
        let err = AuthError::NoCredentials {
            env_var: "CREDS".into(),
            path: Some(PathBuf::from("/tmp/key.json")),
        };
        let text = err.to_string();
        assert!(text.contains("$CREDS"));
        assert!(text.contains("/tmp/key.json"));
    }
}
