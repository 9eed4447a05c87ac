//! Sheets-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Authentication required")]
    AuthRequired,

    #[error("Token expired")]
    TokenExpired,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Spreadsheet or range not found: {0}")]
    NotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl SheetsError {
    /// Short hint for the run summary.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthRequired => {
                "The service account cannot read this sheet. Share it with the account's email."
                    .to_string()
            }
            Self::TokenExpired => "The access token was rejected. Run again.".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::NotFound(_) => "Spreadsheet or tab not found. Check sheet settings.".to_string(),
            Self::ApiError(msg) => format!("Sheets error: {}", msg),
            Self::NetworkError(_) => "Network error. Check your connection.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = SheetsError::AuthRequired;
        assert!(err.user_message().contains("Share"));

        let err = SheetsError::RateLimited(30);
        assert!(err.user_message().contains("30"));
    }
}
