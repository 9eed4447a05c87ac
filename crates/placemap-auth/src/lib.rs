//! Google service account access for the spreadsheet reader.

pub mod credentials;
pub mod google;
pub mod token;

pub use credentials::{resolve_credentials, ServiceAccountKey};
pub use google::{ServiceAccountAuth, SHEETS_READONLY_SCOPE};
pub use token::TokenSet;
