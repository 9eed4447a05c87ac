//! Google Sheets integration for placemap.
//!
//! Provides the Sheets v4 values client and the two read paths the pipeline
//! consumes: plain cell rows and `=IMAGE()` formula URLs.

pub mod client;
pub mod error;
pub mod image;
pub mod source;
pub mod types;

pub use client::SheetsClient;
pub use error::SheetsError;
pub use image::{image_urls_from_column, parse_image_formula, ImageUrls};
pub use source::{ImageSource, RowSource, SheetsReader};
pub use types::{Row, ValueRange, ValueRenderOption};
