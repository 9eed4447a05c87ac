pub mod category;
pub mod config;
pub mod error;
pub mod listing;

pub use category::{classify, Categories, Category, CategoryStyle};
pub use config::{
    ColumnsConfig, Config, CredentialsConfig, FilterConfig, GeocodeConfig, OutputConfig,
    SheetConfig, ValidationResult,
};
pub use error::{AppError, AuthError, CacheError, ConfigError, NetworkError};
pub use listing::{Coordinates, Listing};

use anyhow::Result;

/// Initialize tracing for the run.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::debug!("placemap core initialized");
    Ok(())
}
