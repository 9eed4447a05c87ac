use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to encode map data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to format document: {0}")]
    Format(#[from] std::fmt::Error),
}
