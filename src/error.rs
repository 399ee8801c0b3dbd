use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("data source unavailable: {0}")]
    DataSource(String),

    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rendering engine failed to load: {0}")]
    EngineLoad(String),

    #[error("render failed: {0}")]
    Render(String),
}
