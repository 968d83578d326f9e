use thiserror::Error;

/// Rejected configuration. Always fatal at construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown distortion model `{0}`")]
    UnknownDistortion(String),
    #[error("unknown distortion kind `{0}`")]
    UnknownKind(String),
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("`{field}` is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("invalid color `{0}`")]
    InvalidColor(String),
    #[error("options JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("render device lost")]
    Lost,
    #[error("shader validation failed: {0}")]
    Shader(String),
}

#[derive(Debug, Error)]
pub enum HyperspeedError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("host error: {0}")]
    Host(String),
}

impl HyperspeedError {
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }
}
