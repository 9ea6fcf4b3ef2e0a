use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum LimberError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("bad frame on line {line}: {message}")]
    FrameParse { line: usize, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LimberError {
    pub fn invalid_config<D: std::fmt::Display>(d: D) -> Self {
        LimberError::InvalidConfig(d.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LimberError>;
