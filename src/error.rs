use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubcueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Speech recognition error: {0}")]
    Recognizer(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Malformed token #{index}: start time {time} (previous {previous})")]
    MalformedToken { index: usize, time: f64, previous: f64 },

    #[error("Subtitle serialization failed: {0}")]
    Serialization(String),

    #[error("Unknown alignment '{0}' (valid: {1})")]
    UnknownAlignment(String, String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, SubcueError>;
