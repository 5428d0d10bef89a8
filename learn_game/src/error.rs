use std::path::PathBuf;

/// Errors raised while playing, training, or loading a model.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid move ({row}, {col}): square is taken or off the board")]
    InvalidMove { row: usize, col: usize },

    #[error("no model at {path}: {reason}")]
    MissingModel { path: PathBuf, reason: String },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("input closed")]
    InputClosed,

    #[error("no available moves left on the board")]
    NoAvailableMoves,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pickle error: {0}")]
    Pickle(#[from] serde_pickle::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
