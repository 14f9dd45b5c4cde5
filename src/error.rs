use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record on line {line}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid record on line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("invalid record: {0}")]
    RejectedRecord(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("weekly mode needs both --from and --to")]
    MissingRange,
}

pub type Result<T> = std::result::Result<T, Error>;
