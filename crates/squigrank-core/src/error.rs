use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("source unreachable: {0}")]
    TransportUnavailable(String),

    #[error("catalog document matches no known shape")]
    MalformedCatalog,

    #[error("measurement unparseable: {0}")]
    MalformedMeasurement(String),

    #[error("{0}")]
    Other(String),
}
