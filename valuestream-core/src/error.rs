use thiserror::Error;

#[derive(Debug, Error)]
pub enum VsmError {
    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),

    #[error("Canvas must have finite, positive dimensions (got {width} x {height})")]
    InvalidCanvas { width: f64, height: f64 },

    #[error("Layout parameter '{name}' is invalid: {reason}")]
    InvalidLayoutParameter { name: &'static str, reason: String },

    #[error("Import failed at row {row}: {message}")]
    Import { row: usize, message: String },

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}
