use thiserror::Error;

/// Every failure the ingestion pipeline and the resolvers can report.
///
/// All variants are recoverable at the caller boundary. The type is `Clone`
/// because a single extraction result is handed to every caller waiting on
/// the same document in the cache.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Unsupported file format: {0}. Please upload a CSV or PDF file.")]
    UnsupportedFormat(String),

    #[error("No tables found in the PDF.")]
    NoTablesFound,

    #[error("Error reading document: {0}")]
    ExtractionFailure(String),

    #[error("No tables supplied to normalize")]
    EmptyInput,

    #[error("No numeric columns found for visualization.")]
    NoNumericColumns,

    #[error("Invalid field: {0}")]
    InvalidField(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
