use thiserror::Error;

/// Domain errors raised while preparing the dataset or answering a query.
#[derive(Error, Debug)]
pub enum DiamondError {
    /// Input data violates the expected schema or a categorical domain.
    /// Fatal when it happens at start-up.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A query parameter is outside its domain (e.g. a non-positive carat).
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),
}

pub type Result<T> = std::result::Result<T, DiamondError>;
