use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExposureError {
    #[error("exposure parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExposureResult<T> = Result<T, ExposureError>;
