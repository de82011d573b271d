#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Index {index} is out of bounds for {len} item(s)")]
    OutOfBounds { index: usize, len: usize },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Malformed payload: {0}")]
    Parse(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
