use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Every violated field constraint, in field declaration order.
    #[error("validation error: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl ModelError {
    pub fn violations(&self) -> &[String] {
        match self {
            ModelError::Validation(v) => v,
        }
    }
}
