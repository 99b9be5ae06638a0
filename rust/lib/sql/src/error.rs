use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    /// The store could not be opened or reached.
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    /// A UNIQUE / PRIMARY KEY constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),
}

impl SQLError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, SQLError::Constraint(_))
    }
}
