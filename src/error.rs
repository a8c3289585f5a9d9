use thiserror::Error;

/// Failures of a single business operation.
///
/// Startup code works in `anyhow::Result`; everything reachable from a request
/// returns this type so the web layer can pick a status code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("stored line items are malformed: {0}")]
    Items(#[from] serde_json::Error),

    #[error("pdf generation failed: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Error::NotFound { entity, id }
    }

    /// Turns a foreign-key failure on insert into `ConstraintViolation`;
    /// any other database error passes through untouched.
    pub fn from_insert(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return Error::ConstraintViolation(format!("{what} references a client that does not exist"));
            }
        }
        Error::Database(err)
    }
}
