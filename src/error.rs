//! Error types shared by the catalog and the ledger.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    /// `params`/`format` presence or arity disagree, either on a template or
    /// between an instance payload and its template.
    #[error("{0}")]
    SchemaMismatch(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid command status: {0:?}")]
    InvalidStatus(String),

    /// Template fields other than params/format are out of range.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    #[error("{0} has no id")]
    MissingId(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid stored timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

impl CommandError {
    pub fn template_not_found(id: i64) -> Self {
        CommandError::NotFound { entity: "Main command", id }
    }

    pub fn command_not_found(id: i64) -> Self {
        CommandError::NotFound { entity: "Command", id }
    }
}
