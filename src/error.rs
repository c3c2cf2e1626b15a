use thiserror::Error;

use crate::provider::ProviderKind;
use crate::storage::StorageError;

/// Errors surfaced by the keyword research core
#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    State(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("provider request failed: {0}")]
    Provider(String),
    #[error("provider '{0}' is not implemented yet")]
    NotImplemented(ProviderKind),
    #[error("provider '{0}' is not available")]
    ProviderUnavailable(ProviderKind),
    #[error("search quota exhausted; replenish to continue searching")]
    QuotaExhausted,
    #[error("request governor is shut down")]
    GovernorClosed,
    #[error("request was aborted before completing")]
    TaskAborted,
}

pub type KeywordResult<T> = Result<T, KeywordError>;

impl KeywordError {
    pub(crate) fn empty_keyword() -> Self {
        KeywordError::Validation("Please enter a keyword to analyze.".to_string())
    }
}
