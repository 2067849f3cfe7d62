use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Markup backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Internal mutation failure: {0}")]
    InternalMutationFailure(String),

    #[error("No document loaded")]
    NoDocument,

    #[error("Policy load error: {0}")]
    PolicyLoad(String),

    #[error("Policy parse error: {0}")]
    PolicyParse(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
