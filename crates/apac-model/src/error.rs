use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid authorization number '{0}': expected 13 digits")]
    InvalidAuthorizationNumber(String),
    #[error("invalid period '{0}': expected YYYYMM")]
    InvalidPeriod(String),
    #[error("invalid layout version '{0}': expected NN.NN")]
    InvalidLayoutVersion(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
