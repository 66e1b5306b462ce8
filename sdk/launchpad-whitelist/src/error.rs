use thiserror::Error;

pub type Result<T> = std::result::Result<T, WhitelistError>;

/// Local validation failures. None of these are transient, so callers should
/// surface them to the operator instead of retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WhitelistError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("whitelist is empty")]
    EmptyWhitelist,

    #[error("leaf index {index} out of range for {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(&'static str),

    #[error("whitelist signature does not verify")]
    InvalidSignature,
}
