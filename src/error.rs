use thiserror::Error;

/// Errors raised while turning a mnemonic and path into a Sui key.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("{scheme} keys cannot use path {path}: {reason}")]
    UnsupportedPath {
        scheme: &'static str,
        path: String,
        reason: &'static str,
    },

    #[error("derived key is out of range for the curve")]
    InvalidDerivedKey,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

pub type Result<T> = std::result::Result<T, KeyError>;
