#[allow(unused)]
pub use anyhow::{anyhow, bail, ensure, Error};

/// Every way a token can fail to be built, decoded or accepted.
///
/// The pipeline always wraps exactly one of these in the returned [`Error`];
/// use `err.downcast_ref::<JWTError>()` to branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JWTError {
    #[error("Malformed base64url segment")]
    MalformedSegment,
    #[error("Invalid JWT structure")]
    InvalidStructure,
    #[error("Invalid JWT header")]
    InvalidHeader,
    #[error("Invalid JWT body")]
    InvalidBody,
    #[error("JWT algorithm missing")]
    AlgorithmMissing,
    #[error("JWT algorithm not supported")]
    AlgorithmNotSupported,
    #[error("Signature didn't verify")]
    SignatureInvalid,
    #[error("Unable to sign with the supplied key")]
    SigningError,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token not valid yet")]
    TokenNotYetValid,
}

impl JWTError {
    /// Return the pipeline error carried by `err`, if any.
    pub fn of(err: &Error) -> Option<JWTError> {
        err.downcast_ref::<JWTError>().copied()
    }
}
