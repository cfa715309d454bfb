use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session token present")]
    MissingToken,

    #[error("malformed session token: {0}")]
    Malformed(String),

    #[error("unsupported token algorithm '{0}' (only HS256)")]
    UnsupportedAlgorithm(String),

    #[error("session token signature does not match")]
    InvalidSignature,

    #[error("session token expired; run `mq auth login`")]
    Expired,

    #[error("session token is missing the '{0}' claim")]
    MissingClaim(&'static str),

    #[error("token store error: {0}")]
    TokenStore(String),

    #[error("{0}")]
    Other(String),
}
