use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated: set --token or --user (STTS_AUTH__TOKEN / STTS_AUTH__USER_ID)")]
    NotAuthenticated,

    #[error("token expired at {0}")]
    TokenExpired(chrono::DateTime<chrono::Utc>),

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("missing claim: {0}")]
    MissingClaim(&'static str),
}
