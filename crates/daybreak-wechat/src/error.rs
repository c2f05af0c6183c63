use thiserror::Error;

/// The credential exchange failed.
///
/// Fatal to a dispatch: no send can proceed without a token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token endpoint unreachable")]
    Unreachable,

    #[error("credential exchange rejected: {0}")]
    Rejected(String),
}

/// One recipient's send failed.
///
/// Captured by the send worker and folded into the aggregate count; never
/// thrown past the worker boundary.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("send request failed: {0}")]
    Transport(String),

    #[error("provider rejected message: {0}")]
    Rejected(String),
}
