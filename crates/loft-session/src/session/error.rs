use thiserror::Error;

use crate::api::ApiError;

/// Failure of a session operation.
///
/// The variants separate "nothing changed" rejections from the two cases
/// with committed local effects: a stale key (rolled back to signed-out)
/// and a refresh failure (key committed and kept).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend rejected the request; no local state was touched. The
    /// underlying message is user-displayable as-is.
    #[error(transparent)]
    Rejected(#[from] ApiError),

    /// A stored key failed re-validation. The session has already been
    /// cleared by the time the caller sees this.
    #[error("Session key is no longer valid: {0}")]
    StaleKey(#[source] ApiError),

    /// The key was committed, but a dependent module refresh failed. The
    /// session itself is valid and stays in place.
    #[error("Refresh failed after sign-in: {0}")]
    Refresh(anyhow::Error),

    /// The operation needs an active session.
    #[error("Not signed in")]
    NotAuthenticated,

    /// The backend answered with something that does not decode.
    #[error("Malformed server response: {0}")]
    Malformed(#[from] serde_json::Error),
}
