use thiserror::Error;

/// Outcome of a failed round trip to the remote item resource.
///
/// Classified exactly once, where the outcome of the remote call is known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("item service unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },
    #[error("item resource not found: {url}")]
    NotFound { url: String },
    #[error("server error: {status} {status_text}")]
    ServerError { status: u16, status_text: String },
    #[error("unexpected item service failure: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Unreachable,
    NotFound,
    ServerError,
    Unknown,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Unreachable { .. } => StoreErrorKind::Unreachable,
            StoreError::NotFound { .. } => StoreErrorKind::NotFound,
            StoreError::ServerError { .. } => StoreErrorKind::ServerError,
            StoreError::Unknown(_) => StoreErrorKind::Unknown,
        }
    }

    /// Actionable guidance for connection failures; `None` for every other kind.
    pub fn hint(&self) -> Option<String> {
        match self {
            StoreError::Unreachable { url, .. } => Some(format!(
                "verify the item service at {url} is running and, for https, that its certificate is trusted"
            )),
            _ => None,
        }
    }
}
