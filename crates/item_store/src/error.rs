//! Classification of remote call outcomes into [`StoreError`].

use std::error::Error as _;

use reqwest::StatusCode;
use shared::error::StoreError;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RemoteSetupError {
    #[error("invalid item service url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("item service url '{0}' cannot address individual items")]
    CannotBeABase(String),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Classifies a failure that happened before a status line was received, or while
/// reading the response body.
pub(crate) fn classify_transport(url: &Url, err: reqwest::Error) -> StoreError {
    if err.is_connect() || err.is_timeout() {
        StoreError::Unreachable {
            url: url.to_string(),
            reason: innermost_cause(&err),
        }
    } else if err.is_decode() {
        StoreError::Unknown(format!(
            "malformed response body from {url}: {}",
            innermost_cause(&err)
        ))
    } else {
        StoreError::Unknown(format!("request to {url} failed: {}", innermost_cause(&err)))
    }
}

pub(crate) fn classify_status(url: &Url, status: StatusCode) -> StoreError {
    if status == StatusCode::NOT_FOUND {
        return StoreError::NotFound {
            url: url.to_string(),
        };
    }

    StoreError::ServerError {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
    }
}

// reqwest wraps the io/tls/dns error several layers deep; the last source is the
// message worth showing.
fn innermost_cause(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message = cause.to_string();
        source = cause.source();
    }
    message
}
