// ABOUTME: Error taxonomy for host capability calls.
// ABOUTME: Uses thiserror; every variant renders as a short user-facing reason.

use crate::capability::CapabilityKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The host exposes no AI surface at all.
    #[error("the host doesn't support AI capabilities")]
    Unsupported,

    #[error("{0} capability is not available")]
    Unavailable(CapabilityKind),

    #[error("request to capability host failed: {0}")]
    Request(String),

    #[error("capability host returned {status}: {body}")]
    Host { status: u16, body: String },

    #[error("failed to decode host response: {0}")]
    Decode(String),

    #[error("language detection returned no results")]
    EmptyDetection,

    #[error("invalid host URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, CapabilityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_names_the_capability() {
        let err = CapabilityError::Unavailable(CapabilityKind::Summarizer);
        assert_eq!(err.to_string(), "summarizer capability is not available");
    }

    #[test]
    fn host_error_includes_status_and_body() {
        let err = CapabilityError::Host {
            status: 503,
            body: "model loading".to_string(),
        };
        assert_eq!(err.to_string(), "capability host returned 503: model loading");
    }
}
