// ABOUTME: Concrete capability hosts
// ABOUTME: HttpHost talks to a local inference service; OfflineHost reports no AI support

mod http;

pub use http::HttpHost;

use crate::capability::{
    CapabilityHost, HostCapabilities, LanguageDetector, SummarizerOptions, Summarizer, Translator,
};
use crate::error::{CapabilityError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Host used when no service URL is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineHost;

#[async_trait]
impl CapabilityHost for OfflineHost {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn capabilities(&self) -> Result<HostCapabilities> {
        Err(CapabilityError::Unsupported)
    }

    async fn create_detector(&self) -> Result<Arc<dyn LanguageDetector>> {
        Err(CapabilityError::Unsupported)
    }

    async fn create_translator(&self, _source: &str, _target: &str) -> Result<Box<dyn Translator>> {
        Err(CapabilityError::Unsupported)
    }

    async fn create_summarizer(&self, _options: &SummarizerOptions) -> Result<Box<dyn Summarizer>> {
        Err(CapabilityError::Unsupported)
    }
}

/// Pick a host for `url`: HTTP when set, offline otherwise.
pub fn connect(url: Option<&str>, timeout: Duration) -> Result<Arc<dyn CapabilityHost>> {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => {
            tracing::debug!(url, "Using HTTP capability host");
            Ok(Arc::new(HttpHost::new(url, timeout)?))
        }
        None => {
            tracing::debug!("No host URL configured, running offline");
            Ok(Arc::new(OfflineHost))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{probe, Readiness, UNSUPPORTED_MESSAGE};

    #[tokio::test]
    async fn offline_host_probes_as_unsupported() {
        let report = probe(&OfflineHost).await;
        assert_eq!(report.readiness, Readiness::default());
        assert_eq!(report.errors, vec![UNSUPPORTED_MESSAGE.to_string()]);
    }

    #[test]
    fn connect_without_url_is_offline() {
        let host = connect(None, Duration::from_secs(1)).unwrap();
        assert_eq!(host.name(), "offline");
        let host = connect(Some("   "), Duration::from_secs(1)).unwrap();
        assert_eq!(host.name(), "offline");
    }

    #[test]
    fn connect_with_url_is_http() {
        let host = connect(Some("http://localhost:7070"), Duration::from_secs(1)).unwrap();
        assert_eq!(host.name(), "http");
    }

    #[test]
    fn connect_rejects_garbage_url() {
        assert!(matches!(
            connect(Some("not a url"), Duration::from_secs(1)),
            Err(CapabilityError::InvalidUrl(_))
        ));
    }
}
