// ABOUTME: Startup probe of the host's AI capabilities.
// ABOUTME: Each capability degrades independently; only the detector is pre-instantiated.

use crate::capability::{Availability, CapabilityHost, CapabilityKind, LanguageDetector};
use crate::error::CapabilityError;
use std::sync::Arc;

/// Shown once when the host exposes no AI surface at all.
pub const UNSUPPORTED_MESSAGE: &str =
    "The capability host doesn't support AI capabilities. Set [host] url in the config and make sure the service is running.";

/// Availability of each capability
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readiness {
    pub detector: Availability,
    pub translator: Availability,
    pub summarizer: Availability,
}

impl Readiness {
    /// Everything ready; convenient for tests and fully featured hosts
    pub fn all_ready() -> Self {
        Self {
            detector: Availability::Ready,
            translator: Availability::Ready,
            summarizer: Availability::Ready,
        }
    }

    pub fn get(&self, kind: CapabilityKind) -> &Availability {
        match kind {
            CapabilityKind::Detector => &self.detector,
            CapabilityKind::Translator => &self.translator,
            CapabilityKind::Summarizer => &self.summarizer,
        }
    }

    pub fn is_ready(&self, kind: CapabilityKind) -> bool {
        self.get(kind).is_ready()
    }
}

pub struct ProbeReport {
    pub readiness: Readiness,
    /// Present only when the detector is ready
    pub detector: Option<Arc<dyn LanguageDetector>>,
    /// Errors to surface to the user, in the order they were found
    pub errors: Vec<String>,
}

impl std::fmt::Debug for ProbeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeReport")
            .field("readiness", &self.readiness)
            .field("detector", &self.detector.is_some())
            .field("errors", &self.errors)
            .finish()
    }
}

/// Ask the host which capabilities it has and instantiate the detector.
pub async fn probe(host: &dyn CapabilityHost) -> ProbeReport {
    let caps = match host.capabilities().await {
        Ok(caps) => caps,
        Err(e) => {
            tracing::warn!(host = host.name(), error = %e, "Host lacks AI support");
            let message = match e {
                CapabilityError::Unsupported => UNSUPPORTED_MESSAGE.to_string(),
                other => format!("{} ({})", UNSUPPORTED_MESSAGE, other),
            };
            return ProbeReport {
                readiness: Readiness::default(),
                detector: None,
                errors: vec![message],
            };
        }
    };

    let mut readiness = Readiness::default();
    let mut errors = Vec::new();
    let mut detector = None;

    if caps.detector {
        match host.create_detector().await {
            Ok(instance) => {
                detector = Some(instance);
                readiness.detector = Availability::Ready;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create language detector");
                errors.push(format!("Error initializing language detector: {}", e));
                readiness.detector = Availability::Error(e.to_string());
            }
        }
    }
    if caps.translator {
        readiness.translator = Availability::Ready;
    }
    if caps.summarizer {
        readiness.summarizer = Availability::Ready;
    }

    tracing::info!(
        host = host.name(),
        detector = ?readiness.detector,
        translator = ?readiness.translator,
        summarizer = ?readiness.summarizer,
        "Probed AI capabilities"
    );

    ProbeReport {
        readiness,
        detector,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    #[tokio::test]
    async fn all_capabilities_ready() {
        let host = FakeHost::new();
        let report = probe(&host).await;
        assert_eq!(report.readiness, Readiness::all_ready());
        assert!(report.detector.is_some());
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn partial_availability_is_not_an_error() {
        let host = FakeHost::new().without(CapabilityKind::Summarizer);
        let report = probe(&host).await;
        assert!(report.readiness.detector.is_ready());
        assert!(report.readiness.translator.is_ready());
        assert_eq!(report.readiness.summarizer, Availability::Absent);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn unsupported_host_surfaces_one_error_and_no_flags() {
        let host = FakeHost::unsupported();
        let report = probe(&host).await;
        assert_eq!(report.readiness, Readiness::default());
        assert!(report.detector.is_none());
        assert_eq!(report.errors, vec![UNSUPPORTED_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn detector_creation_failure_does_not_hide_other_capabilities() {
        let host = FakeHost::new().failing_detector_creation();
        let report = probe(&host).await;
        assert!(matches!(report.readiness.detector, Availability::Error(_)));
        assert!(report.detector.is_none());
        assert!(report.readiness.translator.is_ready());
        assert!(report.readiness.summarizer.is_ready());
        assert_eq!(report.errors.len(), 1);
    }
}
