// ABOUTME: Runs capability commands as tokio tasks keyed by (message, capability).
// ABOUTME: Results flow back over a channel; stale results from cancelled tasks are dropped.

use crate::capability::{CapabilityHost, CapabilityKind, Detection, LanguageDetector};
use crate::error::{CapabilityError, Result};
use crate::message::MessageId;
use crate::probe::{ProbeReport, Readiness};
use crate::state::{Command, Update};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub message: MessageId,
    pub capability: CapabilityKind,
}

/// A finished task's update, tagged so the dispatcher can tell current tasks from stale ones
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub key: TaskKey,
    pub generation: u64,
    pub update: Update,
}

struct Task {
    generation: u64,
    handle: JoinHandle<()>,
}

pub struct Dispatcher {
    host: Arc<dyn CapabilityHost>,
    detector: Option<Arc<dyn LanguageDetector>>,
    readiness: Readiness,
    tx: UnboundedSender<Completion>,
    tasks: HashMap<TaskKey, Task>,
    next_generation: u64,
}

impl Dispatcher {
    pub fn new(
        host: Arc<dyn CapabilityHost>,
        report: &ProbeReport,
        tx: UnboundedSender<Completion>,
    ) -> Self {
        Self {
            host,
            detector: report.detector.clone(),
            readiness: report.readiness.clone(),
            tx,
            tasks: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Number of tasks whose completion hasn't been accepted yet
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_running(&self, key: TaskKey) -> bool {
        self.tasks.contains_key(&key)
    }

    /// Spawn a task for `command`. Must be called inside a tokio runtime.
    pub fn dispatch(&mut self, command: Command) {
        let key = command.key();
        self.next_generation += 1;
        let generation = self.next_generation;

        if let Some(previous) = self.tasks.remove(&key) {
            tracing::warn!(message = %key.message, capability = %key.capability, "Replacing in-flight task");
            previous.handle.abort();
        }

        let host = self.host.clone();
        let detector = self.detector.clone();
        let ready = self.readiness.is_ready(key.capability);
        let tx = self.tx.clone();

        tracing::debug!(message = %key.message, capability = %key.capability, "Dispatching");
        let handle = tokio::spawn(async move {
            let update = run(host, detector, ready, command).await;
            if tx
                .send(Completion {
                    key,
                    generation,
                    update,
                })
                .is_err()
            {
                tracing::debug!(message = %key.message, "Completion receiver dropped");
            }
        });

        self.tasks.insert(key, Task { generation, handle });
    }

    /// Accept a completion from the channel. Returns the update to apply, or `None` if stale.
    pub fn accept(&mut self, completion: Completion) -> Option<Update> {
        match self.tasks.get(&completion.key) {
            Some(task) if task.generation == completion.generation => {
                self.tasks.remove(&completion.key);
                Some(completion.update)
            }
            _ => {
                tracing::debug!(
                    message = %completion.key.message,
                    capability = %completion.key.capability,
                    "Dropping stale completion"
                );
                None
            }
        }
    }

    /// Abort one task. Returns the transition that clears its in-flight flag.
    pub fn cancel(&mut self, key: TaskKey) -> Option<Update> {
        let task = self.tasks.remove(&key)?;
        task.handle.abort();
        tracing::info!(message = %key.message, capability = %key.capability, "Cancelled");
        Some(Update::Cancelled {
            id: key.message,
            capability: key.capability,
        })
    }

    /// Abort every task belonging to `id`.
    pub fn cancel_message(&mut self, id: MessageId) -> Vec<Update> {
        CapabilityKind::ALL
            .iter()
            .filter_map(|&capability| {
                self.cancel(TaskKey {
                    message: id,
                    capability,
                })
            })
            .collect()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.handle.abort();
        }
    }
}

async fn run(
    host: Arc<dyn CapabilityHost>,
    detector: Option<Arc<dyn LanguageDetector>>,
    ready: bool,
    command: Command,
) -> Update {
    match command {
        Command::Detect { id, text } => match detect(detector, &text).await {
            Ok(detection) => Update::Detected { id, detection },
            Err(e) => Update::DetectionFailed {
                id,
                reason: e.to_string(),
            },
        },
        Command::Summarize { id, text, options } => {
            let result = if ready {
                summarize(host.as_ref(), &text, &options).await
            } else {
                Err(CapabilityError::Unavailable(CapabilityKind::Summarizer))
            };
            match result {
                Ok(summary) => Update::Summarized { id, summary },
                Err(e) => Update::SummaryFailed {
                    id,
                    reason: e.to_string(),
                },
            }
        }
        Command::Translate {
            id,
            text,
            source,
            target,
        } => {
            let result = if ready {
                translate(host.as_ref(), &text, &source, &target).await
            } else {
                Err(CapabilityError::Unavailable(CapabilityKind::Translator))
            };
            match result {
                Ok(translation) => Update::Translated {
                    id,
                    target,
                    translation,
                },
                Err(e) => Update::TranslationFailed {
                    id,
                    target,
                    reason: e.to_string(),
                },
            }
        }
    }
}

async fn detect(detector: Option<Arc<dyn LanguageDetector>>, text: &str) -> Result<Detection> {
    let detector = detector.ok_or(CapabilityError::Unavailable(CapabilityKind::Detector))?;
    detector
        .detect(text)
        .await?
        .into_iter()
        .next()
        .ok_or(CapabilityError::EmptyDetection)
}

async fn summarize(
    host: &dyn CapabilityHost,
    text: &str,
    options: &crate::capability::SummarizerOptions,
) -> Result<String> {
    let summarizer = host.create_summarizer(options).await?;
    summarizer.summarize(text).await
}

async fn translate(host: &dyn CapabilityHost, text: &str, source: &str, target: &str) -> Result<String> {
    let translator = host.create_translator(source, target).await?;
    translator.translate(text).await
}
