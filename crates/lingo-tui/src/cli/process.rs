// ABOUTME: Non-interactive process command.
// ABOUTME: Sends one text through detection, then optional summary and translations.

use crate::error::AppError;
use crate::state::config::{available_targets, Config};
use anyhow::Context;
use lingo_core::language::target_index;
use lingo_core::{
    probe, AppState, CapabilityHost, Completion, Dispatcher, Message, ProcessingSettings,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// What the user asked for beyond detection
#[derive(Debug, Clone, Default)]
pub struct ProcessRequest {
    pub text: String,
    pub translate: Vec<String>,
    pub summarize: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutcome {
    pub message: Message,
    /// Display names of the translation targets, from the same resolver the TUI uses
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub language_names: BTreeMap<String, String>,
    /// Steps that were requested but not offered for this message
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

pub async fn run(
    config: &Config,
    text: &str,
    translate: Vec<String>,
    summarize: bool,
    json: bool,
) -> anyhow::Result<()> {
    let host = lingo_core::host::connect(config.host.url.as_deref(), config.host.timeout())
        .context("Failed to set up the capability host")?;

    let request = ProcessRequest {
        text: text.to_string(),
        translate,
        summarize,
    };
    let outcome = process(host, config.settings(), &request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", format_outcome(&outcome));
        for error in &outcome.errors {
            eprintln!("Error: {}", error);
        }
    }
    Ok(())
}

/// Run the same pipeline the TUI drives, one step at a time.
pub async fn process(
    host: Arc<dyn CapabilityHost>,
    settings: ProcessingSettings,
    request: &ProcessRequest,
) -> anyhow::Result<ProcessOutcome> {
    for code in &request.translate {
        if target_index(code).is_none() {
            return Err(AppError::UnknownLanguage {
                code: code.clone(),
                available: available_targets(),
            }
            .into());
        }
    }

    let report = probe(host.as_ref()).await;
    let mut state = AppState::from_probe(&report, settings);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut dispatcher = Dispatcher::new(host, &report, tx);
    let mut skipped = vec![];

    let outcome = state
        .send(&request.text)
        .context("Nothing to process: the text is empty")?;
    let id = outcome.id;
    if let Some(command) = outcome.command {
        dispatcher.dispatch(command);
        drain(&mut state, &mut dispatcher, &mut rx).await;
    } else {
        skipped.push("language detection (detector not ready)".to_string());
    }

    if request.summarize {
        let command = if state.can_summarize(id) {
            state.request_summary(id)
        } else {
            None
        };
        match command {
            Some(command) => {
                dispatcher.dispatch(command);
                drain(&mut state, &mut dispatcher, &mut rx).await;
            }
            None => skipped.push(format!(
                "summary (needs a ready summarizer and '{}' text longer than {} characters)",
                state.settings().summary_language,
                state.settings().summary_min_length
            )),
        }
    }

    for target in &request.translate {
        if !state.can_translate() {
            skipped.push(format!("translation to {} (translator not ready)", target));
            continue;
        }
        if let Some(command) = state.request_translation(id, target) {
            dispatcher.dispatch(command);
            drain(&mut state, &mut dispatcher, &mut rx).await;
        }
    }

    let message = state
        .message(id)
        .cloned()
        .context("Message disappeared while processing")?;
    let language_names = message
        .translations
        .keys()
        .map(|code| (code.clone(), state.language_name(code)))
        .collect();
    Ok(ProcessOutcome {
        message,
        language_names,
        skipped,
        errors: state.errors().map(|e| e.message.clone()).collect(),
    })
}

/// Apply completions until nothing is in flight.
async fn drain(
    state: &mut AppState,
    dispatcher: &mut Dispatcher,
    rx: &mut UnboundedReceiver<Completion>,
) {
    while dispatcher.in_flight() > 0 {
        let Some(completion) = rx.recv().await else {
            break;
        };
        if let Some(update) = dispatcher.accept(completion) {
            state.apply(update);
        }
    }
}

/// Human-readable rendering of a processed message
pub fn format_outcome(outcome: &ProcessOutcome) -> String {
    let msg = &outcome.message;
    let mut out = format!("{}\n", msg.text);

    if let Some(label) = msg.confidence_label() {
        out.push_str(&format!("{}\n", label));
    }
    if let Some(summary) = &msg.summary {
        out.push_str(&format!("\nSummary:\n{}\n", summary));
    }
    for (code, text) in &msg.translations {
        let name = outcome.language_names.get(code).unwrap_or(code);
        out.push_str(&format!("\nTranslated to {}:\n{}\n", name, text));
    }
    if msg.summary_error {
        out.push_str("\nFailed to summarize. Please try again.\n");
    }
    if msg.translation_error {
        out.push_str("\nFailed to translate. Please try again.\n");
    }
    for step in &outcome.skipped {
        out.push_str(&format!("\nSkipped {}\n", step));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::MessageId;

    #[test]
    fn translation_headings_use_resolved_names() {
        let mut message = Message::new(MessageId(1), "Hello".to_string());
        message
            .translations
            .insert("es".to_string(), "Hola".to_string());
        message
            .translations
            .insert("xx".to_string(), "???".to_string());
        let outcome = ProcessOutcome {
            message,
            language_names: BTreeMap::from([("es".to_string(), "Español".to_string())]),
            skipped: vec![],
            errors: vec![],
        };

        let text = format_outcome(&outcome);
        assert!(text.contains("\nTranslated to Español:\nHola\n"));
        assert!(text.contains("\nTranslated to xx:\n???\n"));
    }
}
