// ABOUTME: Doctor command implementation.
// ABOUTME: Probes the capability host and reports readiness of each capability.

use crate::state::config::Config;
use anyhow::Context;
use lingo_core::{probe, Availability, CapabilityKind, ProbeReport};

pub async fn run(config: &Config) -> anyhow::Result<()> {
    println!("Checking capability host...");
    match config.host.url.as_deref() {
        Some(url) => println!("Host: {} (timeout {}s)", url, config.host.timeout_secs),
        None => println!("Host: not configured (offline)"),
    }
    println!();

    let host = lingo_core::host::connect(config.host.url.as_deref(), config.host.timeout())
        .context("Failed to set up the capability host")?;
    let report = probe(host.as_ref()).await;
    print!("{}", format_report(&report));
    Ok(())
}

pub fn format_report(report: &ProbeReport) -> String {
    let mut out = String::new();
    for kind in CapabilityKind::ALL {
        let line = match report.readiness.get(kind) {
            Availability::Ready => format!("  ● {:<11} ready\n", kind.as_str()),
            Availability::Absent => format!("  ○ {:<11} not available\n", kind.as_str()),
            Availability::Error(reason) => format!("  ✗ {:<11} error: {}\n", kind.as_str(), reason),
        };
        out.push_str(&line);
    }
    if !report.errors.is_empty() {
        out.push('\n');
        for error in &report.errors {
            out.push_str(&format!("Error: {}\n", error));
        }
    }
    out
}
