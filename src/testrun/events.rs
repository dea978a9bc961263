//! `go test -json` event stream.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// Action carried by a test event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Run,
    Pause,
    Cont,
    Pass,
    Bench,
    Fail,
    Output,
    Skip,
    #[serde(other)]
    Other,
}

/// One line of `go test -json` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub action: Action,
    #[serde(default)]
    pub package: String,
    /// Full test name, `/`-separated for subtests. Absent for package events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    /// Seconds, present on terminal actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Read newline-delimited events, skipping blank lines.
pub fn read_json(input: &mut dyn BufRead) -> Result<Vec<TestEvent>> {
    let mut events = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|source| Error::Json {
            line: idx + 1,
            source,
        })?;
        events.push(event);
    }
    log::debug!("Read {} test events", events.len());
    Ok(events)
}
