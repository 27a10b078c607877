use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

use tracing::{debug, warn};

use crate::error::DetectError;
use crate::trace::trace::TraceEvent;

/// Per-pass JSONL trace. Disabled unless a trace file was opened.
pub struct TraceLogger {
    out: Option<BufWriter<File>>,
}

impl TraceLogger {
    /// Opens `path` for appending. An unwritable path is the caller's error.
    pub fn open(path: &str) -> Result<Self, DetectError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| DetectError::TraceOpen {
                path: path.to_string(),
                source,
            })?;

        Ok(Self {
            out: Some(BufWriter::new(file)),
        })
    }

    pub fn disabled() -> Self {
        Self { out: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.out.is_some()
    }

    /// Writes one line and flushes it. After a write error the trace is turned off.
    pub fn log(&mut self, event: &TraceEvent) {
        debug!(
            pass = event.pass,
            trigger = %event.trigger,
            decision = event.decision.as_deref().unwrap_or("-"),
            "pass traced"
        );

        let Some(out) = self.out.as_mut() else {
            return;
        };

        let written = serde_json::to_writer(&mut *out, event)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(out))
            .and_then(|_| out.flush());

        if let Err(e) = written {
            warn!(error = %e, "failed to write trace event, pass tracing disabled");
            self.out = None;
        }
    }
}
