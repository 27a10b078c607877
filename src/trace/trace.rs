use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One line of the JSONL pass trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub pass: u64,

    /// What started the pass: `boot` or `debounce`.
    pub trigger: String,

    pub field_count: usize,
    pub container: Option<String>,
    pub signature: Option<String>,
    pub stable_passes: u32,

    pub decision: Option<String>,
}

impl TraceEvent {
    pub fn now(pass: u64, trigger: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            pass,
            trigger: trigger.to_string(),
            field_count: 0,
            container: None,
            signature: None,
            stable_passes: 0,
            decision: None,
        }
    }

    pub fn with_fields(mut self, count: usize) -> Self {
        self.field_count = count;
        self
    }

    pub fn with_container(mut self, selector: Option<&str>) -> Self {
        self.container = selector.map(str::to_string);
        self
    }

    /// Records the sha1 fingerprint, not the full signature.
    pub fn with_signature(mut self, fingerprint: impl ToString) -> Self {
        self.signature = Some(fingerprint.to_string());
        self
    }

    pub fn with_stable_passes(mut self, passes: u32) -> Self {
        self.stable_passes = passes;
        self
    }

    pub fn with_decision(mut self, decision: impl ToString) -> Self {
        self.decision = Some(decision.to_string());
        self
    }
}
