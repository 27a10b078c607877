use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{
    dom::{
        dom_model::Document,
        mutation::{MutationObserver, has_relevant_mutation},
    },
    error::DetectError,
    message::{messages::FieldsMessage, sink::FieldSink},
    orchestrator::{
        navigation::NavigationListener,
        orchestrator_model::{NavigationEvent, OrchestratorPhase, PassOutcome},
        scheduler::DebounceTimer,
    },
    screen::{
        extract::extract_form_fields,
        screen_model::{DetectionConfig, FieldDescriptor},
    },
    state::{
        signature::{fields_signature, is_stable_extraction, signature_fingerprint},
        state_model::ExtractionState,
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
};

/// Drives extraction for one document (or frame) until the field list converges.
///
/// Everything runs on the caller's thread. The only deferred work is the
/// debounce task, which the host advances with `poll`.
pub struct Orchestrator {
    config: DetectionConfig,
    state: ExtractionState,
    timer: DebounceTimer,
    observer: Option<MutationObserver>,
    running: bool,
    pass: u64,
    sink: Box<dyn FieldSink>,
    tracer: TraceLogger,
}

impl Orchestrator {
    pub fn new(config: DetectionConfig, sink: Box<dyn FieldSink>) -> Orchestrator {
        Orchestrator {
            timer: DebounceTimer::new(config.debounce()),
            config,
            state: ExtractionState::default(),
            observer: None,
            running: false,
            pass: 0,
            sink,
            tracer: TraceLogger::disabled(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Orchestrator {
        self.tracer = tracer;
        self
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn state(&self) -> &ExtractionState {
        &self.state
    }

    pub fn phase(&self) -> OrchestratorPhase {
        if self.state.finalized {
            OrchestratorPhase::Finalized
        } else if self.running {
            OrchestratorPhase::Running
        } else if self.timer.is_pending() {
            OrchestratorPhase::Scheduled
        } else {
            OrchestratorPhase::Idle
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.state.finalized
    }

    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    /// When the pending run becomes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Passes executed since construction (not reset by navigation).
    pub fn pass_count(&self) -> u64 {
        self.pass
    }

    /// First pass right away, then start watching for mutations.
    pub fn boot(&mut self, doc: &mut Document, _now: Instant) -> Result<PassOutcome, DetectError> {
        let outcome = self.run_extraction(doc, "boot")?;
        self.start_observer(doc);
        Ok(outcome)
    }

    /// Drain pending mutation records and debounce a run if any is relevant.
    ///
    /// Returns whether a run is now scheduled because of these records.
    pub fn on_mutations(&mut self, doc: &Document, now: Instant) -> bool {
        let Some(observer) = &self.observer else {
            return false;
        };
        let records = observer.take_records();

        if records.is_empty() || self.state.finalized {
            return false;
        }
        if !has_relevant_mutation(doc, &records) {
            return false;
        }

        self.schedule(now);
        true
    }

    /// Run the debounced pass if it is due.
    pub fn poll(&mut self, doc: &Document, now: Instant) -> Result<PassOutcome, DetectError> {
        if self.state.finalized || !self.timer.fire_if_due(now) {
            return Ok(PassOutcome::NotDue);
        }
        self.run_extraction(doc, "debounce")
    }

    /// Full reset, then observe afresh and schedule a run.
    pub fn on_navigation(&mut self, doc: &mut Document, event: NavigationEvent, now: Instant) {
        info!(?event, url = doc.url(), "navigation, resetting form detection");
        self.reset_detection_state();
        self.start_observer(doc);
        self.schedule(now);
    }

    /// Stop listening and drop any pending run. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.timer.cancel();
        self.stop_observer();
    }

    fn schedule(&mut self, now: Instant) {
        if self.state.finalized {
            return;
        }
        self.timer.arm(now);
    }

    fn start_observer(&mut self, doc: &mut Document) {
        if self.observer.is_some() || self.state.finalized {
            return;
        }
        let body = doc.body();
        self.observer = Some(doc.observe(body));
        debug!("mutation observer attached");
    }

    fn stop_observer(&mut self) {
        if self.observer.take().is_some() {
            debug!("mutation observer released");
        }
    }

    fn reset_detection_state(&mut self) {
        self.state.reset();
        self.timer.cancel();
        self.stop_observer();
    }

    /// Guards against re-entrant triggers while a pass is in flight.
    fn run_extraction(&mut self, doc: &Document, trigger: &str) -> Result<PassOutcome, DetectError> {
        if self.state.finalized || self.running {
            return Ok(PassOutcome::NotDue);
        }

        self.running = true;
        let outcome = self.evaluate_pass(doc, trigger);
        self.running = false;
        outcome
    }

    fn evaluate_pass(&mut self, doc: &Document, trigger: &str) -> Result<PassOutcome, DetectError> {
        let trace = TraceEvent::now(self.pass, trigger);
        self.pass += 1;

        let fields = extract_form_fields(doc, &mut self.state.container_cache, &self.config)?;
        let signature = fields_signature(&fields);

        let trace = trace
            .with_fields(fields.len())
            .with_container(self.state.container_cache.key())
            .with_signature(signature_fingerprint(&signature));

        if self.state.emitted_signature.as_deref() != Some(signature.as_str()) {
            if fields.is_empty() {
                info!("No fields detected yet.");
            } else {
                info!(count = fields.len(), "Detected fields");
            }
            self.state.emitted_signature = Some(signature.clone());
        }

        if !is_stable_extraction(&fields, self.config.min_stable_fields) {
            self.state.stable_signature = None;
            self.state.stable_passes = 0;
            self.tracer.log(&trace.with_decision("unstable"));
            return Ok(PassOutcome::Unstable(fields));
        }

        if self.state.stable_signature.as_deref() == Some(signature.as_str()) {
            self.state.stable_passes += 1;
        } else {
            self.state.stable_signature = Some(signature);
            self.state.stable_passes = 1;
        }

        let stable_passes = self.state.stable_passes;
        debug!(stable_passes, "stable extraction pass");

        if stable_passes >= self.config.required_stable_passes {
            let trace = trace.with_stable_passes(stable_passes);
            if let Err(e) = self.deliver(&fields) {
                // Still observing, so the next relevant mutation retries delivery.
                warn!(error = %e, "field delivery failed, detection keeps running");
                self.tracer.log(&trace.with_decision("delivery_failed"));
                return Err(e);
            }
            self.finalize(fields.len());
            self.tracer.log(&trace.with_decision("finalized"));
            return Ok(PassOutcome::Finalized(fields));
        }

        self.tracer
            .log(&trace.with_stable_passes(stable_passes).with_decision("converging"));
        Ok(PassOutcome::Converging {
            fields,
            stable_passes,
        })
    }

    fn deliver(&mut self, fields: &[FieldDescriptor]) -> Result<(), DetectError> {
        self.sink
            .deliver(&FieldsMessage::ExtractFields(fields.to_vec()))
    }

    fn finalize(&mut self, field_count: usize) {
        self.state.finalized = true;
        self.timer.cancel();
        self.stop_observer();
        info!(count = field_count, "form detection converged");
    }
}

impl NavigationListener for Orchestrator {
    fn navigated(&mut self, doc: &mut Document, event: NavigationEvent, now: Instant) {
        self.on_navigation(doc, event, now);
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.dispose();
    }
}
