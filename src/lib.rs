use std::time::Instant;

use tracing::{debug, info};

use crate::{
    dom::{
        dom_model::Document,
        snapshot::{PageSnapshot, apply_body},
    },
    error::DetectError,
    orchestrator::{
        orchestrator::Orchestrator,
        orchestrator_model::{NavigationEvent, PassOutcome},
    },
    screen::{
        extract::extract_form_fields,
        screen_model::{DetectionConfig, FieldDescriptor},
    },
    state::state_model::ContainerCache,
};

pub mod cli;
pub mod dom;
pub mod error;
pub mod message;
pub mod orchestrator;
pub mod report;
pub mod screen;
pub mod state;
pub mod trace;

/// Result of a single extraction pass.
#[derive(Debug, Clone)]
pub struct Detection {
    pub fields: Vec<FieldDescriptor>,
    /// Selector of the chosen primary container
    pub container: Option<String>,
}

/// One pass over a snapshot with fresh state: build the tree, pick the
/// container, describe its fields.
pub fn detect_snapshot(
    snapshot: &PageSnapshot,
    config: &DetectionConfig,
) -> Result<Detection, DetectError> {
    let doc = Document::from_snapshot(snapshot)?;
    let mut cache = ContainerCache::default();
    let fields = extract_form_fields(&doc, &mut cache, config)?;

    Ok(Detection {
        fields,
        container: cache.key().map(str::to_string),
    })
}

#[derive(Debug, Clone)]
pub struct ReplaySummary {
    pub passes: u64,
    pub finalized: bool,
    /// Fields of the last pass that ran
    pub fields: Vec<FieldDescriptor>,
}

/// Drive `orchestrator` through successive states of one page.
///
/// The first snapshot boots detection; every later one replaces the body
/// (a URL change is reported as a navigation first). After each step the
/// simulated clock advances one debounce window. The last snapshot is then
/// re-rendered `repeat_last` more times.
pub fn replay_snapshots(
    snapshots: &[PageSnapshot],
    repeat_last: usize,
    orchestrator: &mut Orchestrator,
) -> Result<ReplaySummary, DetectError> {
    let (first, rest) = snapshots
        .split_first()
        .ok_or_else(|| DetectError::InvalidDocument("no snapshots to replay".into()))?;

    let mut doc = Document::from_snapshot(first)?;
    let mut now = Instant::now();
    let debounce = orchestrator.config().debounce();

    let outcome = orchestrator.boot(&mut doc, now)?;
    let mut fields = outcome.fields().to_vec();

    let steps = rest
        .iter()
        .chain(std::iter::repeat_n(snapshots.last().unwrap_or(first), repeat_last));

    for (step, snapshot) in steps.enumerate() {
        if orchestrator.is_finalized() {
            break;
        }

        let navigated = !snapshot.url.is_empty() && snapshot.url != doc.url();
        doc.set_title(&snapshot.title);
        apply_body(&mut doc, &snapshot.body)?;

        if navigated {
            doc.set_url(&snapshot.url);
            orchestrator.on_navigation(&mut doc, NavigationEvent::PushState, now);
        } else if !orchestrator.on_mutations(&doc, now) {
            debug!(step, "no relevant mutation in step");
        }

        now += debounce;
        let outcome = orchestrator.poll(&doc, now)?;
        if outcome != PassOutcome::NotDue {
            fields = outcome.fields().to_vec();
        }
    }

    info!(
        passes = orchestrator.pass_count(),
        finalized = orchestrator.is_finalized(),
        "replay finished"
    );

    Ok(ReplaySummary {
        passes: orchestrator.pass_count(),
        finalized: orchestrator.is_finalized(),
        fields,
    })
}
