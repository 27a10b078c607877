use std::path::Path;

use crate::dom::snapshot::PageSnapshot;
use crate::message::messages::FieldsMessage;
use crate::message::sink::{FieldSink, HttpSink, JsonLinesSink};
use crate::orchestrator::orchestrator::Orchestrator;
use crate::report::console::format_field_report;
use crate::screen::screen_model::DetectionConfig;
use crate::trace::logger::TraceLogger;
use crate::{detect_snapshot, replay_snapshots};

// ============================================================================
// detect subcommand
// ============================================================================

pub fn cmd_detect(
    snapshot_path: &str,
    format: &str,
    config: &DetectionConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = PageSnapshot::load(Path::new(snapshot_path))?;
    let detection = detect_snapshot(&snapshot, config)?;

    match format {
        "json" => {
            let message = FieldsMessage::ExtractFields(detection.fields);
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
        _ => print!(
            "{}",
            format_field_report(&detection.fields, detection.container.as_deref())
        ),
    }

    Ok(())
}

// ============================================================================
// watch subcommand
// ============================================================================

/// Replay snapshots through the orchestrator. Returns whether detection converged.
pub fn cmd_watch(
    snapshot_paths: &[String],
    endpoint: Option<&str>,
    trace: Option<&str>,
    repeat_last: usize,
    config: &DetectionConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let snapshots = snapshot_paths
        .iter()
        .map(|p| PageSnapshot::load(Path::new(p)))
        .collect::<Result<Vec<_>, _>>()?;

    let sink: Box<dyn FieldSink> = match endpoint {
        Some(url) => Box::new(HttpSink::new(url)),
        None => Box::new(JsonLinesSink::new(std::io::stdout())),
    };
    let tracer = match trace {
        Some(path) => TraceLogger::open(path)?,
        None => TraceLogger::disabled(),
    };

    let mut orchestrator = Orchestrator::new(config.clone(), sink).with_tracer(tracer);
    let summary = replay_snapshots(&snapshots, repeat_last, &mut orchestrator)?;

    if summary.finalized {
        eprintln!(
            "Converged after {} passes ({} fields)",
            summary.passes,
            summary.fields.len()
        );
    } else {
        eprintln!(
            "Not converged after {} passes ({} fields in last pass)",
            summary.passes,
            summary.fields.len()
        );
    }

    Ok(summary.finalized)
}
