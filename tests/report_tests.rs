use form_detection::detect_snapshot;
use form_detection::dom::snapshot::PageSnapshot;
use form_detection::report::console::format_field_report;
use form_detection::screen::screen_model::DetectionConfig;

mod common;
use common::fixture_path;

// ============================================================================
// Console reporter
// ============================================================================

#[test]
fn console_report_lists_every_field() {
    let snapshot = PageSnapshot::load(&fixture_path("signup.json")).expect("fixture");
    let detection = detect_snapshot(&snapshot, &DetectionConfig::default()).expect("detect");

    let report = format_field_report(&detection.fields, detection.container.as_deref());

    assert!(report.starts_with("=== Primary form: #apply (6 fields) ==="));
    assert!(report.contains("Full name *"));
    assert!(report.contains("#cover"));
    assert!(report.contains("placeholder: you@example.com"));
    assert!(report.contains("context: Preferred plan"));
    assert!(report.contains("context: Max 500 words"));
    assert!(report.trim_end().ends_with("=== 2 required, 4 optional ==="));
}

#[test]
fn console_report_marks_required_fields() {
    let snapshot = PageSnapshot::load(&fixture_path("signup.json")).expect("fixture");
    let detection = detect_snapshot(&snapshot, &DetectionConfig::default()).expect("detect");
    let report = format_field_report(&detection.fields, detection.container.as_deref());

    let email_line = report
        .lines()
        .find(|l| l.ends_with("#email"))
        .expect("email line");
    assert!(email_line.contains(" * "), "Required marker: {}", email_line);

    let cover_line = report
        .lines()
        .find(|l| l.ends_with("#cover"))
        .expect("cover line");
    assert!(!cover_line.contains(" * "), "Optional field: {}", cover_line);
}

#[test]
fn console_report_for_empty_page() {
    let report = format_field_report(&[], None);
    assert_eq!(report, "=== No form detected ===\n");
}
