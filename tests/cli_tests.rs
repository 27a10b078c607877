use clap::Parser;
use form_detection::cli::commands::{cmd_detect, cmd_watch};
use form_detection::cli::config::{
    AppConfig, Cli, Commands, build_detection_config, load_config,
};
use form_detection::screen::screen_model::DetectionConfig;

mod common;
use common::fixture_path;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_detect_minimal() {
    let cli = Cli::parse_from(["form-detection", "detect", "--snapshot", "page.json"]);
    match cli.command {
        Commands::Detect { snapshot, format } => {
            assert_eq!(snapshot, "page.json");
            assert_eq!(format, "console");
        }
        _ => panic!("Expected Detect command"),
    }
    assert_eq!(cli.verbose, 0);
    assert_eq!(cli.config, None);
}

#[test]
fn cli_parse_watch_all_args() {
    let cli = Cli::parse_from([
        "form-detection",
        "-vv",
        "--config",
        "custom.yaml",
        "watch",
        "--snapshot",
        "a.json",
        "b.json",
        "--endpoint",
        "http://localhost:8080/fields",
        "--trace",
        "passes.jsonl",
        "--repeat-last",
        "3",
        "--debounce-ms",
        "50",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));

    match cli.command {
        Commands::Watch {
            snapshot,
            endpoint,
            trace,
            repeat_last,
            debounce_ms,
        } => {
            assert_eq!(snapshot, vec!["a.json", "b.json"]);
            assert_eq!(endpoint.as_deref(), Some("http://localhost:8080/fields"));
            assert_eq!(trace.as_deref(), Some("passes.jsonl"));
            assert_eq!(repeat_last, 3);
            assert_eq!(debounce_ms, Some(50));
        }
        _ => panic!("Expected Watch command"),
    }
}

#[test]
fn cli_parse_watch_defaults() {
    let cli = Cli::parse_from(["form-detection", "watch", "--snapshot", "a.json"]);
    match cli.command {
        Commands::Watch {
            endpoint,
            trace,
            repeat_last,
            debounce_ms,
            ..
        } => {
            assert_eq!(endpoint, None);
            assert_eq!(trace, None);
            assert_eq!(repeat_last, 1);
            assert_eq!(debounce_ms, None);
        }
        _ => panic!("Expected Watch command"),
    }
}

#[test]
fn cli_watch_requires_a_snapshot() {
    assert!(Cli::try_parse_from(["form-detection", "watch"]).is_err());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn load_config_missing_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/form-detection.yaml"));
    assert_eq!(config.detection, DetectionConfig::default());
    assert_eq!(config.output.endpoint, None);
    assert_eq!(config.output.trace, None);
}

#[test]
fn default_detection_thresholds() {
    let config = AppConfig::default().detection;
    assert_eq!(config.min_logical_fields, 3);
    assert_eq!(config.relaxed_min_logical_fields, 1);
    assert_eq!(config.max_ancestor_depth, 8);
    assert_eq!(config.debounce_ms, 150);
    assert_eq!(config.min_stable_fields, 3);
    assert_eq!(config.required_stable_passes, 2);
    assert_eq!(config.unlabeled_sentinel, "Unlabeled Field");
}

#[test]
fn load_config_partial_yaml_keeps_other_defaults() {
    let dir = std::env::temp_dir().join("form_detection_cli_test");
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("partial.yaml");
    std::fs::write(
        &path,
        "detection:\n  debounce_ms: 300\n  unlabeled_sentinel: \"(no label)\"\noutput:\n  trace: passes.jsonl\n",
    )
    .expect("write config");

    let config = load_config(path.to_str());
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.detection.debounce_ms, 300);
    assert_eq!(config.detection.unlabeled_sentinel, "(no label)");
    assert_eq!(config.detection.min_logical_fields, 3);
    assert_eq!(config.output.trace.as_deref(), Some("passes.jsonl"));
    assert_eq!(config.output.endpoint, None);
}

#[test]
fn load_config_malformed_yaml_gives_defaults() {
    let dir = std::env::temp_dir().join("form_detection_cli_test");
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("malformed.yaml");
    std::fs::write(&path, "detection: [not, a, map").expect("write config");

    let config = load_config(path.to_str());
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.detection, DetectionConfig::default());
}

#[test]
fn debounce_override_from_cli() {
    let base = DetectionConfig::default();

    let overridden = build_detection_config(&base, Some(20));
    assert_eq!(overridden.debounce_ms, 20);
    assert_eq!(overridden.debounce(), std::time::Duration::from_millis(20));
    assert_eq!(overridden.min_stable_fields, base.min_stable_fields);

    assert_eq!(build_detection_config(&base, None), base);
}

// ============================================================================
// Command Tests
// ============================================================================

#[test]
fn detect_command_runs_on_fixture() {
    let path = fixture_path("signup.json");
    let config = DetectionConfig::default();

    assert!(cmd_detect(path.to_str().expect("utf-8"), "json", &config).is_ok());
    assert!(cmd_detect(path.to_str().expect("utf-8"), "console", &config).is_ok());
}

#[test]
fn detect_command_reports_missing_file() {
    let config = DetectionConfig::default();
    assert!(cmd_detect("/nonexistent/page.json", "console", &config).is_err());
}

#[test]
fn watch_command_reports_convergence() {
    let paths = vec![
        fixture_path("loading.json").display().to_string(),
        fixture_path("signup.json").display().to_string(),
    ];
    let config = DetectionConfig::default();

    assert!(cmd_watch(&paths, None, None, 1, &config).expect("watch"));
    assert!(!cmd_watch(&paths, None, None, 0, &config).expect("watch"));
}
