use clap::Parser;
use form_detection::cli::commands::{cmd_detect, cmd_watch};
use form_detection::cli::config::{Cli, Commands, build_detection_config, load_config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Detect { snapshot, format } => {
            cmd_detect(&snapshot, &format, &config.detection)?;
        }
        Commands::Watch {
            snapshot,
            endpoint,
            trace,
            repeat_last,
            debounce_ms,
        } => {
            // CLI > config file
            let endpoint = endpoint.or(config.output.endpoint.clone());
            let trace = trace.or(config.output.trace.clone());
            let detection = build_detection_config(&config.detection, debounce_ms);

            cmd_watch(
                &snapshot,
                endpoint.as_deref(),
                trace.as_deref(),
                repeat_last,
                &detection,
            )?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("form_detection={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
