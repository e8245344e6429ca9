//! Binary entry point for `wecom-dify-bot`.
//!
//! This module provides the command-line interface with options for the
//! configuration file path, logging verbosity and span export. It initializes
//! logging, loads the configuration, and starts the service.

use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};
use wecom_dify_bot::base::{config::Config, types::Void};

/// wecom-dify-bot – answers WeCom group @-mentions with a Dify chat app.
///
/// Configuration can come from `config.yaml` / `config.toml` or `WECOM_BOT_*`
/// environment variables (use `__` between nested keys, e.g.
/// `WECOM_BOT_DIFY__API_KEY`).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the bot will look for `config.yaml` or `config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP (HTTP/protobuf).
    ///
    /// The collector endpoint is taken from the standard
    /// `OTEL_EXPORTER_OTLP_ENDPOINT` variable.
    #[arg(long)]
    otlp: bool,
}

/// Main entry point for the wecom-dify-bot binary.
///
/// Sets up logging based on verbosity, loads configuration, and starts the bot.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .build()
            .tracer("wecom-dify-bot");

        Some(tracing_opentelemetry::layer().with_tracer(tracer).boxed())
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    // A broken config is fatal before anything is served.
    let config = Config::load(args.config.as_deref())?;

    wecom_dify_bot::start(config).await
}
