//! `gen-bot` executable.
//!
//! Reads `.env`, installs stdout and OTLP tracing, loads the config and
//! hands over to [`gen_bot::start`], which serves Slack until shutdown.

use clap::Parser;
use gen_bot::base::{config::Config, types::Void};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Answers Slack @-mentions with OpenAI completions and draws images for `/gen_image`.
///
/// Settings are read from a TOML file and overridden by environment variables
/// such as `SLACK_BOT_TOKEN` or `OPENAI_API_KEY` (a local `.env` is honored).
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// TOML config file; `.hidden/config.toml` is used when present and this is omitted.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Log verbosity: INFO by default, `-v` for DEBUG, `-vv` for TRACE.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // A missing `.env` is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    init_tracing(args.verbose)?;

    let config = Config::load(args.config.as_deref())?;

    gen_bot::start(config).await
}

/// Installs the stdout and OTLP layers behind a level filter.
fn init_tracing(verbose: u8) -> Void {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Spans go to the OTLP/HTTP collector named by the standard `OTEL_EXPORTER_OTLP_*` variables.
    let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
    let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("gen-bot");
    let otel = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(otel)
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .with(stdout)
        .init();

    Ok(())
}
