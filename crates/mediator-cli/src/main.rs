//! Audio Commons mediator command line.
//!
//! Runs canonical text searches against the bundled providers and prints the
//! unified envelope as JSON.

mod config;

use std::sync::Arc;

use ac_mediator::filter::build_filter_string;
use ac_mediator::{HttpTransport, Mediator};
use anyhow::Context;
use clap::Parser;
use tracing::info;

use config::{CliConfig, Command, Provider, SearchArgs};

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("ac_mediator={},ac_mediator_cli={}", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    match &config.command {
        Command::Search(args) => search(&config, args).await,
        Command::Describe { provider } => describe(*provider),
        Command::RenderFilter { provider, filter } => render_filter(*provider, filter),
    }
}

async fn search(config: &CliConfig, args: &SearchArgs) -> anyhow::Result<()> {
    let mediator_config = config.mediator_config();
    let transport = HttpTransport::new(mediator_config.transport.clone())
        .context("Failed to create HTTP transport")?;
    let mediator = Mediator::new(Arc::new(transport), Arc::new(mediator_config.credentials()));

    let adapter = args.provider.adapter();
    let request = args.to_request(config.default_page_size);
    info!(provider = %args.provider, query = %request.query, "Starting text search");

    let envelope = mediator
        .text_search(adapter.as_ref(), &request)
        .await
        .with_context(|| format!("{} search failed", args.provider))?;

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn describe(provider: Provider) -> anyhow::Result<()> {
    let capabilities = ac_mediator::capabilities::describe_capabilities(provider.adapter().as_ref());
    println!("{}", serde_json::to_string_pretty(&capabilities)?);
    Ok(())
}

fn render_filter(provider: Provider, filter: &str) -> anyhow::Result<()> {
    let adapter = provider.adapter();
    let translator = adapter
        .filtering()
        .with_context(|| format!("{} does not support filtering", provider))?;
    let rendered = build_filter_string(translator, filter)?;
    println!("{}", serde_json::to_string_pretty(&translator.filter_params(rendered))?);
    Ok(())
}
