use clap::Parser;
use miette::{IntoDiagnostic, Result};
use railgrab::application::engine::AcquisitionEngine;
use railgrab::domain::order::OrderStatus;
use railgrab::infrastructure::in_memory::MemoryStatusSink;
use railgrab::infrastructure::scripted::ScriptedBookingClient;
use railgrab::interfaces::config::RunConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs one seat-acquisition attempt against the scripted booking service
/// described by the configuration's rehearsal fixture.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run configuration (JSON)
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = RunConfig::load(&cli.config).into_diagnostic()?;

    let client = ScriptedBookingClient::new();
    for tick in &config.rehearsal.ticks {
        match &tick.fail {
            Some(message) => client.push_query_failure(message).await,
            None => client.push_rows(tick.rows.clone()).await,
        }
    }
    if config.rehearsal.verification_required {
        client.require_verification().await;
    }

    let sink = MemoryStatusSink::new();
    let engine = AcquisitionEngine::new(
        Box::new(client.clone()),
        Box::new(sink.clone()),
        config.to_input(),
    );

    let input = engine.input();
    if let (Some(origin), Some(destination)) = (&input.origin, &input.destination) {
        info!("attempting {} -> {}", origin.name, destination.name);
    }

    engine.start().await.into_diagnostic()?;

    if engine.order().await.status == OrderStatus::ReadCheckCode {
        match &config.rehearsal.verification_code {
            Some(code) => {
                info!("rehearsal supplies verification code {code}");
                engine.supply_verification_code(code).await.into_diagnostic()?;
            }
            None => info!("verification code required but none scripted; order left pending"),
        }
    }

    let order = engine.order().await;
    println!("final status: {}", order.status);
    if let Some(train) = &order.train {
        println!("matched train: {}", train.name);
    }
    println!(
        "transitions: {}",
        sink.statuses()
            .await
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    Ok(())
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
