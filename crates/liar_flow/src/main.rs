//! Liar Flow - CLI entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use liar_flow::{FlowConfig, GameFlowDriver, SkillClient};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let config = FlowConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Flow {
            base_url,
            seed,
            poll_attempts,
            poll_interval_ms,
            timeout_ms,
        } => {
            let mut config = config;
            if let Some(url) = base_url {
                config = config.with_base_url(url);
            }
            if let Some(attempts) = poll_attempts {
                config = config.with_poll_attempts(attempts);
            }
            if let Some(ms) = poll_interval_ms {
                config = config.with_poll_interval_ms(ms);
            }
            if let Some(ms) = timeout_ms {
                config = config.with_request_timeout_ms(ms);
            }
            run_flow(config, seed).await
        }
        Command::Skills {
            character,
            query,
            url_template,
            ignore_case,
        } => {
            let template = url_template.unwrap_or_else(|| config.skill_url_template().clone());
            run_skills(&config, template, &character, &query, ignore_case).await
        }
    }
}

/// Run the three-client game flow
#[instrument(skip_all, fields(base_url = %config.base_url()))]
async fn run_flow(config: FlowConfig, seed: Option<u64>) -> Result<()> {
    info!("Starting game flow");

    let mut driver = GameFlowDriver::new(config);
    if let Some(seed) = seed {
        driver = driver.with_seed(seed);
    }
    let report = driver.run().await?;

    info!(
        game_number = report.game_number(),
        liar = %report.liar(),
        winner = ?report.winner(),
        "Game flow finished"
    );
    Ok(())
}

/// Run the skill search and print each match
#[instrument(skip(config, template))]
async fn run_skills(
    config: &FlowConfig,
    template: String,
    character: &str,
    query: &str,
    ignore_case: bool,
) -> Result<()> {
    let client = SkillClient::new(template, config.request_timeout())?;
    let matches = client.find(character, query, ignore_case).await?;
    for m in &matches {
        println!("{}: {}", m.path, m.text);
    }
    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,liar_flow=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
