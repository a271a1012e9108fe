use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use daytona_computer::computer::actions::load_script;
use daytona_computer::{Action, AdapterConfig, Computer, DaytonaComputer};

#[derive(Parser)]
#[command(name = "daytona-computer", about = "Drive a browser inside a Daytona sandbox")]
enum Cli {
    /// Open the initial page in a fresh sandbox and save a screenshot
    Screenshot {
        /// Where to write the PNG
        #[arg(long)]
        out: PathBuf,
        /// Page to open instead of the configured initial URL
        #[arg(long)]
        url: Option<String>,
        /// YAML file with screen size, URLs and network settings
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run a YAML list of actions, saving a screenshot after each step
    Run {
        script: PathBuf,
        #[arg(long, default_value = "screenshots")]
        out_dir: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("daytona_computer=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(false),
        )
        .init();

    match Cli::parse() {
        Cli::Screenshot { out, url, config } => screenshot(&out, url, config.as_deref()).await,
        Cli::Run {
            script,
            out_dir,
            config,
        } => run_script(&script, &out_dir, config.as_deref()).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<AdapterConfig> {
    match path {
        Some(path) => AdapterConfig::load(path),
        None => Ok(AdapterConfig::default()),
    }
}

async fn screenshot(out: &Path, url: Option<String>, config: Option<&Path>) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(url) = url {
        config.initial_url = url;
    }

    let mut computer = DaytonaComputer::new(config);
    computer.start_session().await?;
    let result = computer.open_web_browser().await;
    computer.end_session().await;
    let state = result.context("failed to open initial page")?;

    std::fs::write(out, &state.screenshot)
        .with_context(|| format!("failed to write screenshot: {}", out.display()))?;

    tracing::info!(
        path = %out.display(),
        url = %state.url,
        bytes = state.screenshot.len(),
        "screenshot saved"
    );
    Ok(())
}

async fn run_script(script: &Path, out_dir: &Path, config: Option<&Path>) -> Result<()> {
    let actions = load_script(script)?;
    let config = load_config(config)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir: {}", out_dir.display()))?;

    tracing::info!(steps = actions.len(), script = %script.display(), "running action script");

    let mut computer = DaytonaComputer::new(config);
    computer.start_session().await?;
    let result = run_steps(&mut computer, &actions, out_dir).await;
    // Always release the sandbox, even when a step failed.
    computer.end_session().await;
    result
}

async fn run_steps(
    computer: &mut DaytonaComputer,
    actions: &[Action],
    out_dir: &Path,
) -> Result<()> {
    for (i, action) in actions.iter().enumerate() {
        let step = i + 1;
        let state = action
            .apply(computer)
            .await
            .with_context(|| format!("step {step} ({}) failed", action.name()))?;

        let path = out_dir.join(format!("step-{step:03}.png"));
        std::fs::write(&path, &state.screenshot)
            .with_context(|| format!("failed to write screenshot: {}", path.display()))?;

        tracing::info!(
            step,
            action = action.name(),
            url = %state.url,
            path = %path.display(),
            "step complete"
        );
    }
    Ok(())
}
