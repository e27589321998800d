//! stakevest: command-line entry point.

use anyhow::Context;
use clap::Parser;
use stakevest_node::{init_logging, Deployment, DeploymentConfig, LogFormat, Script, Simulation};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stakevest", about = "Staking rewards and token vesting engine")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file's value.
    #[arg(long, env = "STAKEVEST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Defaults to the config file's value.
    #[arg(long, env = "STAKEVEST_LOG_FORMAT")]
    log_format: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the default deployment configuration as TOML.
    Config,

    /// Replay a scenario script against a deployment.
    Simulate {
        /// Deployment configuration (TOML). Defaults are used when omitted.
        #[arg(long, env = "STAKEVEST_CONFIG")]
        config: Option<PathBuf>,

        /// Scenario script (TOML list of `[[step]]` tables).
        #[arg(long)]
        script: PathBuf,

        /// Print one JSON object per step instead of text lines.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Config => {
            let config = DeploymentConfig::default();
            print!("{}", config.to_toml_string()?);
        }
        Command::Simulate { config, script, json } => {
            let config = match config {
                Some(path) => DeploymentConfig::from_toml_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => DeploymentConfig::default(),
            };

            let format: LogFormat = cli
                .log_format
                .as_deref()
                .unwrap_or(&config.log_format)
                .parse()?;
            let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
            init_logging(format, level);

            let script = Script::from_toml_file(&script)
                .with_context(|| format!("loading script {}", script.display()))?;
            let deployment = Deployment::from_config(&config).context("building deployment")?;
            let mut simulation = Simulation::new(deployment);

            tracing::info!(
                steps = script.steps.len(),
                genesis = %config.genesis,
                "replaying scenario"
            );
            let reports = simulation.run(&script);
            let failed = reports.iter().filter(|r| !r.ok).count();

            for report in &reports {
                if json {
                    println!("{}", serde_json::to_string(report)?);
                } else {
                    println!("{report}");
                    for event in &report.events {
                        println!("        {}", serde_json::to_string(event)?);
                    }
                }
            }
            if !json {
                println!("{} steps, {} failed", reports.len(), failed);
            }
        }
    }

    Ok(())
}
