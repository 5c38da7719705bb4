mod subcommands;


use crate::config::{Config, get_config_path, load_config, save_config};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "react-agent")]
#[command(about = "Tool-calling assistant: weather lookups and client requests")]
#[command(version)]
pub struct Cli {
    /// Path to the config file (default: ~/.react-agent/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Ask a single question and print the answer
    Ask {
        #[arg(short, long)]
        message: String,
    },
    /// Interactive session; the conversation is kept between turns
    Chat,
    /// List the tools the current config registers
    Tools,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            init(config_path.map(PathBuf::from), force)?;
        }
        Commands::Ask { message } => {
            let config = load_config(config_path)?;
            subcommands::ask(&config, &message).await?;
        }
        Commands::Chat => {
            let config = load_config(config_path)?;
            subcommands::chat(&config).await?;
        }
        Commands::Tools => {
            let config = load_config(config_path)?;
            subcommands::list_tools(&config)?;
        }
    }

    Ok(())
}

fn init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match config_path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if path.exists() && !force {
        println!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    let written = save_config(&Config::default(), Some(path.as_path()))
        .with_context(|| format!("Failed to write default config to {}", path.display()))?;
    println!("\u{2713} Created config at {}", written.display());
    println!("  Set providers.openai.apiKey (or REACT_AGENT_OPENAI_API_KEY) before running.");
    Ok(())
}
