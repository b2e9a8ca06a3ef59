pub mod commands;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::Database;

#[derive(Parser)]
#[command(name = "collapp")]
#[command(about = "Collapp CLI - database bootstrap and operator tasks for the Collapp API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply the schema and seed the default language and messages")]
    Bootstrap(commands::bootstrap::BootstrapArgs),

    #[command(about = "Administrator account management")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    // Same environment as the server, so both binaries target one database
    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;
    let db = Database::connect(&config.database).await?;

    let result = match cli.command {
        Commands::Bootstrap(args) => {
            commands::bootstrap::handle(&db, &config, args, output_format).await
        }
        Commands::Admin { cmd } => {
            commands::admin::handle(&db, &config, cmd, output_format).await
        }
    };

    db.close().await;
    result
}
