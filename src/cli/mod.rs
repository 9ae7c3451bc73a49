pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "notes-api")]
#[command(about = "Notes API - personal notes service with bearer token auth")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, help = "Listen port (overrides PORT)")]
        port: Option<u16>,
        #[arg(long, help = "Use the in-memory store instead of PostgreSQL")]
        memory: bool,
    },

    #[command(about = "Insert sample users and notes into the database")]
    Seed,

    #[command(about = "Issue a bearer token for an existing user id")]
    Token {
        #[arg(long, help = "User id placed in the token claims")]
        user_id: i64,
        #[arg(long, help = "Email placed in the token claims")]
        email: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
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
    let config = crate::config::AppConfig::from_env();

    match cli.command {
        Commands::Serve { port, memory } => commands::serve::handle(config, port, memory).await,
        Commands::Seed => commands::seed::handle(config, output_format).await,
        Commands::Token { user_id, email } => commands::token::handle(&config, user_id, &email, output_format),
    }
}
