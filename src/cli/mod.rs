pub mod commands;
pub mod context;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::cli::context::CliContext;

#[derive(Parser)]
#[command(name = "ahadi")]
#[command(about = "Ahadi CLI - Command-line client for the Ahadi events API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API base URL (overrides API_BASE_URL)")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse and manage events")]
    Events {
        #[command(subcommand)]
        cmd: commands::events::EventsCommands,
    },

    #[command(about = "Event type catalogue")]
    EventTypes {
        #[command(subcommand)]
        cmd: commands::event_types::EventTypesCommands,
    },

    #[command(about = "Public site configuration and plans")]
    Public {
        #[command(subcommand)]
        cmd: commands::public::PublicCommands,
    },

    #[command(about = "Inbox messages")]
    Inbox {
        #[command(subcommand)]
        cmd: commands::inbox::InboxCommands,
    },

    #[command(about = "Wallet, payment providers and subscription plans")]
    Payments {
        #[command(subcommand)]
        cmd: commands::payments::PaymentsCommands,
    },

    #[command(about = "Invitation card templates")]
    Templates {
        #[command(subcommand)]
        cmd: commands::templates::TemplatesCommands,
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
    let ctx = CliContext::load(cli.base_url.as_deref())?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx, output_format).await,
        Commands::Events { cmd } => commands::events::handle(cmd, &ctx, output_format).await,
        Commands::EventTypes { cmd } => commands::event_types::handle(cmd, &ctx, output_format).await,
        Commands::Public { cmd } => commands::public::handle(cmd, &ctx, output_format).await,
        Commands::Inbox { cmd } => commands::inbox::handle(cmd, &ctx, output_format).await,
        Commands::Payments { cmd } => commands::payments::handle(cmd, &ctx, output_format).await,
        Commands::Templates { cmd } => commands::templates::handle(cmd, &ctx, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_command() {
        let cli = Cli::try_parse_from(["ahadi", "--json", "events", "public", "--type", "4", "--all"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Commands::Events {
                cmd: commands::events::EventsCommands::Public { event_type: Some(4), all: true, .. }
            }
        ));
    }

    #[test]
    fn test_default_output_is_text() {
        let cli = Cli::try_parse_from(["ahadi", "auth", "status"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Text));
    }
}
