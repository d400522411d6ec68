use clap::Subcommand;
use serde_json::json;

use crate::cli::context::CliContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum InboxCommands {
    #[command(about = "List inbox messages")]
    List {
        #[arg(long, help = "Page number")]
        page: Option<u32>,
    },

    #[command(about = "Show the number of unread messages")]
    Unread,
}

pub async fn handle(cmd: InboxCommands, ctx: &CliContext, output_format: OutputFormat) -> anyhow::Result<()> {
    ctx.require_login()?;

    match cmd {
        InboxCommands::List { page } => {
            let messages = ctx.client.inbox().list(page).await?;
            output_page(
                &output_format,
                "messages",
                &messages,
                &format!("{:<6} {:<2} {:<20} {:<32} {}", "ID", "", "FROM", "TITLE", "RECEIVED"),
                |m| {
                    format!(
                        "{:<6} {:<2} {:<20} {:<32} {}",
                        m.id,
                        if m.is_read { "" } else { "*" },
                        truncate(&m.sender_name, 20),
                        truncate(&m.title, 32),
                        m.created_at
                    )
                },
            )
        }
        InboxCommands::Unread => {
            let unread = ctx.client.inbox().unread_count().await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "unread": unread.count }))?),
                OutputFormat::Text => println!("{} unread message(s)", unread.count),
            }
            Ok(())
        }
    }
}
