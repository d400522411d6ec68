use clap::Subcommand;

use crate::cli::context::CliContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum EventTypesCommands {
    #[command(about = "List event types")]
    List {
        #[arg(long, help = "Page number")]
        page: Option<u32>,
    },
}

pub async fn handle(cmd: EventTypesCommands, ctx: &CliContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        EventTypesCommands::List { page } => {
            let types = ctx.client.event_types().list(page).await?;
            output_page(
                &output_format,
                "event_types",
                &types,
                &format!("{:<6} {:<24} {}", "ID", "NAME", "SLUG"),
                |t| format!("{:<6} {:<24} {}", t.id, truncate(&t.name, 24), t.slug.as_deref().unwrap_or("-")),
            )
        }
    }
}
