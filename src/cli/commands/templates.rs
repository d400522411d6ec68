use clap::Subcommand;

use crate::cli::context::CliContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TemplatesCommands {
    #[command(about = "List invitation card templates")]
    List {
        #[arg(long, help = "Page number")]
        page: Option<u32>,
    },
}

pub async fn handle(cmd: TemplatesCommands, ctx: &CliContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TemplatesCommands::List { page } => {
            let templates = ctx.client.invitation_templates().list(page).await?;
            output_page(
                &output_format,
                "templates",
                &templates,
                &format!("{:<6} {:<28} {:<16} {}", "ID", "NAME", "CATEGORY", "PREMIUM"),
                |t| {
                    format!(
                        "{:<6} {:<28} {:<16} {}",
                        t.id,
                        truncate(&t.name, 28),
                        t.category_display,
                        if t.is_premium { "yes" } else { "no" }
                    )
                },
            )
        }
    }
}
