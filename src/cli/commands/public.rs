use clap::Subcommand;

use crate::cli::context::CliContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum PublicCommands {
    #[command(about = "Show public site configuration")]
    Config,

    #[command(about = "Show public site information")]
    Info,

    #[command(about = "List subscription plans")]
    Plans,
}

pub async fn handle(cmd: PublicCommands, ctx: &CliContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let public = ctx.client.public();
    let value = match cmd {
        PublicCommands::Config => public.config().await?,
        PublicCommands::Info => public.info().await?,
        PublicCommands::Plans => public.plans().await?,
    };
    output_value(&output_format, &value)
}
