use clap::Subcommand;

use crate::cli::context::CliContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum PaymentsCommands {
    #[command(about = "Show wallet balance")]
    Wallet,

    #[command(about = "List mobile money and bank providers")]
    Providers,

    #[command(about = "List subscription plans")]
    Plans,
}

pub async fn handle(cmd: PaymentsCommands, ctx: &CliContext, output_format: OutputFormat) -> anyhow::Result<()> {
    let payments = ctx.client.payments();
    let value = match cmd {
        PaymentsCommands::Wallet => {
            ctx.require_login()?;
            payments.wallet().await?
        }
        PaymentsCommands::Providers => payments.providers().await?,
        PaymentsCommands::Plans => payments.subscription_plans().await?,
    };
    output_value(&output_format, &value)
}
