use clap::Parser;
use tracing_subscriber::EnvFilter;

use ahadi_client::cli::{Cli, OutputFormat};
use ahadi_client::cli::utils::output_error;
use ahadi_client::error::ClientError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = ahadi_client::cli::run(cli).await {
        let error_code = e.downcast_ref::<ClientError>().map(ClientError::error_code);

        match (&output_format, std::env::var("CLI_VERBOSE").as_deref()) {
            (OutputFormat::Text, Ok("true") | Ok("1")) => eprintln!("Error: {e:?}"),
            _ => output_error(&output_format, &e.to_string(), error_code)?,
        }
        std::process::exit(1);
    }

    Ok(())
}
