use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail};
use clap::Subcommand;
use serde_json::json;

use crate::api::auth::LoginPayload;
use crate::cli::context::CliContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login with phone number and password")]
    Login {
        #[arg(help = "Phone number")]
        phone: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Send a one-time login code by SMS")]
    OtpRequest {
        #[arg(help = "Phone number")]
        phone: String,
    },

    #[command(about = "Login with a one-time code")]
    OtpVerify {
        #[arg(help = "Phone number")]
        phone: String,
        #[arg(help = "Code received by SMS")]
        code: String,
    },

    #[command(about = "Logout and forget stored tokens")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Refresh authentication token")]
    Refresh,

    #[command(about = "Show current user information")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, ctx: &CliContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { phone, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let payload = LoginPayload { phone: phone.trim().to_string(), password };
            let response = ctx.client.auth().login(&payload).await?;

            if !ctx.session.complete_login(&serde_json::to_value(&response)?) {
                bail!("Login response did not include an access token");
            }
            output_success(
                &output_format,
                &format!("Logged in as {}", payload.phone),
                Some(json!({ "user": ctx.session.user() })),
            )
        }
        AuthCommands::OtpRequest { phone } => {
            ctx.client.auth().request_otp(&phone).await?;
            output_success(&output_format, &format!("Code sent to {}", phone.trim()), None)
        }
        AuthCommands::OtpVerify { phone, code } => {
            let response = ctx.client.auth().verify_otp(&phone, &code).await?;
            if response.success == Some(false) {
                let message = response.message.unwrap_or_else(|| "Verification failed".to_string());
                return Err(anyhow!(message));
            }

            let (access, refresh) = response.tokens();
            let Some(access) = access else {
                bail!("Verification response did not include an access token");
            };
            let data = response.data.as_ref();
            ctx.session.complete_login(&json!({
                "access": access,
                "refresh": refresh,
                "user": data.and_then(|d| d.user.clone()),
            }));

            let mut message = format!("Logged in as {}", phone.trim());
            if response.requires_phone_link() {
                message.push_str(" (phone link required)");
            }
            output_success(
                &output_format,
                &message,
                Some(json!({
                    "user": ctx.session.user(),
                    "requires_phone_link": response.requires_phone_link(),
                })),
            )
        }
        AuthCommands::Logout => {
            if let Some(refresh) = ctx.client.tokens().refresh_token() {
                // Server-side blacklist is best effort; local credentials go regardless
                if let Err(e) = ctx.client.auth().logout(&refresh).await {
                    tracing::warn!("Server logout failed: {}", e);
                }
            }
            ctx.session.logout();
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let state = ctx.session.state();
            let base_url = &ctx.client.config().base_url;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "logged_in": state.logged_in,
                        "user": state.user,
                        "base_url": base_url,
                        "has_refresh_token": ctx.client.tokens().refresh_token().is_some(),
                    }))?);
                }
                OutputFormat::Text => {
                    println!("Server: {}", if base_url.is_empty() { "(not configured)" } else { base_url });
                    if state.logged_in {
                        let who = state
                            .user
                            .as_ref()
                            .and_then(|u| u.full_name.clone().or_else(|| u.phone.clone()))
                            .unwrap_or_else(|| "unknown user".to_string());
                        println!("Logged in as {}", who);
                    } else {
                        println!("Not logged in");
                    }
                }
            }
            Ok(())
        }
        AuthCommands::Refresh => {
            if !ctx.client.refresh_access_token().await {
                bail!("Token refresh failed; login again");
            }
            ctx.session.set_session_expiry();
            ctx.session.hydrate();
            output_success(&output_format, "Access token refreshed", None)
        }
        AuthCommands::Whoami => {
            ctx.require_login()?;
            let me = ctx.client.auth().me().await?;
            output_value(&output_format, &me)
        }
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", label)?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let value = line.trim_end_matches(['\r', '\n']).to_string();
    if value.is_empty() {
        bail!("No password given");
    }
    Ok(value)
}
