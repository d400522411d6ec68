use anyhow::anyhow;
use clap::Subcommand;
use serde_json::json;

use crate::api::events::{EventPayload, EventsListParams};
use crate::api::pagination::Page;
use crate::browse::PublicEventsBrowser;
use crate::cli::context::CliContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum EventsCommands {
    #[command(about = "List events visible to the current user")]
    List {
        #[arg(long, help = "Page number")]
        page: Option<u32>,
        #[arg(long, help = "Search term")]
        search: Option<String>,
        #[arg(long, help = "Ordering field, e.g. -start_date")]
        ordering: Option<String>,
    },

    #[command(about = "Show a single event")]
    Show {
        #[arg(help = "Event ID")]
        id: i64,
    },

    #[command(about = "List events you own or administer")]
    Mine {
        #[arg(long, help = "Page number")]
        page: Option<u32>,
    },

    #[command(about = "Browse public events")]
    Public {
        #[arg(long, help = "Page number", default_value = "1")]
        page: u32,
        #[arg(long = "type", help = "Event type ID")]
        event_type: Option<i64>,
        #[arg(long, help = "Search term")]
        search: Option<String>,
        #[arg(long, help = "Follow pagination to the last page")]
        all: bool,
    },

    #[command(about = "Create an event")]
    Create {
        #[arg(help = "Event title")]
        title: String,
        #[arg(long, help = "Description")]
        description: Option<String>,
        #[arg(long = "type", help = "Event type ID")]
        event_type: Option<i64>,
        #[arg(long, help = "Start date (YYYY-MM-DD)")]
        start_date: Option<String>,
        #[arg(long, help = "Location")]
        location: Option<String>,
    },
}

pub async fn handle(cmd: EventsCommands, ctx: &CliContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        EventsCommands::List { page, search, ordering } => {
            let params = EventsListParams { ordering, page, search };
            let events = ctx.client.events().list(&params).await?;
            output_page(&output_format, "events", &events, &event_header(), event_row)
        }
        EventsCommands::Show { id } => {
            let event = ctx.client.events().get(id).await?;
            output_value(&output_format, &event)
        }
        EventsCommands::Mine { page } => {
            ctx.require_login()?;
            let events = ctx.client.events().my_events(page).await?;
            output_page(&output_format, "events", &events, &event_header(), event_row)
        }
        EventsCommands::Public { page, event_type, search, all } => {
            let browser = PublicEventsBrowser::with_filters(ctx.client.clone(), event_type, search.unwrap_or_default());
            browser.load_events(page, false).await;
            if all {
                while browser.load_next_page().await {}
            }

            let state = browser.state();
            if let Some(error) = state.events_error {
                return Err(anyhow!(error));
            }
            let shown = Page {
                count: state.events_total,
                next: None,
                previous: None,
                results: state.events,
            };
            output_page(&output_format, "events", &shown, &event_header(), event_row)
        }
        EventsCommands::Create { title, description, event_type, start_date, location } => {
            ctx.require_login()?;
            let payload = EventPayload {
                description,
                event_type,
                start_date,
                location,
                ..EventPayload::new(title)
            };
            let event = ctx.client.events().create(&payload).await?;
            output_success(
                &output_format,
                &format!("Created event {} '{}'", event.id, event.title),
                Some(json!({ "event": event })),
            )
        }
    }
}
