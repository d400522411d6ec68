use serde::Serialize;
use serde_json::{json, Value};

use crate::api::pagination::Page;
use crate::cli::OutputFormat;
use crate::types::PublicEvent;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Raw API payloads have no fixed shape; text mode prints them pretty as well
pub fn output_value<T: Serialize>(output_format: &OutputFormat, value: &T) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => {
            let value = serde_json::to_value(value)?;
            match value {
                Value::Object(map) => {
                    for (key, v) in map {
                        println!("{:<24} {}", key, display_scalar(&v));
                    }
                }
                other => println!("{}", serde_json::to_string_pretty(&other)?),
            }
        }
    }
    Ok(())
}

/// Output one page of a list; `row` renders one item for the text table
pub fn output_page<T, F>(
    output_format: &OutputFormat,
    collection_name: &str,
    page: &Page<T>,
    header: &str,
    row: F,
) -> anyhow::Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    if page.results.is_empty() {
        return output_empty_collection(output_format, collection_name, &format!("No {} found", collection_name));
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                "count": page.count,
                "next": page.next,
                "previous": page.previous,
                collection_name: page.results,
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", header);
            println!("{}", "-".repeat(header.len().max(40)));
            for item in &page.results {
                println!("{}", row(item));
            }
            println!();
            println!("{} of {} shown{}", page.results.len(), page.count,
                if page.has_next() { " (more available)" } else { "" });
        }
    }
    Ok(())
}

pub fn event_header() -> String {
    format!("{:<6} {:<32} {:<12} {:<12} {}", "ID", "TITLE", "START", "STATUS", "LOCATION")
}

pub fn event_row(event: &PublicEvent) -> String {
    let start = event.start_date.as_deref().map(date_only).unwrap_or("-");
    format!(
        "{:<6} {:<32} {:<12} {:<12} {}",
        event.id,
        truncate(&event.title, 32),
        start,
        event.status.as_deref().unwrap_or("-"),
        event.location.as_deref().unwrap_or("-"),
    )
}

fn date_only(value: &str) -> &str {
    value.get(..10).unwrap_or(value)
}

pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let cut: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", cut)
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Harusi", 10), "Harusi");
        assert_eq!(truncate("Send-off ya Neema", 8), "Send-of…");
    }

    #[test]
    fn test_event_row_uses_date_part() {
        let event = PublicEvent {
            id: 3,
            title: "Kitchen Party".into(),
            start_date: Some("2026-12-05T14:00:00Z".into()),
            ..Default::default()
        };
        let row = event_row(&event);
        assert!(row.starts_with("3 "));
        assert!(row.contains("2026-12-05 "));
        assert!(!row.contains("T14"));
    }
}
