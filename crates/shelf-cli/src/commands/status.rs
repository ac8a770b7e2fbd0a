//! Status command handler

use anyhow::Result;

use shelf_core::{Config, KeyValueStore, Session};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show<K: KeyValueStore>(session: &Session<K>, config: &Config, output: &Output) -> Result<()> {
    let store = session.store();
    let size = store.blob_size()?;
    let categories = store.categories_in_use();

    match output.format {
        OutputFormat::Json => {
            let json_categories: serde_json::Map<String, serde_json::Value> = categories
                .iter()
                .map(|(name, count)| (name.clone(), serde_json::json!(count)))
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "storage": {
                        "location": store.location(),
                        "exists": size.is_some(),
                        "size": size
                    },
                    "counts": {
                        "books": store.len(),
                        "categories": json_categories
                    },
                    "categories": config.categories
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("SHELF Status");
            println!("============");
            println!();
            println!("Storage:");
            println!("  Location: {}", store.location());
            println!(
                "  Size:     {}",
                size.map(format_size)
                    .unwrap_or_else(|| "(nothing saved yet)".to_string())
            );
            println!();
            println!("Contents:");
            println!("  Books: {}", store.len());
            for (name, count) in &categories {
                println!("    {}: {}", name, count);
            }
        }
    }

    Ok(())
}

/// Human-readable byte count
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
