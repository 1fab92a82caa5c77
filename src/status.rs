// System status display — shows DB stats, history size, model availability.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::classify::download;
use crate::config::Config;
use crate::db::Database;

/// Display system status to the terminal.
pub async fn show(db: &Arc<dyn Database>, config: &Config) -> Result<()> {
    let db_display_path = config.db_path.as_str();
    if config.database_url.is_none() && !Path::new(db_display_path).exists() {
        println!("Database: not initialized");
        println!("\nRun `palisade init` to set up the database.");
        return Ok(());
    }

    // Database file size (SQLite only; Postgres shows the URL host side)
    match &config.database_url {
        Some(url) if url.starts_with("postgres") => {
            println!("Database: PostgreSQL");
        }
        _ => {
            let file_size = std::fs::metadata(db_display_path)
                .map(|m| format_bytes(m.len()))
                .unwrap_or_else(|_| "unknown".to_string());
            println!("Database: {} ({})", db_display_path, file_size);
        }
    }

    // History
    let count = db.count_records().await?;
    if count == 0 {
        println!("History: empty");
        println!("  Run `palisade score <text>` to record an assessment");
    } else {
        let recent = db.get_recent(1).await?;
        match recent.first() {
            Some(last) => println!(
                "History: {} records (last at {})",
                count,
                last.timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
            None => println!("History: {} records", count),
        }
    }

    // Classifier model
    if download::classifier_files_present(&config.model_dir) {
        println!("Classifier model: present ({})", config.model_dir.display());
    } else {
        println!("Classifier model: not downloaded");
        println!("  Run `palisade download-model` to fetch it");
        println!("  (scoring falls back to keyword heuristics without it)");
    }

    // Forecast model
    if download::forecast_files_present(&config.model_dir) {
        println!("Forecast model: present");
    } else {
        println!("Forecast model: not present (forecasts use linear fit)");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
