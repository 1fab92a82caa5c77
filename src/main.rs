use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

use palisade::config::Config;
use palisade::context::ModelContext;
use palisade::db::Database;

/// Palisade: message-safety risk scoring and forecasting.
///
/// Scores conversations across seven risk categories, persists the
/// results, and projects where the risk trend is heading.
#[derive(Parser)]
#[command(name = "palisade", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Download the ONNX risk classifier (~65 MB)
    DownloadModel,

    /// Score one or more messages as a single conversation
    Score {
        /// The messages, oldest first
        messages: Vec<String>,

        /// Sender label to store with the record
        #[arg(long)]
        sender: Option<String>,

        /// Fail instead of degrading to keywords when the model is missing
        #[arg(long)]
        require_model: bool,
    },

    /// Project future risk scores from recent history
    Forecast {
        /// Steps to forecast (default: 3)
        #[arg(long, default_value = "3")]
        days: usize,

        /// Recent records to fit against (default: 60)
        #[arg(long, default_value = "60")]
        recent: u32,
    },

    /// Show recent scored messages
    History {
        /// Max records to show (default: 20)
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show aggregate statistics over all history
    Stats,

    /// Delete all persisted history
    Clear,

    /// Show system status (DB size, record count, model availability)
    Status,

    /// Start the JSON API server
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 8000)
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Address to bind (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("palisade=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing Palisade database...");
            let config = Config::load()?;
            let db = init_database(&config).await?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nPalisade is ready. Next step: `palisade download-model`");
            println!("  (or set PALISADE_CLASSIFIER=none to score with keywords only)");
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX classifier...");
            println!("  Destination: {}", model_dir.display());

            palisade::classify::download::download_model(model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `palisade score <text>`.");
        }

        Commands::Score {
            messages,
            sender,
            require_model,
        } => {
            if messages.is_empty() {
                anyhow::bail!("Provide at least one message to score.");
            }

            let config = Config::load()?;
            if require_model {
                config.require_classifier()?;
            }
            let db = open_database(&config).await?;
            let models = ModelContext::load(&config);

            let mut per_message = Vec::with_capacity(messages.len());
            for text in &messages {
                let labels = palisade::classify::fuse(&models, text).await;
                per_message.push((text.clone(), labels));
            }

            let vectors: Vec<_> = per_message.iter().map(|(_, v)| *v).collect();
            let aggregated = palisade::classify::aggregate_max(&vectors);
            let assessment = palisade::scoring::score(&aggregated);

            palisade::output::terminal::display_assessment(&assessment);
            palisade::output::terminal::display_per_message(&per_message);

            // Flag PII leaks in any message, separately from risk scoring
            for (text, _) in &per_message {
                if let Some(hit) = palisade::privacy::scan(text) {
                    println!(
                        "\n  {} message shares a {}",
                        "Privacy:".yellow().bold(),
                        hit.kind.yellow()
                    );
                    break;
                }
            }

            let last_message = messages.last().cloned();
            let record = palisade::db::models::NewRecord::from_assessment(
                last_message,
                sender,
                assessment.risk_score,
                aggregated,
            );
            let id = db.insert_record(&record).await?;
            println!("\n{}", format!("Saved as record #{id}.").dimmed());
        }

        Commands::Forecast { days, recent } => {
            let config = Config::load()?;
            let db = open_database(&config).await?;
            let models = ModelContext::load(&config);

            let records = db.get_history(recent).await?;
            if records.is_empty() {
                println!("No history yet — forecast would be flat zero.");
                println!("Run `palisade score <text>` a few times first.");
                return Ok(());
            }

            let series: Vec<f64> = records.iter().map(|r| r.risk_score).collect();
            let points = palisade::forecast::forecast(&models, &series, days);

            println!(
                "Fitted against {} records (latest score {:.2}).",
                records.len(),
                series.last().copied().unwrap_or(0.0)
            );
            palisade::output::terminal::display_forecast(&points);
        }

        Commands::History { limit } => {
            let config = Config::load()?;
            let db = open_database(&config).await?;

            let records = db.get_recent(limit).await?;
            palisade::output::terminal::display_history(&records);
        }

        Commands::Stats => {
            let config = Config::load()?;
            let db = open_database(&config).await?;

            let records = db.get_history(u32::MAX).await?;
            if records.is_empty() {
                println!("No history yet. Run `palisade score <text>` first.");
                return Ok(());
            }

            let stats = palisade::stats::compute(&records);

            println!("\n{}", "=== Statistics ===".bold());
            println!("  Total predictions: {}", stats.total_predictions);
            println!("  Average risk:      {:.2}%", stats.average_risk_score);

            println!("\n  By stored level:");
            for (level, count) in &stats.risk_level_distribution {
                println!("    {:<8} {}", level, count);
            }

            println!("\n  Mean label probabilities:");
            for (label, pct) in &stats.label_distribution {
                println!("    {:<20} {:>6.2}%", label, pct);
            }

            if !stats.daily_risk_averages.is_empty() {
                println!("\n  Daily averages (last 7 days):");
                for (day, pct) in &stats.daily_risk_averages {
                    println!("    {}  {:>6.2}%", day, pct);
                }
            }
        }

        Commands::Clear => {
            let config = Config::load()?;
            let db = open_database(&config).await?;

            let deleted = db.delete_all().await?;
            println!("Deleted {deleted} records.");
        }

        Commands::Status => {
            let config = Config::load()?;
            let db = open_database(&config).await?;
            palisade::status::show(&db, &config).await?;
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let db = init_database(&config).await?;
            let models = Arc::new(ModelContext::load(&config));

            palisade::web::run_server(config, db, models, port, &bind).await?;
        }
    }

    Ok(())
}

/// Select the database backend based on configuration.
///
/// When DATABASE_URL is set and points to PostgreSQL, uses the Postgres
/// backend (requires the `postgres` feature). Otherwise, SQLite.
async fn open_database(config: &Config) -> Result<Arc<dyn Database>> {
    if let Some(ref url) = config.database_url {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            #[cfg(feature = "postgres")]
            {
                info!("Using PostgreSQL backend");
                let db = palisade::db::postgres::PgDatabase::connect(url).await?;
                return Ok(Arc::new(db));
            }
            #[cfg(not(feature = "postgres"))]
            anyhow::bail!(
                "DATABASE_URL points to PostgreSQL but the 'postgres' feature is not compiled in.\n\
                 Rebuild with: cargo build --features postgres"
            );
        }
    }

    #[cfg(feature = "sqlite")]
    {
        let conn = palisade::db::open(&config.db_path)?;
        return Ok(Arc::new(palisade::db::sqlite::SqliteDatabase::new(conn)));
    }
    #[cfg(not(feature = "sqlite"))]
    anyhow::bail!("No database backend compiled in. Enable the 'sqlite' feature.")
}

/// Initialize the database (create if needed).
async fn init_database(config: &Config) -> Result<Arc<dyn Database>> {
    if let Some(ref url) = config.database_url {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            #[cfg(feature = "postgres")]
            {
                info!("Using PostgreSQL backend");
                let db = palisade::db::postgres::PgDatabase::connect(url).await?;
                return Ok(Arc::new(db));
            }
            #[cfg(not(feature = "postgres"))]
            anyhow::bail!(
                "DATABASE_URL points to PostgreSQL but the 'postgres' feature is not compiled in.\n\
                 Rebuild with: cargo build --features postgres"
            );
        }
    }

    #[cfg(feature = "sqlite")]
    {
        let conn = palisade::db::initialize(&config.db_path)?;
        return Ok(Arc::new(palisade::db::sqlite::SqliteDatabase::new(conn)));
    }
    #[cfg(not(feature = "sqlite"))]
    anyhow::bail!("No database backend compiled in. Enable the 'sqlite' feature.")
}
