use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Which classifier backend fusion should use.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    /// Local ONNX model (default) — no API key, no network at inference time
    Onnx,
    /// No classifier — fusion runs keyword heuristics only
    None,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Nothing
/// here is secret, but the same no-hardcoding rule applies.
pub struct Config {
    pub db_path: String,
    /// PostgreSQL connection URL (when set and starts with postgres://,
    /// uses the Postgres backend instead of SQLite)
    pub database_url: Option<String>,
    /// Which classifier to load into the model context (default: Onnx)
    pub classifier_backend: ClassifierBackend,
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
    /// Comma-separated allowed CORS origins for the web API
    #[cfg(feature = "web")]
    pub allowed_origins: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a workable default — a bare environment gets a local
    /// SQLite file and keyword-only fusion if no model is downloaded.
    pub fn load() -> Result<Self> {
        let classifier_backend = match env::var("PALISADE_CLASSIFIER").as_deref() {
            Ok("none") => ClassifierBackend::None,
            // "onnx" or unset both default to ONNX
            _ => ClassifierBackend::Onnx,
        };

        let model_dir = env::var("PALISADE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::classify::download::default_model_dir());

        #[cfg(feature = "web")]
        let allowed_origins = env::var("PALISADE_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        Ok(Self {
            db_path: env::var("PALISADE_DB_PATH").unwrap_or_else(|_| "./palisade.db".to_string()),
            database_url: env::var("DATABASE_URL").ok(),
            classifier_backend,
            model_dir,
            #[cfg(feature = "web")]
            allowed_origins,
        })
    }

    /// Check that the ONNX classifier has what it needs.
    /// Call this before operations that should fail loudly when the model
    /// is missing (e.g. `palisade score --require-model`); normal scoring
    /// degrades silently instead.
    pub fn require_classifier(&self) -> Result<()> {
        match self.classifier_backend {
            ClassifierBackend::Onnx => {
                if !crate::classify::download::classifier_files_present(&self.model_dir) {
                    anyhow::bail!(
                        "Classifier model files not found in {}\n\
                         Run `palisade download-model` to download them.\n\
                         Or set PALISADE_CLASSIFIER=none to score with keyword heuristics only.",
                        self.model_dir.display()
                    );
                }
                Ok(())
            }
            ClassifierBackend::None => {
                anyhow::bail!("PALISADE_CLASSIFIER=none — no classifier is configured.")
            }
        }
    }
}
