// Model download helper for the ONNX classifier.
//
// Files are stored in a platform-appropriate directory
// (~/.local/share/palisade/models/ on Linux) so they persist across runs.
// The forecast sequence model is produced by an offline training pipeline
// and copied into the same directory's forecast/ subdirectory by hand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// HuggingFace repo holding the exported multi-label classifier.
const CLASSIFIER_HF_URL: &str =
    "https://huggingface.co/palisade-safety/risk-multilabel-onnx/resolve/main";

const CLASSIFIER_MODEL_FILE: &str = "model_quantized.onnx";
const CLASSIFIER_TOKENIZER_FILE: &str = "tokenizer.json";

/// Returns the default directory for storing model files.
/// Uses the platform data directory: ~/.local/share/palisade/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("palisade")
        .join("models")
}

/// Subdirectory within model_dir for the forecast sequence model artifacts.
pub fn forecast_model_dir(base: &Path) -> PathBuf {
    base.join("forecast")
}

/// Check whether both required classifier files exist.
pub fn classifier_files_present(dir: &Path) -> bool {
    dir.join(CLASSIFIER_MODEL_FILE).exists() && dir.join(CLASSIFIER_TOKENIZER_FILE).exists()
}

/// Check whether the forecast model artifacts exist.
pub fn forecast_files_present(dir: &Path) -> bool {
    let forecast_dir = forecast_model_dir(dir);
    forecast_dir.join("model.onnx").exists() && forecast_dir.join("preproc.json").exists()
}

/// Download the classifier model files.
///
/// Shows a progress bar for the large model file. Skips files that
/// already exist. Creates directories as needed.
pub async fn download_model(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    println!("\nRisk classifier (multi-label, 7 categories):");

    let tokenizer_path = dir.join(CLASSIFIER_TOKENIZER_FILE);
    if tokenizer_path.exists() {
        info!("Classifier tokenizer already exists, skipping");
        println!("  {} (already exists)", CLASSIFIER_TOKENIZER_FILE);
    } else {
        println!("  Downloading {}...", CLASSIFIER_TOKENIZER_FILE);
        download_file(
            &format!("{}/{}", CLASSIFIER_HF_URL, CLASSIFIER_TOKENIZER_FILE),
            &tokenizer_path,
            false,
        )
        .await?;
    }

    let model_path = dir.join(CLASSIFIER_MODEL_FILE);
    if model_path.exists() {
        info!("Classifier model already exists, skipping");
        println!("  {} (already exists)", CLASSIFIER_MODEL_FILE);
    } else {
        println!("  Downloading {} (~65 MB)...", CLASSIFIER_MODEL_FILE);
        download_file(
            &format!("{}/{}", CLASSIFIER_HF_URL, CLASSIFIER_MODEL_FILE),
            &model_path,
            true,
        )
        .await?;
    }

    if !forecast_files_present(dir) {
        println!(
            "\nNote: no forecast model found in {} — forecasts will use\nlinear extrapolation (this is fine for most deployments).",
            forecast_model_dir(dir).display()
        );
    }

    Ok(())
}

/// Download a single file from a URL to a local path.
/// If `show_progress` is true, display a progress bar.
async fn download_file(url: &str, dest: &Path, show_progress: bool) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let total_size = response.content_length();

    let pb = if show_progress {
        let pb = if let Some(size) = total_size {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("valid template")
                    .progress_chars("=> "),
            );
            pb
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .expect("valid template"),
            );
            pb
        };
        Some(pb)
    } else {
        None
    };

    let bytes = response
        .bytes()
        .await
        .context("Failed to read response body")?;

    if let Some(ref pb) = pb {
        pb.set_position(bytes.len() as u64);
    }

    std::fs::write(dest, &bytes).with_context(|| format!("Failed to write {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}
