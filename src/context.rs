// ModelContext — the load-once handle bundle for optional inference models.
//
// Built once at startup from Config, read-only for the process lifetime,
// and passed explicitly into fusion and forecasting. Nothing here is
// required: a context with no models degrades every caller to its
// heuristic path without error.

use std::sync::Arc;

use tracing::{info, warn};

use crate::classify::onnx::OnnxClassifier;
use crate::classify::traits::TextClassifier;
use crate::config::{ClassifierBackend, Config};
use crate::forecast::model::SequenceModel;

pub struct ModelContext {
    classifier: Option<Arc<dyn TextClassifier>>,
    forecaster: Option<SequenceModel>,
}

impl ModelContext {
    /// A context with no models — keyword-only fusion, linear-only forecasts.
    pub fn empty() -> Self {
        Self {
            classifier: None,
            forecaster: None,
        }
    }

    /// Construct from explicit handles (used by tests and custom embeddings).
    pub fn new(
        classifier: Option<Arc<dyn TextClassifier>>,
        forecaster: Option<SequenceModel>,
    ) -> Self {
        Self {
            classifier,
            forecaster,
        }
    }

    /// Best-effort load of every configured model artifact.
    ///
    /// Missing or broken artifacts are logged and skipped, never fatal —
    /// scoring must stay available on a machine with no models at all.
    pub fn load(config: &Config) -> Self {
        let classifier: Option<Arc<dyn TextClassifier>> = match config.classifier_backend {
            ClassifierBackend::None => {
                info!("Classifier disabled; fusion will use keyword heuristics only");
                None
            }
            ClassifierBackend::Onnx => match OnnxClassifier::load(&config.model_dir) {
                Ok(clf) => {
                    info!("Loaded ONNX classifier from {}", config.model_dir.display());
                    Some(Arc::new(clf))
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        "Classifier model not available; fusion will use keyword heuristics only"
                    );
                    None
                }
            },
        };

        let forecaster = match SequenceModel::load(&config.model_dir) {
            Ok(Some(model)) => {
                info!("Loaded forecast sequence model");
                Some(model)
            }
            Ok(None) => None, // artifacts simply not present
            Err(e) => {
                warn!(error = %e, "Forecast model failed to load; using linear extrapolation");
                None
            }
        };

        Self {
            classifier,
            forecaster,
        }
    }

    pub fn classifier(&self) -> Option<&Arc<dyn TextClassifier>> {
        self.classifier.as_ref()
    }

    pub fn forecaster(&self) -> Option<&SequenceModel> {
        self.forecaster.as_ref()
    }
}
