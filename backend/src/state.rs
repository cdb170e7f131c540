use std::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::inference::Pipeline;
use crate::inference::preprocess::PreprocessOptions;
use crate::inference::provider::{ModelInfo, ModelProvider};
use crate::session::SessionContext;

pub enum ModelState {
    Ready { pipeline: Pipeline, info: ModelInfo },
    Failed(String),
}

impl ModelState {
    /// Runs the model provider once. Failures are kept so the UI can show them.
    pub async fn load(config: &AppConfig) -> Self {
        let source = match config.model_source() {
            Ok(Some(source)) => source,
            Ok(None) => {
                return ModelState::Failed(
                    "No model source configured; set MODEL_URL or model.source".to_string(),
                );
            }
            Err(e) => return ModelState::Failed(e.to_string()),
        };
        let options = match PreprocessOptions::try_from(&config.preprocessing) {
            Ok(options) => options,
            Err(e) => return ModelState::Failed(e.to_string()),
        };

        let provider = ModelProvider::new(config.model.input_layout);
        match provider.load(&source).await {
            Ok(loaded) => ModelState::Ready {
                pipeline: Pipeline::new(loaded.classifier, options),
                info: loaded.info,
            },
            Err(e) => {
                log::error!("Error loading the model from {}: {}", source, e);
                ModelState::Failed(e.to_string())
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ModelState::Ready { .. } => None,
            ModelState::Failed(message) => Some(message),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub model: ModelState,
    session: Mutex<SessionContext>,
}

impl AppState {
    pub fn new(config: AppConfig, model: ModelState) -> Self {
        Self {
            config,
            model,
            session: Mutex::new(SessionContext::new()),
        }
    }

    pub fn pipeline(&self) -> Result<Pipeline, ApiError> {
        match &self.model {
            ModelState::Ready { pipeline, .. } => Ok(pipeline.clone()),
            ModelState::Failed(message) => Err(ApiError::ModelNotLoaded(message.clone())),
        }
    }

    pub fn model_info(&self) -> Option<&ModelInfo> {
        match &self.model {
            ModelState::Ready { info, .. } => Some(info),
            ModelState::Failed(_) => None,
        }
    }

    pub fn session(&self) -> Result<MutexGuard<'_, SessionContext>, ApiError> {
        self.session
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".to_string()))
    }
}
