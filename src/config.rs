use std::path::PathBuf;

use crate::constants;
use crate::error::ConfigError;

/// Runtime settings for one assistant process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on model requests per exchange. Two reproduces the classic
    /// "ask, run one tool batch, ask again" flow.
    pub max_rounds: usize,
    pub zeplin_api_key: String,
    pub zeplin_api_base: String,
    /// Project injected into every prompt so the model can fill `projectId`.
    pub project_id: Option<String>,
    pub api_spec_path: Option<PathBuf>,
    pub screen_page_size: u32,
    pub max_screen_pages: u32,
}

impl AppConfig {
    pub fn new(openai_api_key: impl Into<String>, zeplin_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            openai_api_base: constants::DEFAULT_OPENAI_API_BASE.to_string(),
            model: constants::DEFAULT_MODEL.to_string(),
            temperature: constants::DEFAULT_TEMPERATURE,
            max_tokens: constants::DEFAULT_MAX_TOKENS,
            max_rounds: constants::DEFAULT_MAX_ROUNDS,
            zeplin_api_key: zeplin_api_key.into(),
            zeplin_api_base: constants::DEFAULT_ZEPLIN_API_BASE.to_string(),
            project_id: None,
            api_spec_path: None,
            screen_page_size: constants::DEFAULT_SCREEN_PAGE_SIZE,
            max_screen_pages: constants::DEFAULT_MAX_SCREEN_PAGES,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let openai_api_key = constants::OPENAI_API_KEY
            .clone()
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        let zeplin_api_key = constants::ZEPLIN_API_KEY
            .clone()
            .ok_or(ConfigError::Missing("ZEPLIN_API_KEY"))?;

        let mut config = Self::new(openai_api_key, zeplin_api_key);
        config.openai_api_base = constants::OPENAI_API_BASE.clone();
        config.model = constants::ASSISTANT_MODEL.clone();
        config.zeplin_api_base = constants::ZEPLIN_API_BASE.clone();
        config.project_id = constants::ZEPLIN_PROJECT_ID.clone();
        config.api_spec_path = constants::ZEPLIN_API_SPEC.as_ref().map(PathBuf::from);
        Ok(config)
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Result<Self, ConfigError> {
        if max_rounds == 0 {
            return Err(ConfigError::Invalid {
                field: "max_rounds",
                reason: "at least one model request is required".to_string(),
            });
        }
        self.max_rounds = max_rounds;
        Ok(self)
    }
}
