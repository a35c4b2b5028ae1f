pub mod api_spec;
pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod layers;
pub mod llm_interaction;
pub mod orchestrator;
pub mod tools;
pub mod web_server;
pub mod zeplin;

pub use config::AppConfig;
pub use error::{ConfigError, LlmError, OrchestratorError, SpecSummaryError, ToolError, ZeplinError};
pub use layers::flatten_layer_texts;
pub use orchestrator::Orchestrator;
pub use tools::{ScreenTexts, ToolKind, ToolRegistry};
