//! Tool-calling exchange between the user prompt, the language model and the
//! Zeplin tools.
//!
//! Each call to [`Orchestrator::answer`] starts a fresh conversation:
//!
//! 1. a system instruction plus the user prompt (with injected context) are
//!    sent together with every tool descriptor;
//! 2. if the model answers directly, that text is returned;
//! 3. otherwise the first requested tool is run, its result is appended as a
//!    message, and the model is asked again. Further calls in the same reply
//!    are logged and skipped.
//!
//! Step 3 repeats until the model answers or `max_rounds` model requests have
//! been made. The reply to the last permitted request is the answer whatever
//! its finish reason, so the default of two rounds is the classic
//! request/tool/request exchange.

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::api_spec::ApiSpecSummary;
use crate::config::AppConfig;
use crate::constants::SYSTEM_PROMPT;
use crate::error::{OrchestratorError, SpecSummaryError};
use crate::llm_interaction::{ChatMessage, LlmClient};
use crate::tools::ToolRegistry;

#[derive(Clone)]
pub struct Orchestrator {
    llm: LlmClient,
    registry: ToolRegistry,
    max_rounds: usize,
    project_id: Option<String>,
    spec_context: Option<String>,
}

impl Orchestrator {
    pub fn new(llm: LlmClient, registry: ToolRegistry, max_rounds: usize) -> Self {
        Self {
            llm,
            registry,
            max_rounds,
            project_id: None,
            spec_context: None,
        }
    }

    /// Builds the clients from `config` and, when an API spec path is set,
    /// loads its summary once up front.
    pub fn from_config(config: &AppConfig) -> Result<Self, SpecSummaryError> {
        let mut orchestrator = Self::new(
            LlmClient::from_config(config),
            ToolRegistry::from_config(config),
            config.max_rounds,
        );
        orchestrator.project_id = config.project_id.clone();
        if let Some(path) = &config.api_spec_path {
            orchestrator = orchestrator.with_spec_summary(&ApiSpecSummary::load(path)?);
        }
        Ok(orchestrator)
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_spec_summary(mut self, summary: &ApiSpecSummary) -> Self {
        self.spec_context = Some(summary.to_prompt_context());
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// The two messages every exchange starts from.
    pub fn seed_conversation(&self, prompt: &str) -> Vec<ChatMessage> {
        let mut user = prompt.to_string();
        if self.project_id.is_some() || self.spec_context.is_some() {
            user.push_str("\n\nContext:\n");
            if let Some(project_id) = &self.project_id {
                user.push_str(&format!("The current Zeplin project id is {}.\n", project_id));
            }
            if let Some(spec) = &self.spec_context {
                user.push_str(spec);
            }
        }

        vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
    }

    #[instrument(skip_all, fields(max_rounds = self.max_rounds))]
    pub async fn answer(&self, prompt: &str) -> Result<String, OrchestratorError> {
        let tools = self.registry.definitions();
        let mut conversation = self.seed_conversation(prompt);

        for round in 1..=self.max_rounds {
            let reply = self
                .llm
                .complete(&conversation, &tools)
                .await?
                .into_reply()
                .ok_or(OrchestratorError::NoAnswer)?;

            if !reply.requests_tools() {
                info!(round, "Model answered directly");
                return reply.content.ok_or(OrchestratorError::NoAnswer);
            }
            if round == self.max_rounds {
                warn!(
                    round,
                    requested = reply.tool_calls.len(),
                    "Round limit reached while the model still requested tools"
                );
                return reply.content.ok_or(OrchestratorError::NoAnswer);
            }

            let (call, skipped) = match reply.tool_calls.split_first() {
                Some(split) => split,
                None => return Err(OrchestratorError::NoAnswer),
            };
            for extra in skipped {
                warn!(round, tool = %extra.function.name, "Ignoring additional tool call");
            }

            info!(round, tool = %call.function.name, "Model requested a tool call");
            let result = self
                .registry
                .invoke_by_name(&call.function.name, &call.function.arguments)
                .await?;
            conversation.push(tool_result_message(&result));
        }

        Err(OrchestratorError::NoAnswer)
    }
}

/// Tool output only ever reaches the model as text.
fn tool_result_message(result: &Value) -> ChatMessage {
    ChatMessage::system(format!("The result of the API call is {}", result))
}
