use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failures talking to the Zeplin REST API.
#[derive(Error, Debug)]
pub enum ZeplinError {
    #[error("Zeplin request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Zeplin API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode Zeplin response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures talking to the chat-completions API.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("language model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("language model API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode language model response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Remote(#[from] ZeplinError),

    #[error("failed to encode tool result: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("tool call failed: {0}")]
    Tool(#[from] ToolError),

    #[error("language model returned no answer")]
    NoAnswer,
}

#[derive(Error, Debug)]
pub enum SpecSummaryError {
    #[error("failed to read API spec: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse API spec: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
