// Environment-derived defaults. Secrets are read lazily so `tools` and `--help`
// work without any keys present.

use std::env;

pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_ZEPLIN_API_BASE: &str = "https://api.zeplin.dev/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 256;
pub const DEFAULT_MAX_ROUNDS: usize = 2;
// Zeplin caps `limit` at 100 for screen listings.
pub const DEFAULT_SCREEN_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_SCREEN_PAGES: u32 = 10;

pub const SYSTEM_PROMPT: &str = "Don't make assumptions about what values to plug into functions. \
Ask for clarification if a user request is ambiguous.";

lazy_static::lazy_static! {
    pub static ref OPENAI_API_KEY: Option<String> = non_empty_var("OPENAI_API_KEY");
    pub static ref OPENAI_API_BASE: String = env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_OPENAI_API_BASE.to_string());
    pub static ref ASSISTANT_MODEL: String = env::var("ZEPLIN_ASSISTANT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    pub static ref ZEPLIN_API_KEY: Option<String> = non_empty_var("ZEPLIN_API_KEY");
    pub static ref ZEPLIN_API_BASE: String = env::var("ZEPLIN_API_BASE").unwrap_or_else(|_| DEFAULT_ZEPLIN_API_BASE.to_string());
    pub static ref ZEPLIN_PROJECT_ID: Option<String> = non_empty_var("ZEPLIN_PROJECT_ID");
    pub static ref ZEPLIN_API_SPEC: Option<String> = non_empty_var("ZEPLIN_API_SPEC");
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
