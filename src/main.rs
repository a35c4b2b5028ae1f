use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use zeplin_assistant::{chat, web_server, AppConfig, Orchestrator, ToolKind};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Zeplin project injected into every prompt (overrides ZEPLIN_PROJECT_ID).
    #[arg(long, global = true)]
    project_id: Option<String>,

    /// OpenAPI YAML document summarised into the prompt (overrides ZEPLIN_API_SPEC).
    #[arg(long, global = true)]
    api_spec: Option<PathBuf>,

    /// Maximum number of model requests per question.
    #[arg(long, global = true)]
    max_rounds: Option<usize>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the chat page and JSON API.
    Serve {
        #[arg(long, env = "ZEPLIN_ASSISTANT_PORT", default_value_t = 9900, help = "Port for the web server.")]
        port: u16,
    },
    /// Ask a single question and print the answer.
    Ask {
        #[arg(help = "The question to ask about the Zeplin project.")]
        prompt: String,
    },
    /// Ask questions interactively in the terminal.
    Chat,
    /// Print the tool descriptors offered to the language model.
    Tools,
}

impl Cli {
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::from_env().context("Failed to load configuration")?;
        if let Some(project_id) = &self.project_id {
            config = config.with_project_id(project_id);
        }
        if let Some(path) = &self.api_spec {
            config.api_spec_path = Some(path.clone());
        }
        if let Some(max_rounds) = self.max_rounds {
            config = config.with_max_rounds(max_rounds)?;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG (e.g. RUST_LOG=info,zeplin_assistant=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    info!("Zeplin assistant starting with command: {:?}", cli.command);

    match &cli.command {
        Commands::Tools => {
            let definitions = ToolKind::definitions();
            println!("{}", serde_json::to_string_pretty(&definitions)?);
        }
        Commands::Serve { port } => {
            let orchestrator = build_orchestrator(&cli)?;
            let server = web_server::start_web_server(*port, orchestrator);
            tokio::select! {
                res = server => {
                    if let Err(e) = res {
                        error!("Web server failed: {:?}", e);
                        return Err(e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl-C received, shutting down.");
                }
            }
        }
        Commands::Ask { prompt } => {
            let orchestrator = build_orchestrator(&cli)?;
            let answer = orchestrator
                .answer(prompt)
                .await
                .context("Failed to answer the question")?;
            println!("{}", answer);
        }
        Commands::Chat => {
            let orchestrator = build_orchestrator(&cli)?;
            chat::run_chat(&orchestrator)
                .await
                .context("Chat session failed")?;
        }
    }

    Ok(())
}

fn build_orchestrator(cli: &Cli) -> Result<Orchestrator> {
    let config = cli.load_config()?;
    Orchestrator::from_config(&config).context("Failed to load the API spec summary")
}
