// Terminal front end for the same exchange the web page runs. Every line is a
// fresh conversation; nothing carries over between prompts.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use crate::orchestrator::Orchestrator;

pub async fn run_chat(orchestrator: &Orchestrator) -> Result<()> {
    info!("Starting interactive chat session...");
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Ask me about your Zeplin project! (type 'exit' to quit)\n")
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt == "exit" || prompt == "quit" {
            break;
        }

        match orchestrator.answer(prompt).await {
            Ok(answer) => {
                stdout.write_all(format!("{}\n\n", answer).as_bytes()).await?;
            }
            Err(e) => error!(error = %e, "Exchange failed"),
        }
    }

    info!("Chat session finished.");
    Ok(())
}
