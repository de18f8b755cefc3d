use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ludoquiz_core::domain::{ConnectionState, Quiz};
use ludoquiz_core::{
    BridgeBuilder, Document, HostNotification, LudoquizConfig, QuizResult, Renderer, RunningBridge,
};

/// Ludoquiz - quiz results and rich-text rendering from the terminal
#[derive(Parser, Debug)]
#[command(name = "ludoquiz")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./ludoquiz.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a document (JSON array of blocks) to HTML
    Render {
        /// Document file
        file: PathBuf,

        /// Treat the file as a quiz and render its description
        #[arg(long)]
        quiz: bool,
    },

    /// Store a result for a quiz
    Submit {
        #[arg(long)]
        id: String,

        #[arg(long)]
        score: u32,
    },

    /// Grade an answer sheet against a quiz file and store the result
    Grade {
        /// Quiz file (CMS JSON)
        quiz: PathBuf,

        /// Chosen answer index per question
        #[arg(required = true)]
        choices: Vec<usize>,
    },

    /// Print every stored result as JSON
    Results,

    /// Send a named analytics event
    Event { name: String },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn start(config: &LudoquizConfig, load_on_start: bool) -> Result<RunningBridge> {
    let bridge = BridgeBuilder::from_config(config)
        .load_on_start(load_on_start)
        .build()?;
    Ok(bridge.start())
}

/// Hand `result` to the bridge and wait for it to finish.
///
/// Returns `false` when storage never became ready, so the result was
/// dropped.
async fn store(config: &LudoquizConfig, result: QuizResult) -> Result<bool> {
    let mut running = start(config, false)?;
    running.handle.request_store_result(result.clone());
    running.shutdown_and_join().await;

    let state = running.store().connection_state();
    if state == ConnectionState::Ready {
        tracing::info!(id = %result.id, score = result.score, "result sent to storage");
        Ok(true)
    } else {
        tracing::warn!(id = %result.id, ?state, "storage unavailable, result not stored");
        Ok(false)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = LudoquizConfig::load(&cli.config)?;

    match cli.command {
        Command::Render { file, quiz } => {
            let document: Document = if quiz {
                read_json::<Quiz>(&file)?.description
            } else {
                read_json(&file)?
            };
            let renderer = Renderer::with_defaults(config.images.clone());
            println!("{}", renderer.render(&document).to_html());
        }
        Command::Submit { id, score } => {
            store(&config, QuizResult::new(id, score)).await?;
        }
        Command::Grade { quiz, choices } => {
            let quiz: Quiz = read_json(&quiz)?;
            let result = quiz.grade(&choices)?;
            println!("{}/{}", result.score, quiz.questions.len());
            store(&config, result).await?;
        }
        Command::Results => {
            let mut running = start(&config, true)?;
            let notification = running.notifications.recv().await;
            running.shutdown_and_join().await;
            if let Some(HostNotification::ResultsLoaded(mut results)) = notification {
                results.sort_by(|a, b| a.id.cmp(&b.id));
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        Command::Event { name } => {
            let mut running = start(&config, false)?;
            running.handle.log_event(name);
            running.shutdown_and_join().await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludoquiz_core::config::BackendKind;

    fn config(backend: BackendKind) -> LudoquizConfig {
        let mut config = LudoquizConfig::default();
        config.storage.backend = backend;
        config
    }

    #[tokio::test]
    async fn store_reports_dropped_results() {
        let stored = store(&config(BackendKind::Disabled), QuizResult::new("q1", 3))
            .await
            .unwrap();
        assert!(!stored);
    }

    #[tokio::test]
    async fn store_reports_sent_results() {
        let stored = store(&config(BackendKind::Memory), QuizResult::new("q1", 3))
            .await
            .unwrap();
        assert!(stored);
    }
}
