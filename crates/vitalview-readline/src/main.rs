use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use vitalview_application::{ChatSession, ChatSurface, SendOutcome, SessionFactory};
use vitalview_core::config::AppConfig;
use vitalview_core::viewport::ViewportHandles;

mod console;

use console::{ConsoleOverlay, ConsolePage, ConsoleViewer};

#[derive(Parser)]
#[command(name = "vitalview")]
#[command(about = "VitalView - chat with the assistant and see the regions it talks about", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/vitalview/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the chat endpoint URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat,
    /// List the regions the viewer can frame
    Targets,
    /// Show how a region name resolves
    Resolve { name: String },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("Failed to load config")?,
    };
    if let Some(endpoint) = &cli.endpoint {
        config.chat.endpoint = endpoint.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(config).await,
        Commands::Targets => {
            let registry = config.build_registry()?;
            let default_key = registry.default_target().key.clone();
            for key in registry.keys() {
                if key == default_key {
                    println!("{} {}", key, "(default)".bright_black());
                } else {
                    println!("{key}");
                }
            }
            Ok(())
        }
        Commands::Resolve { name } => {
            let registry = config.build_registry()?;
            let definition = registry.resolve(&name);
            if !registry.contains(&name) {
                eprintln!(
                    "{}",
                    format!("'{}' is not registered, using '{}'", name, definition.key).yellow()
                );
            }
            println!("{}", serde_json::to_string_pretty(definition)?);
            Ok(())
        }
    }
}

async fn run_chat(config: AppConfig) -> Result<()> {
    let endpoint = config.chat.endpoint.clone();
    let factory = SessionFactory::from_config(config)?;
    let page = Arc::new(ConsolePage);
    let session = factory.create_session(
        ViewportHandles::new(Arc::new(ConsoleViewer::default()), Arc::new(ConsoleOverlay)),
        ChatSurface::new(page.clone(), page),
    )?;
    tracing::info!("[vitalview] Chat session {} started against {}", session.id(), endpoint);

    let mut rl = DefaultEditor::new()?;

    println!("{}", "=== VitalView ===".bright_magenta().bold());
    println!("{}", format!("Endpoint: {endpoint}").bright_black());
    println!(
        "{}",
        "Describe a symptom or ask to see a body part. '/click' opens the marker, '/dismiss' closes it, 'quit' exits."
            .bright_black()
    );
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                // Skip empty lines
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "/click" => click_marker(&session).await,
                    "/dismiss" => {
                        if !session.viewport().page_clicked().await {
                            println!("{}", "Nothing to dismiss".bright_black());
                        }
                    }
                    _ => {
                        println!("{}", format!("> {trimmed}").green());
                        report(session.send(trimmed).await);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

async fn click_marker(session: &ChatSession) {
    match session.viewport().active_hotspot().await {
        Some(hotspot) => {
            if !session.viewport().marker_clicked(hotspot.marker).await {
                println!("{}", "Marker is not on screen".bright_black());
            }
        }
        None => println!("{}", "No marker to click".bright_black()),
    }
}

fn report(outcome: SendOutcome) {
    match outcome {
        SendOutcome::TransportFailed { sequence, error } => {
            tracing::warn!("[vitalview] Request #{} failed: {}", sequence, error);
            eprintln!("{}", format!("({error})").red());
        }
        SendOutcome::Superseded { sequence } => {
            tracing::debug!("[vitalview] Reply #{} superseded", sequence);
            println!("{}", format!("(reply #{sequence} arrived late and was dropped)").bright_black());
        }
        SendOutcome::Ignored | SendOutcome::Replied { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use vitalview_core::error::VitalViewError;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_report_logs_transport_failure() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            report(SendOutcome::TransportFailed {
                sequence: 3,
                error: VitalViewError::transport(Some(500), "boom"),
            });
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("Request #3 failed: Transport error (500): boom"));
    }
}
