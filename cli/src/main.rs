//! CLI entrypoint for warebot
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use warebot_application::{ConversationLogger, Orchestrator, ProcessDocumentsUseCase};
use warebot_domain::{DocumentStore, Query};
use warebot_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiGateway, TextDocumentParser,
};

#[derive(Parser)]
#[command(name = "warebot", about = "Warehouse assistant chat core", version)]
struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip all config files and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask the agent team a question
    Ask {
        question: String,

        /// Documents to load as context before answering
        #[arg(long = "doc")]
        docs: Vec<PathBuf>,

        /// Print each agent's response, not just the final answer
        #[arg(long)]
        show_agents: bool,

        /// Append conversation events to this JSONL file
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Parse documents and report how they would ingest
    Ingest {
        paths: Vec<PathBuf>,
    },

    /// Search loaded documents for keywords
    Search {
        query: String,

        /// Documents to load before searching
        #[arg(long = "doc", required = true)]
        docs: Vec<PathBuf>,
    },

    /// Show configuration sources and validation issues
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(&cli)?;
    for issue in config.validate() {
        warn!("config: {}", issue.message);
    }

    match cli.command {
        Command::Ask {
            question,
            docs,
            show_agents,
            log,
        } => ask(&config, question, docs, show_agents, log).await,
        Command::Ingest { paths } => ingest(&config, paths).await,
        Command::Search { query, docs } => search(&config, query, docs).await,
        Command::Status => status(&config),
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_ref()).context("could not load configuration")
}

async fn ask(
    config: &FileConfig,
    question: String,
    docs: Vec<PathBuf>,
    show_agents: bool,
    log: Option<PathBuf>,
) -> Result<()> {
    let gateway = Arc::new(OpenAiGateway::from_config(&config.provider)?);
    let parser = Arc::new(TextDocumentParser::new());

    let mut orchestrator = Orchestrator::new(
        gateway,
        parser,
        config.agent_roster(),
        config.context_budget(),
    );
    if let Some(path) = log {
        if let Some(logger) = JsonlConversationLogger::new(&path) {
            info!("Logging conversation to {}", logger.path().display());
            orchestrator = orchestrator.with_logger(Arc::new(logger) as Arc<dyn ConversationLogger>);
        }
    }

    if !docs.is_empty() {
        for report in orchestrator.process_documents(&docs).await {
            if !report.success {
                warn!(
                    "{}: {}",
                    report.source,
                    report.error.as_deref().unwrap_or("ingest failed")
                );
            }
        }
    }

    let query = Query::try_new(question).context("question cannot be empty")?;
    let outcome = orchestrator.process_query(query).await;

    if show_agents {
        println!(
            "Routed to: {}",
            outcome
                .routed
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        for response in &outcome.responses {
            println!("\n--- {} ---", response.agent);
            println!("{}", response.narrative);
            if response.has_metrics() {
                println!("{}", serde_json::to_string_pretty(&response.metrics)?);
            }
        }
        println!("\n=== Answer ===");
    }
    println!("{}", outcome.answer);

    Ok(())
}

async fn ingest(config: &FileConfig, paths: Vec<PathBuf>) -> Result<()> {
    let use_case = ProcessDocumentsUseCase::new(Arc::new(TextDocumentParser::new()));
    let mut store = DocumentStore::new(config.context_budget());

    let reports = use_case.execute(&mut store, &paths).await;
    for report in &reports {
        if report.success {
            let mut notes = Vec::new();
            if report.truncated {
                notes.push("truncated".to_string());
            }
            if report.evicted > 0 {
                notes.push(format!("evicted {}", report.evicted));
            }
            let suffix = if notes.is_empty() {
                String::new()
            } else {
                format!(" ({})", notes.join(", "))
            };
            println!("ok   {}{}", report.source, suffix);
        } else {
            println!(
                "FAIL {}: {}",
                report.source,
                report.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let stats = store.statistics();
    println!(
        "\n{} document(s), {} / {} chars used, {} failed",
        stats.documents, stats.total_chars, stats.budget_chars, stats.failed_ingests
    );
    Ok(())
}

async fn search(config: &FileConfig, query: String, docs: Vec<PathBuf>) -> Result<()> {
    let use_case = ProcessDocumentsUseCase::new(Arc::new(TextDocumentParser::new()));
    let mut store = DocumentStore::new(config.context_budget());
    use_case.execute(&mut store, &docs).await;

    let matches = store.search(&query);
    if matches.is_empty() {
        println!("No matches for '{}'", query);
        return Ok(());
    }
    for m in matches {
        println!("{} (score {})", m.source, m.score);
        println!("  {}", m.excerpt.replace('\n', " "));
    }
    Ok(())
}

fn status(config: &FileConfig) -> Result<()> {
    println!("Configuration sources (in priority order):");
    if let Some(path) = ConfigLoader::project_config_path() {
        println!("  [FOUND] Project: {}", path.display());
    } else {
        println!("  [     ] Project: ./warebot.toml or ./.warebot.toml");
    }
    if let Some(path) = ConfigLoader::global_config_path() {
        let marker = if path.exists() { "[FOUND]" } else { "[     ]" };
        println!("  {} Global:  {}", marker, path.display());
    }
    println!("  [     ] Default: built-in defaults");

    println!("\nProvider: {} (key from ${})", config.provider.base_url, config.provider.api_key_env);
    println!(
        "Context budget: {} total / {} per document",
        config.context.max_total_chars, config.context.max_document_chars
    );

    println!("\nAgents:");
    for (name, settings) in config.agent_roster().iter() {
        println!(
            "  {:<10} {} (temperature {}, tools: {})",
            name.to_string(),
            settings.model,
            settings.temperature,
            if settings.function_calling { "on" } else { "off" }
        );
    }

    let issues = config.validate();
    if issues.is_empty() {
        println!("\nConfiguration OK");
    } else {
        println!("\nIssues:");
        for issue in issues {
            println!("  {:?}: {}", issue.severity, issue.message);
        }
    }
    Ok(())
}
