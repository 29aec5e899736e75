use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use safar_agents::{FlightAssistant, StdConsole};
use safar_catalog::{DataSources, SearchError};
use safar_ml::SafarMlStack;
use safar_observability::{init_tracing, SessionMetrics};
use serde_json::json;

#[derive(Debug, Parser)]
#[command(name = "safar")]
#[command(about = "Safar flight booking assistant")]
struct Cli {
    /// Directory holding flight_data.csv and small_talk.csv.
    #[arg(long, env = "SAFAR_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[arg(long, env = "SAFAR_FLIGHTS")]
    flights: Option<PathBuf>,

    #[arg(long, env = "SAFAR_SMALL_TALK")]
    small_talk: Option<PathBuf>,

    /// JSONL intent examples; the built-in phrases are used when absent.
    #[arg(long, env = "SAFAR_INTENT_DATASET")]
    intents: Option<PathBuf>,

    /// Minimum cosine similarity for an intent match.
    #[arg(long, env = "SAFAR_INTENT_THRESHOLD", default_value_t = 0.5)]
    threshold: f32,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive booking conversation (default).
    Chat,
    /// Print the whole flight catalog.
    Flights,
    /// Show which intent a phrase maps to.
    Classify {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Search {
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
        /// DD/MM/YYYY
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "Economy")]
        class: String,
    },
}

fn main() -> Result<()> {
    init_tracing("safar_cli");
    let cli = Cli::parse();

    let assistant = build_assistant(&cli)?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let mut console = StdConsole::stdio();
            assistant.run(&mut console)?;
        }
        Command::Flights => {
            println!("{}", serde_json::to_string_pretty(assistant.catalog().all())?);
        }
        Command::Classify { text } => {
            let text = text.join(" ");
            let prediction = assistant.classify(&text);
            let payload = json!({
                "text": text,
                "intent": prediction.intent,
                "confidence": prediction.confidence,
                "model": prediction.model,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Search {
            origin,
            destination,
            date,
            class,
        } => {
            let payload = match assistant
                .catalog()
                .search(&origin, &destination, &date, &class)
            {
                Ok(flights) => json!({ "flights": flights }),
                Err(err) => {
                    let kind = match err {
                        SearchError::InvalidInput(_) => "invalid_input",
                        SearchError::NotFound => "not_found",
                    };
                    json!({ "error": err.to_string(), "kind": kind })
                }
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}

fn build_assistant(cli: &Cli) -> Result<FlightAssistant> {
    let mut sources = DataSources::in_dir(&cli.data_dir);
    if let Some(flights) = &cli.flights {
        sources.flights = flights.clone();
    }
    if let Some(small_talk) = &cli.small_talk {
        sources.small_talk = small_talk.clone();
    }

    let (catalog, small_talk) = sources
        .load()
        .with_context(|| format!("failed loading datasets from {}", cli.data_dir.display()))?;
    let ml_stack = SafarMlStack::load(cli.intents.as_deref(), cli.threshold)?;

    tracing::info!(
        flights = catalog.len(),
        small_talk = small_talk.len(),
        examples = ml_stack.examples.len(),
        "assistant ready"
    );

    Ok(FlightAssistant::new(
        Arc::new(catalog),
        Arc::new(small_talk),
        ml_stack,
        SessionMetrics::shared(),
    ))
}
