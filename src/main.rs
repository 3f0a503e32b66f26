//! Decksmith CLI - LLM-generated slide decks
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use decksmith::config::ConfigError;
use decksmith::documents::load_documents;
use decksmith::storage::StoredPresentation;
use decksmith::{Config, Pipeline, PresentationRequest, SlideContent, Storage, SummarySupplier};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "decksmith")]
#[command(author, version, about = "LLM-generated slide decks", long_about = None)]
struct Cli {
    /// Path to a config file instead of decksmith.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and store a full presentation
    Generate {
        /// What the presentation is about
        #[arg(short, long)]
        prompt: Option<String>,
        /// Number of slides (5 to 15)
        #[arg(short = 'n', long)]
        slides: Option<usize>,
        /// Output language
        #[arg(short, long)]
        language: Option<String>,
        /// Documents to summarise into the outline
        #[arg(short, long = "document")]
        documents: Vec<PathBuf>,
        /// Print the presentation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate only the outline
    Outline {
        #[arg(short, long)]
        prompt: Option<String>,
        #[arg(short = 'n', long)]
        slides: Option<usize>,
        #[arg(short, long)]
        language: Option<String>,
        #[arg(short, long = "document")]
        documents: Vec<PathBuf>,
    },
    /// List stored presentations
    List,
    /// Show a stored presentation
    Show {
        id: String,
        /// Print the presentation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a stored presentation
    Delete { id: String },
    /// Print shell completions
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let Cli {
        config: config_path,
        command,
    } = Cli::parse();
    let config_path = config_path.as_deref();

    match command {
        Commands::Generate {
            prompt,
            slides,
            language,
            documents,
            json,
        } => {
            let config = read_config(config_path)?;
            let pipeline = Pipeline::from_config(&config)?;
            let summary = summarise(&pipeline, &documents).await?;

            let request = PresentationRequest {
                prompt: prompt.clone(),
                n_slides: slides.unwrap_or(config.generation.n_slides),
                language,
            };
            println!("{}", "Generating presentation...".dimmed());
            let presentation = pipeline
                .generate_presentation(&request, summary.as_deref())
                .await?;

            let storage = Storage::open(&config.storage.path)?;
            let stored = storage.store(prompt, presentation)?;
            print_presentation(&stored, json)?;
        }
        Commands::Outline {
            prompt,
            slides,
            language,
            documents,
        } => {
            let config = read_config(config_path)?;
            let pipeline = Pipeline::from_config(&config)?;
            let summary = summarise(&pipeline, &documents).await?;

            let outline = pipeline
                .generate_outline(
                    prompt.as_deref(),
                    slides.unwrap_or(config.generation.n_slides),
                    language.as_deref(),
                    summary.as_deref(),
                )
                .await?;
            println!("{outline}");
        }
        Commands::List => {
            let storage = open_storage(config_path)?;
            let presentations = storage.list_all()?;

            if presentations.is_empty() {
                println!("No stored presentations found.");
            } else {
                println!("Stored presentations ({}):\n", presentations.len());
                for stored in presentations {
                    println!(
                        "📄 {} ({})",
                        stored.presentation.title.bold(),
                        stored.created_at.format("%Y-%m-%d %H:%M")
                    );
                    println!(
                        "   {}  {} slides\n",
                        stored.id.dimmed(),
                        stored.presentation.slides.len()
                    );
                }
            }
        }
        Commands::Show { id, json } => {
            let storage = open_storage(config_path)?;
            let stored = storage.require(&id)?;
            print_presentation(&stored, json)?;
        }
        Commands::Delete { id } => {
            let storage = open_storage(config_path)?;
            if storage.delete(&id)? {
                println!("Deleted {id}");
            } else {
                println!("No presentation with id {id}");
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "decksmith", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load the config file given with `--config`, or the default one
fn read_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn open_storage(config_path: Option<&Path>) -> anyhow::Result<Storage> {
    let config = read_config(config_path)?;
    Ok(Storage::open(&config.storage.path)?)
}

/// Load and summarise documents, if any were given
async fn summarise(pipeline: &Pipeline, paths: &[PathBuf]) -> anyhow::Result<Option<String>> {
    if paths.is_empty() {
        return Ok(None);
    }
    println!("Summarising {} documents...", paths.len());
    let documents = load_documents(paths).await?;
    Ok(Some(pipeline.summarize(&documents).await?))
}

fn print_presentation(stored: &StoredPresentation, json: bool) -> anyhow::Result<()> {
    let presentation = &stored.presentation;
    if json {
        println!("{}", serde_json::to_string_pretty(presentation)?);
        return Ok(());
    }

    println!("=== {} ===", presentation.title.bold());
    println!("{}\n", stored.id.dimmed());

    for (i, slide) in presentation.slides.iter().enumerate() {
        let content = slide.content();
        println!(
            "{} {} {}",
            format!("{:>2}.", i + 1).cyan(),
            content.title().bold(),
            format!("[type {}]", slide.slide_type()).dimmed()
        );
        match content {
            SlideContent::Type1(c) => println!("    {}", c.body),
            SlideContent::Type5(c) => println!("    {}\n    📊 graph", c.body),
            SlideContent::Type6(c) => println!("    {}", c.description),
            SlideContent::Type8(c) => println!("    {}", c.description),
            _ => {}
        }
        for (heading, description) in list_items(content) {
            println!("    • {heading}: {description}");
        }
    }

    if let Some(notes) = &presentation.notes {
        println!("\n📌 Notes:");
        for note in notes {
            println!("  • {note}");
        }
    }
    Ok(())
}

/// Heading/description pairs of the list layouts
fn list_items(content: &SlideContent) -> Vec<(&str, &str)> {
    let items = match content {
        SlideContent::Type2(c) => &c.body,
        SlideContent::Type3(c) => &c.body,
        SlideContent::Type4(c) => &c.body,
        SlideContent::Type6(c) => &c.body,
        SlideContent::Type7(c) => &c.body,
        SlideContent::Type8(c) => &c.body,
        SlideContent::Type9(c) => &c.body,
        _ => return Vec::new(),
    };
    items
        .iter()
        .map(|item| (item.heading.as_str(), item.description.as_str()))
        .collect()
}
