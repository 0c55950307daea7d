//! citebib command-line front end
//!
//! Classifies and resolves identifiers, and manages a collection persisted
//! under the configured data directory.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use citebib_core::domain::{CitationStyle, Collection, RecordType};
use citebib_core::persistence::decode_collection;
use citebib_core::{
    Action, BibliographyField, BibliographyStore, CitebibConfig, FileSnapshotStore,
    IdentifierResolver, NewCitation,
};
use citebib_identifiers::classify;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "citebib", version, about = "Collect and resolve bibliographic references")]
struct Cli {
    /// Config file (defaults to $CITEBIB_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which identifier kind the text holds
    Classify { text: String },

    /// Resolve an identifier and print the record as JSON
    Resolve { text: String },

    /// List bibliographies in the collection
    List,

    /// Create a new bibliography
    New {
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "APA")]
        style_name: String,
        #[arg(long, default_value = "apa")]
        style_code: String,
    },

    /// Resolve an identifier and append it to a bibliography
    Add {
        bibliography_id: String,
        identifier: String,
    },

    /// Add a manually entered reference of the given CSL type
    AddManual {
        bibliography_id: String,
        #[arg(value_name = "TYPE")]
        kind: String,
        #[arg(long)]
        title: String,
    },

    /// Delete a bibliography
    Remove { bibliography_id: String },

    /// Print the whole collection as JSON
    Export,

    /// Merge a collection JSON file into the local collection
    Merge { file: PathBuf },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = CitebibConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify { text } => match classify(&text) {
            Some(kind) => println!("{kind}"),
            None => println!("unrecognized"),
        },
        Commands::Resolve { text } => {
            let resolver = IdentifierResolver::new(&config.resolvers)?;
            match resolver.resolve(&text).await {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => return Err(format!("could not resolve '{text}'").into()),
            }
        }
        command => run_collection_command(&config, command).await?,
    }

    Ok(())
}

async fn run_collection_command(config: &CitebibConfig, command: Commands) -> CliResult<()> {
    let adapter = Arc::new(FileSnapshotStore::new(config.storage.resolved_data_dir()));
    let mut store = BibliographyStore::load(adapter).await?;

    match command {
        Commands::List => print_listing(store.collection()),
        Commands::New {
            title,
            style_name,
            style_code,
        } => {
            store.dispatch(Action::CreateBibliography {
                style: CitationStyle::new(style_name, style_code),
            });
            let id = store
                .collection()
                .bibliographies()
                .last()
                .map(|b| b.id.clone())
                .ok_or("bibliography was not created")?;
            if let Some(title) = title {
                store.dispatch(Action::UpdateBibliographyField {
                    bibliography_id: id.clone(),
                    field: BibliographyField::Title(title),
                });
            }
            println!("{id}");
        }
        Commands::Add {
            bibliography_id,
            identifier,
        } => {
            require_bibliography(store.collection(), &bibliography_id)?;
            let resolver = IdentifierResolver::new(&config.resolvers)?;
            let record = resolver
                .resolve(&identifier)
                .await
                .ok_or_else(|| format!("could not resolve '{identifier}'"))?;
            store.dispatch(Action::AddCitation {
                bibliography_id,
                citation: NewCitation::Content(record),
            });
        }
        Commands::AddManual {
            bibliography_id,
            kind,
            title,
        } => {
            require_bibliography(store.collection(), &bibliography_id)?;
            store.dispatch(Action::AddCitation {
                bibliography_id: bibliography_id.clone(),
                citation: NewCitation::Manual(RecordType::from(kind)),
            });
            let mut citation = store
                .collection()
                .get(&bibliography_id)
                .and_then(|b| b.edited_citation.clone())
                .ok_or("manual entry slot was not opened")?;
            citation.content.title = Some(title);
            store.dispatch(Action::CommitCitation {
                bibliography_id,
                citation,
            });
        }
        Commands::Remove { bibliography_id } => {
            require_bibliography(store.collection(), &bibliography_id)?;
            store.dispatch(Action::DeleteBibliography { bibliography_id });
        }
        Commands::Export => {
            println!("{}", serde_json::to_string_pretty(store.collection())?);
        }
        Commands::Merge { file } => {
            let incoming = decode_collection(&std::fs::read_to_string(&file)?)?;
            store.dispatch(Action::MergeCollections { incoming });
        }
        // Handled before the store is opened
        Commands::Classify { .. } | Commands::Resolve { .. } => {}
    }

    store.flush().await?;
    Ok(())
}

fn require_bibliography(collection: &Collection, bibliography_id: &str) -> CliResult<()> {
    if collection.contains(bibliography_id) {
        Ok(())
    } else {
        Err(format!("no bibliography with id '{bibliography_id}'").into())
    }
}

fn print_listing(collection: &Collection) {
    for bib in collection.iter() {
        let collab = if bib.is_collab_open() { " [shared]" } else { "" };
        println!(
            "{}  {} ({} citations, {}){}",
            bib.id,
            bib.title,
            bib.citations.len(),
            bib.style.name,
            collab
        );
    }
}
