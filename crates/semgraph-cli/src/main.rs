//! Semgraph CLI
//!
//! Works on pre-parsed JSON documents (one parse, or an object mapping
//! labels to parses):
//! - `normalize`: raw parse -> semantic graph
//! - `match`: search phrases against documents, with optional ontology
//! - `phraselets`: the phraselets of a document
//! - `ontology`: entries and ancestors of an ontology word
//! - `index`: persist normalized documents and their corpus index

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use semgraph_matching::MatchDictionary;
use semgraph_storage::Encoding;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

mod config;

use config::{read_labeled_parses, write_json, CliConfig, ResourceArgs};

#[derive(Parser)]
#[command(name = "semgraph")]
#[command(author, version, about = "Semgraph: semantic structural matching over dependency parses")]
struct Cli {
    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize raw parses into semantic graphs (JSON).
    Normalize {
        /// Raw parse JSON
        input: PathBuf,
        /// Output JSON (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        resources: ResourceArgs,
    },

    /// Match search phrases against documents.
    Match {
        /// Search phrase parses (label -> parse)
        #[arg(long)]
        phrases: PathBuf,
        /// Document parses (label -> parse)
        #[arg(long)]
        documents: Option<PathBuf>,
        /// Previously saved document archive (see `index`)
        #[arg(long, conflicts_with = "documents")]
        archive: Option<PathBuf>,
        /// Output match dictionaries JSON (summary only when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print the match dictionaries instead of a summary
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        resources: ResourceArgs,
    },

    /// Extract the phraselets of each document.
    Phraselets {
        /// Document parses (label -> parse)
        input: PathBuf,
        /// Weight phraselets by word frequencies across the input documents
        #[arg(long)]
        weighted: bool,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        resources: ResourceArgs,
    },

    /// Query an ontology.
    Ontology {
        /// Ontology file (.nt, .ttl, .owl/.rdf)
        input: PathBuf,
        /// Word to look up
        word: String,
        /// JSON configuration file (`ontology` section)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the most general ancestor instead of the matching entries
        #[arg(long)]
        ancestor: bool,
    },

    /// Normalize documents and save them with their corpus index.
    Index {
        /// Document parses (label -> parse)
        input: PathBuf,
        /// Document archive to write
        #[arg(short, long)]
        out: PathBuf,
        /// Also write the corpus index to this file
        #[arg(long)]
        index_out: Option<PathBuf>,
        /// bincode or cbor
        #[arg(long, default_value = "bincode")]
        encoding: Encoding,
        #[command(flatten)]
        resources: ResourceArgs,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Normalize { input, out, resources } => cmd_normalize(&input, out.as_deref(), &resources),
        Commands::Match {
            phrases,
            documents,
            archive,
            out,
            json,
            resources,
        } => cmd_match(
            &phrases,
            documents.as_deref(),
            archive.as_deref(),
            out.as_deref(),
            json,
            &resources,
        ),
        Commands::Phraselets {
            input,
            weighted,
            out,
            resources,
        } => cmd_phraselets(&input, weighted, out.as_deref(), &resources),
        Commands::Ontology {
            input,
            word,
            config,
            ancestor,
        } => cmd_ontology(&input, &word, config.as_deref(), ancestor),
        Commands::Index {
            input,
            out,
            index_out,
            encoding,
            resources,
        } => cmd_index(&input, &out, index_out.as_deref(), encoding, &resources),
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_normalize(input: &Path, out: Option<&Path>, resources: &ResourceArgs) -> Result<()> {
    let matcher = resources.matcher()?;
    let mut normalized = BTreeMap::new();
    for (label, raw) in read_labeled_parses(input)? {
        let doc = matcher
            .normalizer()
            .normalize(&raw)
            .with_context(|| format!("normalizing '{label}'"))?;
        normalized.insert(label, doc);
    }
    write_json(&normalized, out)?;
    eprintln!("{} {} document(s)", "Normalized".green().bold(), normalized.len());
    Ok(())
}

fn cmd_match(
    phrases: &Path,
    documents: Option<&Path>,
    archive: Option<&Path>,
    out: Option<&Path>,
    json: bool,
    resources: &ResourceArgs,
) -> Result<()> {
    let mut matcher = resources.matcher()?;
    match (documents, archive) {
        (Some(path), _) => {
            let parses: Vec<_> = read_labeled_parses(path)?.into_iter().collect();
            matcher.register_documents(&parses)?;
        }
        (None, Some(path)) => {
            semgraph_storage::load_documents(&mut matcher, path)
                .with_context(|| format!("loading archive {}", path.display()))?;
        }
        (None, None) => bail!("either --documents or --archive is required"),
    }
    for (label, raw) in read_labeled_parses(phrases)? {
        if let Err(err) = matcher.register_search_phrase(&label, &raw) {
            eprintln!("{} {}", "Skipped:".yellow().bold(), err);
        }
    }
    tracing::info!(
        documents = matcher.documents().len(),
        search_phrases = matcher.search_phrases().len(),
        "matching"
    );
    let dictionaries = matcher.match_returning_dictionaries()?;
    if json || out.is_some() {
        write_json(&dictionaries, out)?;
    }
    if !json {
        print_summary(&dictionaries);
    }
    Ok(())
}

fn print_summary(dictionaries: &[MatchDictionary]) {
    if dictionaries.is_empty() {
        println!("{}", "No matches".yellow());
        return;
    }
    for dictionary in dictionaries {
        let mut flags = Vec::new();
        if dictionary.negated {
            flags.push("negated".red().to_string());
        }
        if dictionary.uncertain {
            flags.push("uncertain".yellow().to_string());
        }
        if dictionary.involves_coreference {
            flags.push("coreference".cyan().to_string());
        }
        println!(
            "{} {} @ {}:{} ({:.3}) {}",
            "✓".green(),
            dictionary.search_phrase_label.bold(),
            dictionary.document,
            dictionary.index_within_document,
            dictionary.overall_similarity_measure,
            flags.join(" ")
        );
        println!("    {}", dictionary.sentences_within_document.dimmed());
        for word_match in &dictionary.word_matches {
            println!(
                "    {} -> {} [{}] {}",
                word_match.search_phrase_word,
                word_match.document_phrase,
                word_match.match_type,
                word_match.explanation.dimmed()
            );
        }
    }
    println!("{} {} match(es)", "Found".green().bold(), dictionaries.len());
}

fn cmd_phraselets(input: &Path, weighted: bool, out: Option<&Path>, resources: &ResourceArgs) -> Result<()> {
    let mut matcher = resources.matcher()?;
    let parses: Vec<_> = read_labeled_parses(input)?.into_iter().collect();
    matcher.register_documents(&parses)?;
    let mut phraselets = BTreeMap::new();
    for (label, _) in &parses {
        phraselets.insert(label.clone(), matcher.document_phraselet_infos(label, weighted)?);
    }
    write_json(&phraselets, out)
}

fn cmd_ontology(input: &Path, word: &str, config: Option<&Path>, ancestor: bool) -> Result<()> {
    let config = CliConfig::load(config)?;
    let ontology = semgraph_ontology::Ontology::load(input, config.ontology)
        .with_context(|| format!("loading ontology {}", input.display()))?;
    if ancestor {
        println!("{}", ontology.get_most_general_hypernym_ancestor(word));
        return Ok(());
    }
    let entries = ontology.get_matching_entries(word);
    if entries.is_empty() {
        println!("{} '{}'", "No entries for".yellow(), word);
        return Ok(());
    }
    for entry in entries.iter() {
        let kind = if entry.is_individual { " (individual)" } else { "" };
        println!("{:>3}  {}{}", entry.depth, entry.word.bold(), kind.dimmed());
    }
    Ok(())
}

fn cmd_index(
    input: &Path,
    out: &Path,
    index_out: Option<&Path>,
    encoding: Encoding,
    resources: &ResourceArgs,
) -> Result<()> {
    let mut matcher = resources.matcher()?;
    let parses: Vec<_> = read_labeled_parses(input)?.into_iter().collect();
    matcher.register_documents(&parses)?;
    let written = semgraph_storage::save_documents(&matcher, out, encoding)
        .with_context(|| format!("writing archive {}", out.display()))?;
    tracing::info!(path = %out.display(), documents = written, ?encoding, "wrote archive");
    if let Some(path) = index_out {
        let model = matcher.helper().adapter().name().to_string();
        let bytes = semgraph_storage::serialize_index(matcher.index(), &model, encoding)?;
        semgraph_storage::write_file(path, &bytes)
            .with_context(|| format!("writing index {}", path.display()))?;
    }
    eprintln!(
        "{} {} document(s), {} index key(s)",
        "Indexed".green().bold(),
        written,
        matcher.index().len()
    );
    Ok(())
}
