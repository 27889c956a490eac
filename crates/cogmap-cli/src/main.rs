//! cogmap CLI - Command-line interface
//!
//! Usage:
//!   cogmap map <dir>
//!   cogmap extract <dir>
//!   cogmap tag <sentence>
//!
//! Author: hephaex@gmail.com

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use cogmap_core::{AppConfig, LoggingConfig, TaggerBackend, TaggerConfig};
use cogmap_extractor::{extract_svo, tag_sentence, HttpTagger, LexiconTagger, Tagger};
use cogmap_graph::{build_graph, GraphExport};
use cogmap_parser::CorpusExtractor;
use cogmap_render::{open_in_viewer, GraphRenderer, RasterRenderer};

#[derive(Parser)]
#[command(name = "cogmap")]
#[command(about = "Build cognitive maps from PDF documents")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, tag, build, prune and render a cognitive map
    Map {
        /// Directory containing PDF files
        dir: Option<PathBuf>,

        /// Output image path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum entity frequency for a node to survive pruning
        #[arg(long)]
        min_freq: Option<usize>,

        /// Tagging backend (http or lexicon)
        #[arg(long)]
        tagger: Option<TaggerBackend>,

        /// Also write the pruned graph as JSON
        #[arg(long)]
        export_json: Option<PathBuf>,

        /// Do not open the image after writing it
        #[arg(long)]
        no_show: bool,
    },
    /// Print the normalized text of every PDF in a directory
    Extract {
        /// Directory containing PDF files
        dir: Option<PathBuf>,
    },
    /// Tag one sentence and print the filtered tokens and its triple
    Tag {
        sentence: String,

        /// Tagging backend (http or lexicon)
        #[arg(long)]
        tagger: Option<TaggerBackend>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.as_str().into());

    if logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_tagger(config: &TaggerConfig) -> anyhow::Result<Box<dyn Tagger>> {
    let tagger: Box<dyn Tagger> = match config.backend {
        TaggerBackend::Http => Box::new(HttpTagger::from_config(config)?),
        TaggerBackend::Lexicon => match &config.lexicon_path {
            Some(path) => Box::new(LexiconTagger::from_file(path)?),
            None => Box::new(LexiconTagger::new()),
        },
    };
    Ok(tagger)
}

fn extract_corpus(dir: &Path) -> anyhow::Result<cogmap_parser::Corpus> {
    CorpusExtractor::new()
        .extract_dir(dir)
        .with_context(|| format!("extracting text from {}", dir.display()))
}

async fn run_map(config: &AppConfig, export_json: Option<&Path>) -> anyhow::Result<()> {
    let corpus = extract_corpus(&config.input.dir)?;
    let tagger = build_tagger(&config.tagger)?;

    let map = build_graph(&corpus.text, tagger.as_ref(), &config.graph).await?;

    if let Some(path) = export_json {
        GraphExport::from_map(&map)
            .write_json(path)
            .with_context(|| format!("exporting graph to {}", path.display()))?;
    }

    let output = &config.render.output;
    let renderer = RasterRenderer::new(config.render.clone())?;
    renderer
        .render(&map.graph, output)
        .with_context(|| format!("rendering {}", output.display()))?;

    println!(
        "Wrote {} ({} nodes, {} edges)",
        output.display(),
        map.graph.node_count(),
        map.graph.edge_count()
    );

    if config.render.show {
        open_in_viewer(output)?;
    }
    Ok(())
}

async fn run_tag(config: &TaggerConfig, sentence: &str) -> anyhow::Result<()> {
    let tagger = build_tagger(config)?;
    let tagged = tag_sentence(tagger.as_ref(), sentence).await?;

    println!("Entities:");
    for token in &tagged.entities {
        println!("  {:<20} {}", token.word, token.group);
    }
    println!("Parts of speech:");
    for token in &tagged.pos {
        println!("  {:<20} {}", token.word, token.group);
    }

    match extract_svo(&tagged.pos) {
        Some(triple) => println!("Triple: {}", triple),
        None => println!("Triple: none"),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Map {
            dir,
            output,
            min_freq,
            tagger,
            export_json,
            no_show,
        } => {
            if let Some(dir) = dir {
                config.input.dir = dir;
            }
            if let Some(output) = output {
                config.render.output = output;
            }
            if let Some(min_freq) = min_freq {
                config.graph.min_entity_freq = min_freq;
            }
            if let Some(tagger) = tagger {
                config.tagger.backend = tagger;
            }
            if no_show {
                config.render.show = false;
            }

            run_map(&config, export_json.as_deref()).await?;
        }
        Commands::Extract { dir } => {
            let dir = dir.unwrap_or(config.input.dir);
            let corpus = extract_corpus(&dir)?;
            tracing::info!(
                "{} documents, {} pages with text",
                corpus.documents,
                corpus.pages
            );
            print!("{}", corpus.text);
        }
        Commands::Tag { sentence, tagger } => {
            if let Some(tagger) = tagger {
                config.tagger.backend = tagger;
            }
            run_tag(&config.tagger, &sentence).await?;
        }
    }

    Ok(())
}
