//! namegraph CLI - Command-line interface
//!
//! Usage:
//!   namegraph extract <epub> <txt>
//!   namegraph names [--text <txt>] [--offset N] [--top N]
//!   namegraph graph --level sentence|paragraph [--json | --name NAME]
//!   namegraph serve [--host H] [--port P]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use namegraph_core::{AppConfig, SegmentLevel};
use namegraph_extractor::{extract_names_from_file, read_text_from, RuleBasedNer};

#[derive(Parser)]
#[command(name = "namegraph")]
#[command(about = "Name co-occurrence networks from e-books")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "NAMEGRAPH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Analysis input overrides shared by `names` and `graph`
#[derive(Args)]
struct AnalysisArgs {
    /// Plain-text file to analyse
    #[arg(long)]
    text: Option<PathBuf>,
    /// Lines to skip before analysis
    #[arg(long)]
    offset: Option<usize>,
    /// Number of subjects of interest
    #[arg(long)]
    top: Option<usize>,
}

impl AnalysisArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(text) = &self.text {
            config.input.text_path = text.clone();
        }
        if let Some(offset) = self.offset {
            config.analysis.start_line = offset;
        }
        if let Some(top) = self.top {
            config.analysis.top_n = top;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an EPUB container to paragraph-delimited plain text
    Extract {
        /// E-book to read
        epub: PathBuf,
        /// Text file to write (overwritten)
        output: PathBuf,
    },
    /// Rank person names by frequency
    Names {
        #[command(flatten)]
        analysis: AnalysisArgs,
    },
    /// Print a co-occurrence graph
    Graph {
        /// Segment level: sentence or paragraph
        #[arg(long, default_value = "sentence")]
        level: SegmentLevel,
        /// Print diagram elements as JSON instead of an edge list
        #[arg(long)]
        json: bool,
        /// Only list the co-occurrences of this name
        #[arg(long, conflicts_with = "json")]
        name: Option<String>,
        #[command(flatten)]
        analysis: AnalysisArgs,
    },
    /// Run the analysis and serve the dashboard
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    namegraph_api::init_tracing(&config.logging);

    match cli.command {
        Commands::Extract { epub, output } => {
            let doc = namegraph_parser::convert_to_text(&epub, &output)
                .with_context(|| format!("extracting {}", epub.display()))?;
            tracing::debug!(
                parts = doc.sections.len(),
                paragraphs = doc.paragraph_count(),
                "Converted {}",
                epub.display()
            );
            println!("Text successfully extracted to {}", output.display());
        }
        Commands::Names { analysis } => {
            analysis.apply(&mut config);
            let recognizer = RuleBasedNer::from_config(&config.model, &config.names)?;
            let table = extract_names_from_file(
                &config.input.text_path,
                config.analysis.start_line,
                &recognizer,
                &config.names,
            )?;
            tracing::info!("{} distinct names, {} mentions", table.len(), table.total());

            for (rank, (name, count)) in table.most_common(config.analysis.top_n).iter().enumerate() {
                println!("{:>3}. {:<32} {}", rank + 1, name, count);
            }
        }
        Commands::Graph {
            level,
            json,
            name,
            analysis,
        } => {
            analysis.apply(&mut config);
            let recognizer = RuleBasedNer::from_config(&config.model, &config.names)?;
            let text = read_text_from(&config.input.text_path, config.analysis.start_line)?;
            let analysis = namegraph_extractor::analyze_text(
                &text,
                &config.analysis,
                &config.names,
                &recognizer,
            )?;
            let graph = analysis.graph(level);

            if json {
                println!("{}", serde_json::to_string_pretty(&graph.to_elements())?);
            } else if let Some(name) = name {
                let neighbors = graph.neighbors(&name);
                if neighbors.is_empty() {
                    tracing::warn!("{} has no co-occurrences at {}", name, level.display_name());
                }
                for (other, weight) in neighbors {
                    println!("{} ↔ {} (Weight: {})", name, other, weight);
                }
            } else {
                println!(
                    "{}: {} nodes, {} edges",
                    level.display_name(),
                    graph.node_count(),
                    graph.edge_count()
                );
                let mut edges = graph.edges();
                edges.sort_by(|a, b| b.weight.cmp(&a.weight));
                for edge in edges {
                    println!("{} ↔ {} (Weight: {})", edge.source, edge.target, edge.weight);
                }
            }
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            tracing::info!("Starting dashboard server on {}", config.server.bind_addr());
            namegraph_api::serve(config).await?;
        }
    }

    Ok(())
}
