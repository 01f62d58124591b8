use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{info, warn};
use tracing::level_filters::LevelFilter;

use stickygraph::miro::{MiroBoard, MiroClient, MiroConfig, MiroError};
use stickygraph::{
    BoardError, BoardReader, CanonicalEdge, CanonicalGraph, ExtractError, LayoutError, NodeRegistry, Position,
    SyncError, SyncReport,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Miro(#[from] MiroError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("reading {path} failed: {source}")]
    Input { path: String, source: io::Error },
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "stickygraph", about = "Draw directed graphs on a Miro board and read them back")]
struct Cli {
    #[arg(long, global = true, env = "MIRO_BOARD_ID")]
    board_id: Option<String>,

    #[arg(short, long, global = true, conflicts_with = "quiet", help = "Log per-item progress")]
    verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and errors")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the access token.
    Auth,
    /// Read the board's connectors into an edge list.
    Extract {
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        #[arg(long, help = "Skip connectors that reference missing items")]
        lenient: bool,
    },
    /// Compute generations and positions for an edge list, offline.
    Layout {
        #[arg(long, default_value = "-", help = "Edge list JSON file, or - for stdin")]
        input: String,
        #[arg(long, default_value_t = 1000.0)]
        scale: f64,
    },
    /// Lay out an edge list and draw it on the board.
    Draw {
        #[arg(long, default_value = "-", help = "Edge list JSON file, or - for stdin")]
        input: String,
        #[arg(long, default_value_t = 1000.0)]
        scale: f64,
        #[arg(long, help = "Connect to existing stickies whose text matches a caption")]
        reuse_existing: bool,
    },
    /// Create three stickies and connect them.
    Demo,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Tgf,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli);

    let Cli { board_id, command, .. } = cli;
    match command {
        Command::Auth => run_auth().await,
        Command::Extract { format, lenient } => run_extract(board_id, format, lenient).await,
        Command::Layout { input, scale } => run_layout(&input, scale),
        Command::Draw { input, scale, reuse_existing } => run_draw(board_id, &input, scale, reuse_existing).await,
        Command::Demo => run_demo(board_id).await,
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else if cli.quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn connect(board_id: Option<String>) -> Result<(MiroClient, String), CliError> {
    let config = MiroConfig::from_env()?;
    let board_id = board_id
        .or_else(|| config.board_id.clone())
        .ok_or(MiroError::MissingBoardId)?;
    Ok((MiroClient::new(&config)?, board_id))
}

async fn run_auth() -> Result<(), CliError> {
    let client = MiroClient::new(&MiroConfig::from_env()?)?;
    let info = client.check_token().await?;
    print_json(&info)
}

async fn run_extract(board_id: Option<String>, format: OutputFormat, lenient: bool) -> Result<(), CliError> {
    let (client, board_id) = connect(board_id)?;
    let board = MiroBoard::new(&client, board_id);
    let connectors = board.list_connectors().await?;
    info!(board_id = board.board_id(), connectors = connectors.len(), "listed connectors");

    let graph = if lenient {
        let extraction = stickygraph::extract_lenient(&connectors, &board).await;
        if !extraction.skipped.is_empty() {
            warn!(skipped = extraction.skipped.len(), "some connectors were skipped");
        }
        extraction.graph
    } else {
        stickygraph::extract(&connectors, &board).await?
    };

    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(&graph)?),
        OutputFormat::Tgf => {
            print!("{}", graph.to_tgf());
            Ok(())
        }
    }
}

fn run_layout(input: &str, scale: f64) -> Result<(), CliError> {
    let graph = read_graph(input)?;
    let layout = stickygraph::layout(&graph, scale)?;
    print_json(&serde_json::to_value(layout.nodes())?)
}

async fn run_draw(board_id: Option<String>, input: &str, scale: f64, reuse_existing: bool) -> Result<(), CliError> {
    let graph = read_graph(input)?;
    let layout = stickygraph::layout(&graph, scale)?;
    let (client, board_id) = connect(board_id)?;
    let board = MiroBoard::new(&client, board_id);

    let registry = if reuse_existing {
        NodeRegistry::from_items(&board.list_items().await?)
    } else {
        NodeRegistry::new()
    };
    let report = stickygraph::synchronize_with_registry(&graph, &layout.positions(), &board, registry).await?;
    print_report(&graph, &report)
}

async fn run_demo(board_id: Option<String>) -> Result<(), CliError> {
    let (client, board_id) = connect(board_id)?;
    let board = MiroBoard::new(&client, board_id);

    let graph = CanonicalGraph::from_edges(vec![
        CanonicalEdge::new("A", "points\ntowards", "B"),
        CanonicalEdge::new("A", "points\ntowards", "C"),
    ]);
    let positions: HashMap<String, Position> = [
        ("A".to_owned(), Position::new(0.0, 0.0)),
        ("B".to_owned(), Position::new(700.0, 300.0)),
        ("C".to_owned(), Position::new(700.0, -300.0)),
    ]
    .into_iter()
    .collect();

    let report = stickygraph::synchronize(&graph, &positions, &board).await?;
    print_report(&graph, &report)
}

fn read_graph(input: &str) -> Result<CanonicalGraph, CliError> {
    let text = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Input { path: "stdin".to_owned(), source })?;
        buf
    } else {
        fs::read_to_string(input).map_err(|source| CliError::Input { path: input.to_owned(), source })?
    };
    Ok(CanonicalGraph::from_json_str(&text)?)
}

fn print_report(graph: &CanonicalGraph, report: &SyncReport) -> Result<(), CliError> {
    let nodes: serde_json::Map<String, Value> = graph
        .node_captions()
        .into_iter()
        .filter_map(|caption| report.registry.get(caption).map(|id| (caption.to_owned(), Value::from(id))))
        .collect();
    print_json(&serde_json::json!({
        "nodes_created": report.nodes_created,
        "nodes_reused": report.nodes_reused,
        "connectors_created": report.connectors_created,
        "nodes": nodes,
    }))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
