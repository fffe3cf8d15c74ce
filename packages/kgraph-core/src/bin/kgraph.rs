//! Knowledge Graph CLI
//!
//! Fuzzy merge of extracted subgraphs and scoring against reference graphs.
//!
//! # Usage
//!
//! ```bash
//! # Fold two extraction results into an accumulated graph
//! kgraph merge accumulated.json page-1.json page-2.json -o accumulated.json
//!
//! # Score a prediction against a hand-labelled graph
//! kgraph --preset lenient evaluate --predicted pred.json --reference gold.json --buckets
//!
//! # Print the graph as a tree rooted at its products
//! kgraph list graph.json --type Product --tree
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use kgraph_core::config::{KnowledgeGraphConfig, Preset, ValidatedConfig};
use kgraph_core::features::evaluation::{EvaluationSummary, GraphEvaluator};
use kgraph_core::features::listing::{bfs_tree, entities_by_type, render_tree, root_nodes};
use kgraph_core::features::reconcile::{ReconcileOutput, Reconciler};
use kgraph_core::shared::models::Graph;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kgraph")]
#[command(about = "Knowledge graph reconciliation and evaluation", long_about = None)]
struct Cli {
    /// YAML configuration file (version 1)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Preset used when no configuration file is given
    #[arg(short, long, global = true, default_value = "balanced")]
    preset: Preset,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fold candidate graphs into an accumulated graph
    Merge {
        /// Accumulated graph
        accumulated: PathBuf,

        /// Candidate graphs, merged in order
        #[arg(required = true)]
        candidates: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Collapse duplicate nodes and edges within one graph
    Compact {
        graph: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Score predicted graphs against reference graphs
    Evaluate {
        /// Predicted graphs
        #[arg(long, required = true, num_args = 1..)]
        predicted: Vec<PathBuf>,

        /// Reference graphs, paired with --predicted by position
        #[arg(long, required = true, num_args = 1..)]
        reference: Vec<PathBuf>,

        /// Print alignments grouped by score
        #[arg(long)]
        buckets: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the nodes of a graph
    List {
        graph: PathBuf,

        /// Only nodes with this type label
        #[arg(short = 't', long = "type")]
        entity_type: Option<String>,

        /// Print a tree grown backwards from the selected nodes and the graph roots
        #[arg(long)]
        tree: bool,
    },

    /// Print the effective configuration as YAML
    ShowConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref(), cli.preset)?;

    match cli.command {
        Commands::Merge {
            accumulated,
            candidates,
            output,
        } => run_merge(&config, &accumulated, &candidates, &output),
        Commands::Compact { graph, output } => run_compact(&config, &graph, &output),
        Commands::Evaluate {
            predicted,
            reference,
            buckets,
            json,
        } => run_evaluate(&config, &predicted, &reference, buckets, json),
        Commands::List {
            graph,
            entity_type,
            tree,
        } => run_list(&graph, entity_type.as_deref(), tree),
        Commands::ShowConfig => {
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>, preset: Preset) -> Result<ValidatedConfig> {
    let config = match path {
        Some(path) => KnowledgeGraphConfig::from_yaml(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => KnowledgeGraphConfig::preset(preset).build()?,
    };
    info!(preset = %config.preset(), "Configuration loaded");
    Ok(config)
}

fn read_graph(path: &Path) -> Result<Graph> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Graph::from_json(&json).with_context(|| format!("Invalid graph file {}", path.display()))
}

fn write_graph(path: &Path, graph: &Graph) -> Result<()> {
    fs::write(path, graph.to_json_pretty()?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn report_reconcile(output: &ReconcileOutput) {
    println!(
        "nodes {} -> {}, edges {} -> {} ({} ms)",
        output.stats.nodes_in,
        output.stats.nodes_out,
        output.stats.edges_in,
        output.stats.edges_out,
        output.stats.execution_time_ms
    );
}

fn run_merge(
    config: &ValidatedConfig,
    accumulated: &Path,
    candidates: &[PathBuf],
    output: &Path,
) -> Result<()> {
    let reconciler = Reconciler::new(config.reconcile().clone());
    let mut graph = read_graph(accumulated)?;

    for candidate in candidates {
        let merged = reconciler.merge(&graph, &read_graph(candidate)?)?;
        print!("{}: ", candidate.display());
        report_reconcile(&merged);
        graph = merged.graph;
    }

    write_graph(output, &graph)
}

fn run_compact(config: &ValidatedConfig, input: &Path, output: &Path) -> Result<()> {
    let compacted = Reconciler::new(config.reconcile().clone()).compact(&read_graph(input)?)?;
    report_reconcile(&compacted);
    write_graph(output, &compacted.graph)
}

fn run_evaluate(
    config: &ValidatedConfig,
    predicted: &[PathBuf],
    reference: &[PathBuf],
    buckets: bool,
    json: bool,
) -> Result<()> {
    if predicted.len() != reference.len() {
        bail!(
            "{} predicted graphs but {} reference graphs",
            predicted.len(),
            reference.len()
        );
    }

    let evaluator = GraphEvaluator::new(config.evaluation().clone())?;
    let threshold = config.evaluation().match_threshold;
    let mut reports = Vec::with_capacity(predicted.len());

    for (pred_path, ref_path) in predicted.iter().zip(reference) {
        let report = evaluator.evaluate(&read_graph(pred_path)?, &read_graph(ref_path)?)?;

        if !json {
            println!("== {} vs {}", pred_path.display(), ref_path.display());
            println!(
                "correct {} / predicted {} / reference {}",
                report.stats.num_correct, report.stats.num_pred, report.stats.num_gold
            );
            println!(
                "precision {:.4}  recall {:.4}  f1 {:.4}  f{} {:.4}",
                report.precision, report.recall, report.f1, report.beta, report.f_beta
            );
            match report.edit_distance.value() {
                Some(ged) if report.edit_distance.is_exact() => println!("edit distance {ged}"),
                Some(ged) => println!("edit distance <= {ged} (timed out)"),
                None => println!("edit distance unknown (timed out)"),
            }
            if buckets {
                println!("{}", report.buckets(threshold).render());
            }
        }
        reports.push(report);
    }

    let summary = EvaluationSummary::from_reports(&reports);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if reports.len() > 1 {
        println!(
            "== mean over {} documents: precision {:.4}  recall {:.4}  f1 {:.4}",
            summary.documents, summary.precision, summary.recall, summary.f1
        );
    }
    Ok(())
}

fn run_list(path: &Path, entity_type: Option<&str>, tree: bool) -> Result<()> {
    let graph = read_graph(path)?;

    if tree {
        let mut roots = entity_type
            .map(|t| entities_by_type(&graph, t))
            .unwrap_or_default();
        roots.extend(root_nodes(&graph));
        for line in render_tree(&graph, &bfs_tree(&graph, &roots)) {
            println!("{line}");
        }
        return Ok(());
    }

    for node in graph.nodes() {
        if entity_type.is_some_and(|t| node.entity_type != t) {
            continue;
        }
        println!("{}\t{}\t{}", node.id, node.entity_type, node.name);
    }
    Ok(())
}
