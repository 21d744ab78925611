//! # CLI Command Implementation
//!
//! The single `analyze` command: load a graph, enumerate candidates, and
//! print either a query-coverage report or the two top-5 rankings,
//! in text or JSON.

// Rendering a percentage for display is the only float arithmetic in this
// binary; `concretize-core::scoring` relaxes the same workspace lint for
// the same reason.
#![allow(clippy::float_arithmetic)]

use concretize_core::{
    analyze_recordable, coverage_freq_score, coverage_score, filter_cover, load_from_path,
    report_entry, sort_by_coverage_freq_score, sort_by_coverage_score, AnalysisError, Category,
    Graph, NodeId, RecordableInst, ReportEntry, DEFAULT_BYTE_COST, DEFAULT_REPORT_TOP_N,
};
use serde::Serialize;

use super::Cli;
use crate::config;

/// Resolved knobs after layering CLI flags over an optional config file over
/// the built-in defaults. Flags win over the file; the file wins over the
/// built-in default.
struct Settings {
    top: usize,
    byte_cost: u64,
    json: bool,
}

fn resolve_settings(cli: &Cli) -> Result<Settings, AnalysisError> {
    let file = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::FileConfig::default(),
    };

    Ok(Settings {
        top: cli.top.or(file.top).unwrap_or(DEFAULT_REPORT_TOP_N),
        byte_cost: cli.byte_cost.or(file.byte_cost).unwrap_or(DEFAULT_BYTE_COST),
        json: cli.json || file.json.unwrap_or(false),
    })
}

/// Entry point invoked by `cli::execute`.
pub fn cmd_analyze(cli: &Cli) -> Result<(), AnalysisError> {
    let settings = resolve_settings(cli)?;
    let graph = load_from_path(&cli.graph)?;

    print_status_line(&graph, settings.json);

    let query_nodes: Vec<&concretize_core::Node> = graph
        .nodes()
        .filter(|n| n.category == Category::Query)
        .collect();

    if cli.query || !query_nodes.is_empty() {
        report_query_coverage(&graph, &query_nodes, &settings)
    } else {
        report_top_rankings(&graph, &settings)
    }
}

fn print_status_line(graph: &Graph, json: bool) {
    if json {
        return;
    }
    println!(
        "{} nodes, {} edges, max idep {}",
        graph.node_count(),
        graph.edge_count(),
        graph.max_idep()
    );
}

/// Single-entry sequences: every candidate from `analyze_recordable` stands
/// alone as its own alternative recording plan, per §4.4's "alternatives,
/// not a sequence" contract.
fn single_entry_sequences(candidates: Vec<RecordableInst>) -> Vec<Vec<RecordableInst>> {
    candidates.into_iter().map(|c| vec![c]).collect()
}

fn report_query_coverage(
    graph: &Graph,
    query_nodes: &[&concretize_core::Node],
    settings: &Settings,
) -> Result<(), AnalysisError> {
    let candidates = analyze_recordable(graph, &[])?;
    let sequences = single_entry_sequences(candidates);

    let mut reports = Vec::new();
    for node in query_nodes {
        let covering = filter_cover(&sequences, &node.id);
        let entries: Vec<Vec<ReportEntry>> = covering
            .iter()
            .map(|seq| seq.iter().map(|e| report_entry(graph, e, settings.byte_cost)).collect())
            .collect();

        if settings.json {
            reports.push(QueryCoverageReport {
                query_kinst: node.kinst.clone(),
                query_node: node.id.clone(),
                covering_sequences: entries,
            });
        } else {
            print_query_coverage_text(node, &covering, graph, settings.byte_cost);
        }
    }

    if settings.json {
        print_json(&reports)?;
    }

    Ok(())
}

fn print_query_coverage_text(
    node: &concretize_core::Node,
    covering: &[&Vec<RecordableInst>],
    graph: &Graph,
    byte_cost: u64,
) {
    println!();
    println!("query node {} (kinst {})", node.id, node.kinst);
    if covering.is_empty() {
        println!("  no candidate sequence covers this node");
        return;
    }
    for sequence in covering {
        let kinsts: Vec<&str> = sequence.iter().map(|e| e.kinst.as_str()).collect();
        let cs = coverage_score(graph, sequence);
        let csf = coverage_freq_score(graph, sequence, byte_cost);
        println!(
            "  covered by [{}]  CS={:.2}  CSF={}",
            kinsts.join(", "),
            cs,
            csf.map_or_else(|| "undefined".to_string(), |v| format!("{v:.4}"))
        );
    }
}

fn report_top_rankings(graph: &Graph, settings: &Settings) -> Result<(), AnalysisError> {
    let mut by_coverage = analyze_recordable(graph, &[])?;
    let mut by_coverage_freq = by_coverage.clone();

    sort_by_coverage_score(graph, &mut by_coverage);
    sort_by_coverage_freq_score(graph, &mut by_coverage_freq, settings.byte_cost);

    let top_coverage: Vec<&RecordableInst> =
        by_coverage.iter().rev().take(settings.top).collect();
    let top_coverage_freq: Vec<&RecordableInst> =
        by_coverage_freq.iter().rev().take(settings.top).collect();

    if settings.json {
        let report = TopRankingsReport {
            by_coverage_score: top_coverage
                .iter()
                .map(|e| report_entry(graph, e, settings.byte_cost))
                .collect(),
            by_coverage_freq_score: top_coverage_freq
                .iter()
                .map(|e| report_entry(graph, e, settings.byte_cost))
                .collect(),
        };
        print_json(&report)?;
    } else {
        println!();
        println!("top {} by coverage score:", settings.top);
        for entry in &top_coverage {
            print_ranking_line(graph, entry, settings.byte_cost);
        }
        println!();
        println!("top {} by coverage/frequency score:", settings.top);
        for entry in &top_coverage_freq {
            print_ranking_line(graph, entry, settings.byte_cost);
        }
    }

    Ok(())
}

fn print_ranking_line(graph: &Graph, entry: &RecordableInst, byte_cost: u64) {
    let report = report_entry(graph, entry, byte_cost);
    let labels = if report.labels.is_empty() {
        "-".to_string()
    } else {
        report.labels.join(",")
    };
    println!(
        "  {:<16} width={:<4} freq={:<6} rec={:<4} hidden={:<4} concretized={:<4} ({:.1}%)  CS={:.2}  CSF={}  residual_idep={}  [{}]",
        report.kinst,
        report.width,
        report.freq,
        report.rec_count,
        report.hidden_count,
        report.concretized_count,
        report.concretized_fraction * 100.0,
        report.coverage_score,
        report.coverage_freq_score.map_or_else(|| "undefined".to_string(), |v| format!("{v:.4}")),
        report.residual_max_idep,
        labels
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AnalysisError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AnalysisError::Schema(format!("failed to serialize report: {e}")))?;
    println!("{text}");
    Ok(())
}

#[derive(Debug, Serialize)]
struct QueryCoverageReport {
    query_kinst: String,
    query_node: NodeId,
    covering_sequences: Vec<Vec<ReportEntry>>,
}

#[derive(Debug, Serialize)]
struct TopRankingsReport {
    by_coverage_score: Vec<ReportEntry>,
    by_coverage_freq_score: Vec<ReportEntry>,
}
