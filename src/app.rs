//! Application pipeline: scan, cluster, classify, render, relocate.

use anyhow::Context;

use crate::actions::{delete_selected, move_selected, BatchOutcome};
use crate::cli::{Cli, OutputFormat, SelectMode};
use crate::clusters::{classify, cluster_records, select_identical, select_similar, Cluster};
use crate::error::ExitCode;
use crate::logging::init_logging;
use crate::output::{build_report, render_json, render_text};
use crate::progress::Progress;
use crate::scanner::{scan_with, ImageRecord, ScanOptions};

/// Run the full pipeline for one CLI invocation.
///
/// # Errors
///
/// Returns an error for fatal conditions only (unreadable scan root,
/// unwritable destination directory, report serialization); per-file
/// scan and relocation failures are reported in the output and mapped
/// to [`ExitCode::PartialSuccess`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);

    let progress = Progress::new(cli.quiet);
    let options = ScanOptions {
        recursive: !cli.no_recurse,
        threads: cli.threads,
    };
    let outcome = scan_with(&cli.path, &options, &progress)
        .with_context(|| format!("failed to scan {}", cli.path.display()))?;

    if outcome.is_empty() {
        if !cli.quiet {
            println!("No image files found under {}.", cli.path.display());
        }
        return Ok(ExitCode::NothingFound);
    }

    if !outcome.errors.is_empty() {
        for (kind, count) in outcome.error_counts() {
            log::info!("{count} file(s) failed with: {kind}");
        }
    }

    let mut records = outcome.records;
    let scan_errors = outcome.errors;

    let mut clusters = cluster_records(&records, cli.threshold);
    for cluster in &mut clusters {
        classify(cluster, &records);
    }

    let relocating = cli.move_to.is_some() || cli.delete;
    if relocating {
        let selected = auto_select(&clusters, &mut records, cli.select);
        log::info!("{selected} file(s) selected for relocation");
    }

    render(&cli, &records, &clusters, &scan_errors)?;

    let op_outcome = if let Some(dest) = &cli.move_to {
        std::fs::create_dir_all(dest)
            .with_context(|| format!("cannot create destination {}", dest.display()))?;
        Some(move_selected(&mut records, dest))
    } else if cli.delete {
        Some(delete_selected(&mut records, cli.yes))
    } else {
        None
    };

    if let Some(ref op) = op_outcome {
        report_op(cli.quiet, op);
    }

    let had_op_errors = op_outcome.as_ref().is_some_and(|op| !op.all_succeeded());
    if !scan_errors.is_empty() || had_op_errors {
        Ok(ExitCode::PartialSuccess)
    } else if clusters.is_empty() {
        Ok(ExitCode::NothingFound)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Run the configured auto-selection passes over every cluster.
fn auto_select(clusters: &[Cluster], records: &mut [ImageRecord], mode: SelectMode) -> usize {
    let mut selected = 0;
    for cluster in clusters {
        if matches!(mode, SelectMode::Identical | SelectMode::All) {
            selected += select_identical(cluster, records);
        }
        if matches!(mode, SelectMode::Similar | SelectMode::All) {
            selected += select_similar(cluster, records);
        }
    }
    selected
}

/// Print the cluster report to stdout.
fn render(
    cli: &Cli,
    records: &[ImageRecord],
    clusters: &[Cluster],
    scan_errors: &[crate::scanner::ScanError],
) -> anyhow::Result<()> {
    match cli.output {
        OutputFormat::Json => {
            let report = build_report(&cli.path, cli.threshold, records, clusters, scan_errors);
            println!("{}", render_json(&report).context("failed to encode report")?);
        }
        OutputFormat::Text => {
            if cli.quiet {
                return Ok(());
            }
            if clusters.is_empty() {
                println!("No similar images found.");
            } else {
                print!("{}", render_text(records, clusters, scan_errors));
            }
        }
    }
    Ok(())
}

/// Print the move/delete summary to stdout.
fn report_op(quiet: bool, op: &BatchOutcome) {
    if quiet {
        return;
    }
    println!("{}", op.summary("Processed"));
    for err in &op.errors {
        eprintln!("  failed: {err}");
    }
}
