//! End-to-end orchestration: scan, clean per batch, assemble, upsert.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use log::{info, warn};

use crate::{
    assemble,
    cleaners,
    cli::{LoadArgs, PreviewArgs},
    dataset::Dataset,
    parents::ParentLookup,
    sink::{self, PostgrestClient, RetryPolicy},
    source::{self, DecodeFailure},
    table,
};

/// Runs the pipeline up to the assembled dataset: decode every supported
/// file into batches, clean each batch, merge, reconcile once, prune.
/// Decode failures come back alongside the dataset so callers can report
/// them without aborting.
pub fn run(
    input: &Path,
    parents: &ParentLookup,
    batch_size: usize,
    csv_encoding: &'static Encoding,
) -> Result<(Dataset, Vec<DecodeFailure>)> {
    let outcome = source::scan_directory(input, batch_size, csv_encoding)?;
    info!(
        "Decoded {} file(s) into {} batch(es), {} row(s)",
        outcome.files_decoded,
        outcome.batches.len(),
        outcome.row_count()
    );

    let mut batches = outcome.batches;
    for batch in &mut batches {
        cleaners::clean_batch(batch, parents);
    }
    let dataset = assemble::assemble(batches);
    Ok((dataset, outcome.failures))
}

pub fn execute(args: &LoadArgs) -> Result<()> {
    let csv_encoding = source::resolve_encoding(args.input_encoding.as_deref())?;
    let parents = ParentLookup::load(&args.parents)?;
    info!(
        "Loaded {} parent company fragment(s) from {:?}",
        parents.len(),
        args.parents
    );

    let (dataset, failures) = run(&args.input, &parents, args.batch_size, csv_encoding)?;
    report_failures(&failures);
    info!(
        "Assembled {} record(s) across {} column(s)",
        dataset.row_count(),
        dataset.column_count()
    );

    let records = assemble::to_records(&dataset);
    if records.is_empty() {
        info!("No records to upsert");
        return Ok(());
    }
    if args.dry_run {
        info!("Dry run: skipping upsert of {} record(s)", records.len());
        return Ok(());
    }

    let endpoint = args
        .endpoint
        .as_deref()
        .ok_or_else(|| anyhow!("--endpoint is required unless --dry-run is set"))?;
    let api_key = std::env::var(&args.key_env)
        .with_context(|| format!("Reading the service key from ${}", args.key_env))?;
    let client = PostgrestClient::new(endpoint, api_key);
    let policy = retry_policy(args);
    sink::upsert_with_retry(&client, &args.table, &records, &policy)
        .with_context(|| format!("Upserting {} record(s) into '{}'", records.len(), args.table))?;

    if failures.is_empty() {
        info!("Run complete");
    } else {
        warn!("Run complete with {} skipped file(s)", failures.len());
    }
    Ok(())
}

pub fn execute_preview(args: &PreviewArgs) -> Result<()> {
    let csv_encoding = source::resolve_encoding(args.input_encoding.as_deref())?;
    let parents = match &args.parents {
        Some(path) => ParentLookup::load(path)?,
        None => ParentLookup::default(),
    };

    let (dataset, failures) = run(&args.input, &parents, args.batch_size, csv_encoding)?;
    report_failures(&failures);

    let selected = args
        .columns
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    let headers = if selected.is_empty() {
        dataset.column_names().to_vec()
    } else {
        for name in &selected {
            if !dataset.has_column(name) {
                return Err(anyhow!("Requested column '{name}' not found"));
            }
        }
        selected
    };

    let shown = args.rows.min(dataset.row_count());
    let mut rows = Vec::with_capacity(shown);
    for row in 0..shown {
        rows.push(
            headers
                .iter()
                .map(|name| {
                    dataset
                        .cell(name, row)
                        .map(|value| value.as_display())
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>(),
        );
    }
    table::print_table(&headers, &rows);
    info!(
        "Displayed {shown} of {} row(s) from {:?}",
        dataset.row_count(),
        args.input
    );
    Ok(())
}

fn retry_policy(args: &LoadArgs) -> RetryPolicy {
    let min_backoff = Duration::from_secs(args.min_backoff_secs);
    RetryPolicy {
        max_attempts: args.max_attempts.max(1),
        min_backoff,
        max_backoff: Duration::from_secs(args.max_backoff_secs).max(min_backoff),
    }
}

fn report_failures(failures: &[DecodeFailure]) {
    for failure in failures {
        warn!("Skipped {:?}: {}", failure.file, failure.cause);
    }
}
