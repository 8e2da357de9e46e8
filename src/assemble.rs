//! Record assembly: merge cleaned batches, reconcile once, prune, convert.

use log::info;

use crate::{data, dataset::Dataset, reconcile};

/// Merges cleaned batches into the final upsert-ready dataset.
///
/// Batches concatenate in arrival order with columns aligned by name; the
/// reconciler then runs exactly once over the complete merged dataset so
/// alias resolution sees the final column set; columns that are absent in
/// every record are dropped last.
pub fn assemble(batches: Vec<Dataset>) -> Dataset {
    let mut merged = merge_batches(batches);
    reconcile::reconcile(&mut merged);
    prune_empty_columns(&mut merged);
    merged
}

pub fn merge_batches(batches: Vec<Dataset>) -> Dataset {
    let mut merged = Dataset::new();
    for batch in batches {
        merged.append(batch);
    }
    merged
}

/// Drops columns whose every cell is absent across the whole dataset.
pub fn prune_empty_columns(dataset: &mut Dataset) {
    let before = dataset.column_count();
    dataset.retain_columns(|_, cells| cells.iter().any(Option::is_some));
    let dropped = before - dataset.column_count();
    if dropped > 0 {
        info!("Dropped {dropped} empty column(s)");
    }
}

/// Converts each row into a JSON object keyed by column name; absence
/// becomes JSON null.
pub fn to_records(dataset: &Dataset) -> Vec<serde_json::Value> {
    (0..dataset.row_count())
        .map(|row| {
            let mut object = serde_json::Map::with_capacity(dataset.column_count());
            for name in dataset.column_names() {
                object.insert(name.clone(), data::cell_to_json(dataset.cell(name, row)));
            }
            serde_json::Value::Object(object)
        })
        .collect()
}
