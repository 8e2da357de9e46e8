//! Row source: turns a directory of spreadsheet files into row batches.
//!
//! Every file with a supported extension is decoded fully into a tabular
//! form, then split into batches of at most `batch_size` rows, in sorted
//! file-listing order. A file that fails to decode is recorded in the scan
//! outcome and skipped, so one bad vintage never aborts the run. Workbooks go
//! through `calamine`; CSV vintages (the original distribution format for
//! several years) go through the `csv` reader with configurable input
//! encoding.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use log::{debug, info, warn};

use crate::{data::Value, dataset::Dataset};

/// One per-file decode failure, reported alongside the successful batches.
#[derive(Debug)]
pub struct DecodeFailure {
    pub file: PathBuf,
    pub cause: String,
}

/// Batches plus the collected per-file failures from one directory scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub batches: Vec<Dataset>,
    pub failures: Vec<DecodeFailure>,
    pub files_decoded: usize,
}

impl ScanOutcome {
    pub fn row_count(&self) -> usize {
        self.batches.iter().map(Dataset::row_count).sum()
    }
}

/// Decodes every supported file under `dir` into row batches.
pub fn scan_directory(
    dir: &Path,
    batch_size: usize,
    csv_encoding: &'static Encoding,
) -> Result<ScanOutcome> {
    let batch_size = batch_size.max(1);
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Listing input directory {dir:?}"))?;
    let files = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .sorted()
        .collect_vec();

    let mut outcome = ScanOutcome::default();
    for path in files {
        let decoded = match file_kind(&path) {
            Some(FileKind::Workbook) => decode_workbook(&path),
            Some(FileKind::Csv) => decode_csv(&path, csv_encoding),
            None => {
                debug!("Skipping unsupported file {path:?}");
                continue;
            }
        };
        match decoded {
            Ok((headers, rows)) => {
                let row_count = rows.len();
                info!("Decoded {path:?}: {row_count} row(s)");
                outcome.files_decoded += 1;
                let mut rows = rows.into_iter();
                loop {
                    let chunk = rows.by_ref().take(batch_size).collect_vec();
                    if chunk.is_empty() {
                        break;
                    }
                    outcome
                        .batches
                        .push(Dataset::from_rows(headers.clone(), chunk));
                }
            }
            Err(err) => {
                warn!("Failed to decode {path:?}: {err:#}");
                outcome.failures.push(DecodeFailure {
                    file: path,
                    cause: format!("{err:#}"),
                });
            }
        }
    }
    Ok(outcome)
}

enum FileKind {
    Workbook,
    Csv,
}

fn file_kind(path: &Path) -> Option<FileKind> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls") => {
            Some(FileKind::Workbook)
        }
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Some(FileKind::Csv),
        _ => None,
    }
}

type DecodedRows = (Vec<String>, Vec<Vec<Option<Value>>>);

fn decode_workbook(path: &Path) -> Result<DecodedRows> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("Workbook has no sheets"))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Reading sheet '{sheet_name}'"))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or_else(|| anyhow!("Sheet '{sheet_name}' has no header row"))?
        .iter()
        .map(header_text)
        .collect_vec();
    let data = rows
        .map(|row| row.iter().map(cell_to_value).collect_vec())
        .collect_vec();
    Ok((headers, data))
}

fn decode_csv(path: &Path, encoding: &'static Encoding) -> Result<DecodedRows> {
    let file = std::fs::File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let headers = reader
        .byte_headers()
        .context("Reading CSV headers")?
        .iter()
        .map(|field| decode_bytes(field, encoding).map(|text| text.trim().to_string()))
        .collect::<Result<Vec<_>>>()?;

    let mut data = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let row = record
            .iter()
            .map(|field| {
                decode_bytes(field, encoding).map(|text| {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(Value::String(trimmed.to_string()))
                    }
                })
            })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Decoding row {}", idx + 2))?;
        data.push(row);
    }
    Ok((headers, data))
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Raw workbook cells become trimmed text; typing happens in the cleaners.
fn cell_to_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(Value::String(trimmed.to_string()))
            }
        }
        Data::Int(i) => Some(Value::String(i.to_string())),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                Some(Value::String(format!("{}", *f as i64)))
            } else {
                Some(Value::String(f.to_string()))
            }
        }
        Data::Bool(b) => Some(Value::String(if *b { "True" } else { "False" }.to_string())),
        Data::DateTime(dt) => dt.as_datetime().map(|stamp| {
            let rendered = if stamp.time() == chrono::NaiveTime::MIN {
                stamp.format("%Y-%m-%d").to_string()
            } else {
                stamp.format("%Y-%m-%d %H:%M:%S").to_string()
            };
            Value::String(rendered)
        }),
        Data::Error(_) => None,
        other => {
            let rendered = other.to_string();
            let trimmed = rendered.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(Value::String(trimmed.to_string()))
            }
        }
    }
}
