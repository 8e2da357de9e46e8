//! Column-major table used for both row batches and the merged dataset.
//!
//! Column names keep their declared order; every column holds one
//! `Option<Value>` cell per row. Batches produced by the row source and the
//! merged dataset assembled from them share this one shape, so the
//! reconciler and the cleaners operate on a single representation.

use crate::data::Value;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Vec<Option<Value>>>,
    rows: usize,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dataset from a header row and row-major cells. Ragged rows
    /// are padded with absence so every column has one cell per row.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Option<Value>>>) -> Self {
        let width = headers.len();
        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        for mut row in rows {
            row.resize(width, None);
            for (idx, cell) in row.into_iter().enumerate() {
                columns[idx].push(cell);
            }
        }
        let rows = columns.first().map(Vec::len).unwrap_or(0);
        Dataset {
            names: headers,
            columns,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&[Option<Value>]> {
        self.column_index(name)
            .map(|idx| self.columns[idx].as_slice())
    }

    pub fn cell(&self, name: &str, row: usize) -> Option<&Value> {
        self.column(name).and_then(|col| col.get(row)).and_then(Option::as_ref)
    }

    /// Names of columns accepted by the selector, in declared order.
    pub fn select_columns<F>(&self, mut selector: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        self.names
            .iter()
            .filter(|name| selector(name))
            .cloned()
            .collect()
    }

    /// Rewrites every cell of the named column through `f`. Returns false
    /// when the column does not exist.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(Option<Value>) -> Option<Value>,
    {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for cell in &mut self.columns[idx] {
            *cell = f(cell.take());
        }
        true
    }

    /// Appends a column, padding or truncating to the current row count.
    pub fn push_column(&mut self, name: impl Into<String>, mut cells: Vec<Option<Value>>) {
        if self.names.is_empty() && self.rows == 0 {
            self.rows = cells.len();
        }
        cells.resize(self.rows, None);
        self.names.push(name.into());
        self.columns.push(cells);
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Vec<Option<Value>>> {
        let idx = self.column_index(name)?;
        self.names.remove(idx);
        Some(self.columns.remove(idx))
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.names[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Appends another dataset's rows, aligning columns by name. Columns
    /// missing on either side are padded with absence.
    pub fn append(&mut self, other: Dataset) {
        let incoming_rows = other.rows;
        for name in &other.names {
            if !self.has_column(name) {
                self.names.push(name.clone());
                self.columns.push(vec![None; self.rows]);
            }
        }
        let mut other = other;
        for (idx, name) in self.names.iter().enumerate() {
            match other.column_index(name) {
                Some(src) => {
                    // A duplicated header in the incoming batch yields one
                    // populated column; any repeat aligns as absence.
                    let mut cells = std::mem::take(&mut other.columns[src]);
                    cells.resize(incoming_rows, None);
                    self.columns[idx].extend(cells);
                }
                None => self.columns[idx].extend(std::iter::repeat_with(|| None).take(incoming_rows)),
            }
        }
        self.rows += incoming_rows;
    }

    /// Drops columns rejected by the predicate, preserving declared order.
    pub fn retain_columns<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &[Option<Value>]) -> bool,
    {
        let mut idx = 0;
        while idx < self.names.len() {
            if keep(&self.names[idx], &self.columns[idx]) {
                idx += 1;
            } else {
                self.names.remove(idx);
                self.columns.remove(idx);
            }
        }
    }
}
