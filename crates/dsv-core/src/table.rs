//! Parsed table type and its projections

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// One row viewed as header name -> cell value, in column order
pub type Record<V> = IndexMap<String, V>;

/// A parsed table: one header plus rows of identical length
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table<H = String, V = String> {
    pub(crate) header: Vec<H>,
    pub(crate) rows: Vec<Vec<V>>,
}

impl<H, V> Table<H, V> {
    /// Create a table, checking that every row matches the header length
    pub fn new(header: Vec<H>, rows: Vec<Vec<V>>) -> Result<Self> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != header.len())
        {
            return Err(Error::InconsistentShape {
                expected: header.len(),
                found: cells.len(),
                row,
            });
        }
        Ok(Self { header, rows })
    }

    /// Column names, one per column
    pub fn header(&self) -> &[H] {
        &self.header
    }

    /// Data rows, header excluded
    pub fn rows(&self) -> &[Vec<V>] {
        &self.rows
    }

    /// Get a data row by index
    pub fn row(&self, index: usize) -> Option<&[V]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Get the number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_parts(self) -> (Vec<H>, Vec<Vec<V>>) {
        (self.header, self.rows)
    }

    /// Transform every header entry, leaving rows untouched
    pub fn map_header<T, F>(self, f: F) -> Table<T, V>
    where
        F: FnMut(H) -> T,
    {
        Table {
            header: self.header.into_iter().map(f).collect(),
            rows: self.rows,
        }
    }

    /// Transform every data cell, leaving the header untouched
    pub fn map_values<U, F>(self, mut f: F) -> Table<H, U>
    where
        F: FnMut(V) -> U,
    {
        Table {
            header: self.header,
            rows: self
                .rows
                .into_iter()
                .map(|row| row.into_iter().map(&mut f).collect())
                .collect(),
        }
    }

    /// One record per row, keyed by header name.
    ///
    /// Positions past the end of the header are keyed `col_<i>`. When header
    /// names repeat, the key keeps its first position and the last value.
    pub fn records(&self) -> Vec<Record<V>>
    where
        H: ToString,
        V: Clone,
    {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, value)| {
                        let key = self
                            .header
                            .get(i)
                            .map(ToString::to_string)
                            .unwrap_or_else(|| format!("col_{}", i));
                        (key, value.clone())
                    })
                    .collect()
            })
            .collect()
    }
}

impl<H: AsRef<str>, V> Table<H, V> {
    /// Find the index of the first column with this name
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.as_ref() == name)
    }
}

impl<T: Clone> Table<T, T> {
    /// Header followed by every row
    pub fn matrix(&self) -> Vec<Vec<T>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}
