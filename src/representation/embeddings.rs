//! Preset memorandum embeddings.
//!
//! Memoranda can take their LTM vectors from a precomputed table (for
//! instance PCA-reduced sentence embeddings) instead of random patterns.
//!
//! The table is a delimited numeric file, one row of `N_ITEM_UNITS` values per
//! memorandum, no header. Trailing delimiters are tolerated:
//! ```text
//! 0.12,0.55,0.98,...,0.31,
//! 0.44,0.02,0.61,...,0.77,
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::{MAX_MEMORANDA, N_ITEM_UNITS};
use crate::error::{Result, SimulationError};
use crate::representation::item::ItemVector;

/// One LTM vector per memorandum slot.
#[derive(Clone, Debug)]
pub struct EmbeddingTable {
    rows: Vec<ItemVector>,
}

impl EmbeddingTable {
    /// Load a table from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(file, b',', path)
    }

    /// Parse a table from any reader.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        Self::parse(reader, delimiter, Path::new("<reader>"))
    }

    fn parse<R: Read>(reader: R, delimiter: u8, origin: &Path) -> Result<Self> {
        let fail = |reason: String| SimulationError::Embeddings {
            path: PathBuf::from(origin),
            reason,
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::with_capacity(MAX_MEMORANDA);
        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let mut values = Vec::with_capacity(N_ITEM_UNITS);
            for (col, field) in record.iter().enumerate() {
                if field.is_empty() {
                    continue;
                }
                let v: f64 = field.parse().map_err(|e| {
                    fail(format!("row {}, col {}: bad float {:?}: {}", row_idx + 1, col + 1, field, e))
                })?;
                values.push(v);
            }
            if values.is_empty() {
                continue;
            }
            if values.len() != N_ITEM_UNITS {
                return Err(fail(format!(
                    "row {}: expected {} values, got {}",
                    row_idx + 1,
                    N_ITEM_UNITS,
                    values.len()
                )));
            }
            rows.push(ItemVector::from_raw(&values));
        }

        if rows.len() < MAX_MEMORANDA {
            return Err(fail(format!(
                "expected {} rows (one per memorandum slot), got {}",
                MAX_MEMORANDA,
                rows.len()
            )));
        }
        if rows.len() > MAX_MEMORANDA {
            tracing::warn!(
                "embedding table {} has {} rows, only the first {} are used",
                origin.display(),
                rows.len(),
                MAX_MEMORANDA
            );
            rows.truncate(MAX_MEMORANDA);
        }

        Ok(Self { rows })
    }

    /// LTM vector of the `n`-th memorandum.
    pub fn row(&self, n: usize) -> Option<&ItemVector> {
        self.rows.get(n)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representation::item::Feature;

    fn table_text(rows: usize, trailing: &str) -> String {
        (0..rows)
            .map(|r| {
                let cells: Vec<String> = (0..N_ITEM_UNITS)
                    .map(|c| format!("{:.2}", ((r * 7 + c) % 100) as f64 / 100.0))
                    .collect();
                format!("{}{}", cells.join(","), trailing)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_parse_table() {
        let text = table_text(MAX_MEMORANDA, "");
        let table = EmbeddingTable::from_reader(text.as_bytes(), b',').unwrap();
        assert_eq!(table.len(), MAX_MEMORANDA);
        let row = table.row(1).unwrap();
        assert_eq!(row.len(), N_ITEM_UNITS);
        assert_eq!(row.get(0), Feature::Value(0.07));
    }

    #[test]
    fn test_trailing_delimiter_tolerated() {
        let text = table_text(MAX_MEMORANDA, ",");
        let table = EmbeddingTable::from_reader(text.as_bytes(), b',').unwrap();
        assert_eq!(table.row(9).unwrap().len(), N_ITEM_UNITS);
    }

    #[test]
    fn test_extra_rows_truncated() {
        let text = table_text(MAX_MEMORANDA + 3, "");
        let table = EmbeddingTable::from_reader(text.as_bytes(), b',').unwrap();
        assert_eq!(table.len(), MAX_MEMORANDA);
    }

    #[test]
    fn test_too_few_rows_rejected() {
        let text = table_text(3, "");
        let err = EmbeddingTable::from_reader(text.as_bytes(), b',').unwrap_err();
        assert!(err.to_string().contains("expected 10 rows"), "{}", err);
    }

    #[test]
    fn test_short_row_rejected() {
        let mut text = table_text(MAX_MEMORANDA, "");
        text.push_str("\n0.1,0.2");
        let err = EmbeddingTable::from_reader(text.as_bytes(), b',').unwrap_err();
        assert!(err.to_string().contains("expected 100 values"), "{}", err);
    }

    #[test]
    fn test_bad_float_rejected() {
        let text = table_text(MAX_MEMORANDA, "").replacen("0.00", "abc", 1);
        let err = EmbeddingTable::from_reader(text.as_bytes(), b',').unwrap_err();
        assert!(err.to_string().contains("bad float"), "{}", err);
    }

    #[test]
    fn test_missing_file() {
        let err = EmbeddingTable::from_path(Path::new("/nonexistent/embeddings.csv")).unwrap_err();
        assert!(matches!(err, SimulationError::Io(_)));
    }
}
