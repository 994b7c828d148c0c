//! Coordinate-sorted BED output
//!
//! Converted rows for one input file are accumulated in memory keyed by
//! (normalized chromosome, start position) and flushed to disk in sorted
//! order: chromosomes ascending by numeric key (autosomes 1-22, X=23,
//! Y=24), start positions ascending within a chromosome, arrival order
//! within a start position. The output has no header line; the schema
//! lives in the `header.schema` sidecar.

use crate::core::error::ConvertError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Number of fields in a converted output row
pub const OUTPUT_FIELD_COUNT: usize = 18;

/// Output filename suffix; the same aliquot can back multiple experiments
pub const OUTPUT_SUFFIX: &str = "-mbv";

/// Normalize a chromosome token to its numeric sort key
///
/// `chr` prefix is ignored; X maps to 23 and Y to 24. Tokens outside
/// 1-24 (mitochondrial, alt contigs, `*`) have no key and the row is
/// dropped during validation.
pub fn chrom_sort_key(chrom: &str) -> Option<u32> {
    let body = chrom.strip_prefix("chr").unwrap_or(chrom);
    let key = match body {
        "X" | "x" => 23,
        "Y" | "y" => 24,
        other => other.parse::<u32>().ok()?,
    };
    if (1..=24).contains(&key) {
        Some(key)
    } else {
        None
    }
}

/// One fully-enriched 18-field output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedRow {
    pub fields: [String; OUTPUT_FIELD_COUNT],
}

impl ConvertedRow {
    /// Render as one tab-separated line (no trailing newline)
    pub fn to_line(&self) -> String {
        self.fields.join("\t")
    }
}

/// In-memory accumulator with two-level coordinate ordering
///
/// Created fresh per input file and discarded after the flush.
#[derive(Default)]
pub struct SortedBedWriter {
    /// chromosome key -> start -> rows in arrival order
    rows: BTreeMap<u32, BTreeMap<u64, Vec<ConvertedRow>>>,
    count: usize,
}

impl SortedBedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one row under its chromosome key and start position
    pub fn push(&mut self, chrom_key: u32, start: u64, row: ConvertedRow) {
        self.rows
            .entry(chrom_key)
            .or_default()
            .entry(start)
            .or_default()
            .push(row);
        self.count += 1;
    }

    /// Number of accumulated rows
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if no rows were accumulated
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate rows in output order, for tests and in-memory consumers
    pub fn iter_sorted(&self) -> impl Iterator<Item = &ConvertedRow> {
        self.rows
            .values()
            .flat_map(|starts| starts.values())
            .flatten()
    }

    /// Write all rows to `path` in sorted order, truncating any previous
    /// content (repeated runs against the same sample overwrite)
    pub fn flush(&self, path: &Path) -> Result<(), ConvertError> {
        let file = File::create(path).map_err(|e| ConvertError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::with_capacity(128 * 1024, file);

        for row in self.iter_sorted() {
            writeln!(writer, "{}", row.to_line()).map_err(|e| ConvertError::OutputWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        writer.flush().map_err(|e| ConvertError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}
