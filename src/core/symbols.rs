//! Symbol-to-Entrez maps from NCBI and HGNC
//!
//! Three independent lookup tables, each built once up front and immutable
//! for the rest of the run:
//!
//! - NCBI current: symbols in active use, from the NCBI annotation GFF
//! - NCBI deprecated: discontinued human symbols, from gene_history
//! - HGNC: approved symbols from the HGNC complete-set flat file
//!
//! Keys are trimmed, lower-cased symbols; values are numeric Entrez gene
//! ids kept as strings (they are emitted verbatim).

use crate::core::error::{AssetError, AssetResult};
use crate::core::io::open_text;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

/// Homo sapiens taxon id used to filter the NCBI history file
const HUMAN_TAXON_ID: &str = "9606";

/// Mapping from lower-cased gene symbol to a numeric identifier string
#[derive(Debug, Default, Clone)]
pub struct SymbolIdMap {
    entries: HashMap<String, String>,
}

impl SymbolIdMap {
    /// Look up an id; comparison is whitespace-trimmed and case-insensitive
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.entries
            .get(&symbol.trim().to_lowercase())
            .map(|s| s.as_str())
    }

    /// Number of symbols in the map
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, symbol: &str, id: &str) {
        self.entries
            .insert(symbol.trim().to_lowercase(), id.trim().to_string());
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut map = Self::default();
        for (symbol, id) in pairs {
            map.insert(symbol, id);
        }
        map
    }
}

/// Load the current NCBI symbol map from a (compressed) annotation GFF
///
/// Keeps rows whose attribute column carries a `Name=` entry; the id is
/// the value following a `GeneID:` token inside `Dbxref`.
pub fn load_ncbi_current(path: &Path) -> AssetResult<SymbolIdMap> {
    let reader = open_text(path).map_err(|e| AssetError::from_io(path, e))?;
    let mut map = SymbolIdMap::default();

    for line in reader.lines() {
        let line = line.map_err(|e| AssetError::from_io(path, e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let attributes = match line.split('\t').nth(8) {
            Some(a) => a,
            None => continue,
        };
        if !attributes.contains("Name=") {
            continue;
        }

        let mut symbol = "";
        let mut entrez = "";
        for attr in attributes.split(';') {
            let attr = attr.trim();
            if attr.to_lowercase().starts_with("name=") {
                symbol = attr.splitn(2, '=').nth(1).unwrap_or("");
            } else if attr.to_lowercase().contains("geneid") {
                // Dbxref=GeneID:7157,HGNC:HGNC:11998 -> 7157
                for part in attr.split(',') {
                    if part.contains("GeneID:") {
                        entrez = part.rsplit(':').next().unwrap_or("");
                        break;
                    }
                }
            }
        }

        if !symbol.trim().is_empty() && !entrez.trim().is_empty() {
            map.insert(symbol, entrez);
        }
    }

    log::info!("Loaded {} current NCBI symbols from {:?}", map.len(), path);
    Ok(map)
}

/// Load the deprecated-symbol map from the (compressed) NCBI gene_history
///
/// Tab-delimited with a header row; only human rows (taxon 9606) are kept.
/// Column 3 is the discontinued GeneID, column 4 the discontinued symbol.
pub fn load_ncbi_deprecated(path: &Path) -> AssetResult<SymbolIdMap> {
    let reader = open_text(path).map_err(|e| AssetError::from_io(path, e))?;
    let mut map = SymbolIdMap::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AssetError::from_io(path, e))?;
        if line_no == 0 {
            // Header row
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            continue;
        }
        if fields[0] != HUMAN_TAXON_ID {
            continue;
        }
        map.insert(fields[3], fields[2]);
    }

    log::info!("Loaded {} deprecated NCBI symbols from {:?}", map.len(), path);
    Ok(map)
}

/// Load the HGNC symbol map from the (compressed) complete-set flat file
///
/// Tab-delimited with a header row; column 2 is the approved symbol,
/// column 19 the Entrez gene id.
pub fn load_hgnc(path: &Path) -> AssetResult<SymbolIdMap> {
    let reader = open_text(path).map_err(|e| AssetError::from_io(path, e))?;
    let mut map = SymbolIdMap::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AssetError::from_io(path, e))?;
        if line_no == 0 {
            // Header row
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 19 {
            continue;
        }
        map.insert(fields[1], fields[18]);
    }

    log::info!("Loaded {} HGNC symbols from {:?}", map.len(), path);
    Ok(map)
}
