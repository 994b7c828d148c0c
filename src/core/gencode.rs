//! Gencode annotation index
//!
//! Streams a (compressed) Gencode GTF and indexes gene features by
//! lower-cased symbol. Loading is lazy per feature type: the file is read
//! on the first request for a feature type and never again for that type,
//! which keeps memory bounded to the feature types actually used. The
//! methylation pipeline only ever asks for `gene`.
//!
//! # GTF attribute format
//!
//! ```text
//! chr1  HAVANA  gene  11869  14409  .  +  .  gene_id "ENSG00000223972.5"; gene_name "DDX11L1"; ...
//! ```

use crate::core::error::{AssetError, AssetResult};
use crate::core::io::open_text;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Strand orientation of a gene locus
///
/// `Unknown` renders as `*` and is used when no candidate gene of a probe
/// resolves to a known locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Strand {
    Plus,
    Minus,
    #[default]
    Unknown,
}

impl Strand {
    /// Parse from a single character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            '*' => Some(Strand::Unknown),
            _ => None,
        }
    }

    /// Character representation for output
    pub fn to_char(self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
            Strand::Unknown => '*',
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// One annotated gene feature from Gencode
///
/// Coordinates are 1-based inclusive, as in the GTF. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneLocus {
    /// Chromosome name as written in the GTF (e.g. "chr1")
    pub chrom: String,
    /// Start position (1-based)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    /// Strand orientation
    pub strand: Strand,
    /// Gene symbol (original casing)
    pub symbol: String,
    /// Ensembl gene id with the version suffix stripped
    pub ensembl_id: String,
}

/// Lazily-populated Gencode index
///
/// Maps feature type (e.g. "gene") -> lower-cased symbol -> loci in file
/// order. A feature type is loaded on first access; repeated requests for
/// an already-populated type are no-ops. The index is grown in place and
/// must be passed explicitly wherever annotation lookups happen.
pub struct GencodeIndex {
    path: PathBuf,
    by_feature: HashMap<String, HashMap<String, Vec<GeneLocus>>>,
}

impl GencodeIndex {
    /// Create an index backed by the given Gencode GTF; nothing is read yet
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            by_feature: HashMap::new(),
        }
    }

    /// Load the given feature type if it has not been loaded yet
    pub fn ensure_loaded(&mut self, feature: &str) -> AssetResult<()> {
        let feature_key = feature.to_lowercase();
        if self.by_feature.contains_key(&feature_key) {
            return Ok(());
        }

        log::debug!("Loading Gencode '{}' features from {:?}", feature_key, self.path);
        let mut by_symbol: HashMap<String, Vec<GeneLocus>> = HashMap::new();
        let reader = open_text(&self.path).map_err(|e| AssetError::from_io(&self.path, e))?;

        let mut loaded = 0usize;
        for line in reader.lines() {
            let line = line.map_err(|e| AssetError::from_io(&self.path, e))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(locus) = parse_gtf_line(line, &feature_key) {
                loaded += 1;
                by_symbol
                    .entry(locus.symbol.to_lowercase())
                    .or_default()
                    .push(locus);
            }
        }

        log::debug!("Indexed {} Gencode '{}' features", loaded, feature_key);
        self.by_feature.insert(feature_key, by_symbol);
        Ok(())
    }

    /// Look up the loci for a symbol within a feature type
    ///
    /// The feature type must have been populated with [`ensure_loaded`]
    /// beforehand; unloaded types behave as empty.
    ///
    /// [`ensure_loaded`]: GencodeIndex::ensure_loaded
    pub fn loci(&self, feature: &str, symbol: &str) -> Option<&[GeneLocus]> {
        self.by_feature
            .get(&feature.to_lowercase())
            .and_then(|m| m.get(&symbol.trim().to_lowercase()))
            .map(|v| v.as_slice())
    }

    /// First locus for a symbol, the one used for distance classification
    pub fn first_locus(&self, feature: &str, symbol: &str) -> Option<&GeneLocus> {
        self.loci(feature, symbol).and_then(|l| l.first())
    }

    /// Check whether a feature type has been populated
    pub fn is_loaded(&self, feature: &str) -> bool {
        self.by_feature.contains_key(&feature.to_lowercase())
    }

    /// Number of distinct symbols indexed for a feature type
    pub fn symbol_count(&self, feature: &str) -> usize {
        self.by_feature
            .get(&feature.to_lowercase())
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

/// Parse one GTF line, keeping it only if its feature type matches
///
/// Malformed lines are skipped silently.
fn parse_gtf_line(line: &str, feature_key: &str) -> Option<GeneLocus> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 9 {
        return None;
    }
    if !fields[2].trim().eq_ignore_ascii_case(feature_key) {
        return None;
    }

    let chrom = fields[0].trim();
    let start: u64 = fields[3].trim().parse().ok()?;
    let end: u64 = fields[4].trim().parse().ok()?;
    let strand = fields[6].trim().chars().next().and_then(Strand::from_char)?;

    let mut symbol: Option<&str> = None;
    let mut ensembl_id: Option<&str> = None;
    for attr in fields[8].split(';') {
        let attr = attr.trim();
        if attr.to_lowercase().starts_with("gene_name") {
            symbol = quoted_value(attr);
        } else if attr.to_lowercase().starts_with("gene_id") {
            // Strip the Ensembl version suffix (ENSG00000223972.5 -> ENSG00000223972)
            ensembl_id = quoted_value(attr).map(|v| v.split('.').next().unwrap_or(v));
        }
    }

    let symbol = symbol?;
    if symbol.is_empty() {
        return None;
    }

    Some(GeneLocus {
        chrom: chrom.to_string(),
        start,
        end,
        strand,
        symbol: symbol.to_string(),
        ensembl_id: ensembl_id.unwrap_or("").to_string(),
    })
}

/// Extract the quoted value of a GTF attribute (`gene_name "DDX11L1"`)
fn quoted_value(attr: &str) -> Option<&str> {
    let first = attr.find('"')?;
    let last = attr.rfind('"')?;
    if last <= first {
        return None;
    }
    Some(&attr[first + 1..last])
}
