//! Methylation Beta Value adapter
//!
//! Converts GDC "Methylation Beta Value" text files into the 18-column
//! annotated BED layout. Each input line is parsed zero-copy, validated,
//! enriched through the nearest-gene selector and the Entrez resolver,
//! and accumulated for coordinate-sorted output. Whole files with zero
//! convertible rows are skipped, not failed.
//!
//! # Input format
//!
//! Tab-separated, 11 columns, one header line:
//!
//! ```text
//! composite_element_ref beta_value chromosome start end gene_symbol(;)
//! gene_type(;) transcript_id(;) position_to_tss(;) cgi_coordinate feature_type
//! ```

use crate::core::nearest::annotate;
use crate::core::resolve::EntrezResolver;
use crate::core::resources::AnnotationResources;
use crate::core::Result;
use crate::formats::bed::{chrom_sort_key, ConvertedRow, SortedBedWriter, OUTPUT_SUFFIX};
use memchr::memchr;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Number of columns in a GDC methylation input record
const INPUT_FIELD_COUNT: usize = 11;

/// Probe record parse error
#[derive(Debug, thiserror::Error)]
pub enum ProbeParseError {
    #[error("Empty line")]
    EmptyLine,

    #[error("Too few fields: expected at least {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid UTF-8 in field: {0}")]
    InvalidUtf8(&'static str),
}

/// Zero-copy view over one methylation probe record
///
/// Field boundaries are located with memchr; values stay borrowed from
/// the line buffer until the row survives validation.
pub struct ProbeRecordView<'a> {
    line: &'a [u8],
    field_bounds: Vec<(usize, usize)>,
}

impl<'a> ProbeRecordView<'a> {
    /// Parse a probe line with minimal allocation
    pub fn parse(line: &'a [u8]) -> std::result::Result<Self, ProbeParseError> {
        if line.is_empty() {
            return Err(ProbeParseError::EmptyLine);
        }

        // Find field boundaries using memchr for tab characters
        let mut field_bounds = Vec::with_capacity(INPUT_FIELD_COUNT);
        let mut start_pos = 0;
        let mut pos = 0;

        while pos < line.len() {
            if let Some(tab_pos) = memchr(b'\t', &line[pos..]) {
                let end_pos = pos + tab_pos;
                field_bounds.push((start_pos, end_pos));
                start_pos = end_pos + 1;
                pos = start_pos;
            } else {
                // Last field
                field_bounds.push((start_pos, line.len()));
                break;
            }
        }

        if field_bounds.len() < INPUT_FIELD_COUNT {
            return Err(ProbeParseError::TooFewFields {
                expected: INPUT_FIELD_COUNT,
                found: field_bounds.len(),
            });
        }

        Ok(Self { line, field_bounds })
    }

    /// Get field as string slice
    fn field(&self, index: usize) -> &'a str {
        let (start, end) = self.field_bounds[index];
        std::str::from_utf8(&self.line[start..end]).unwrap_or("")
    }

    pub fn composite_element_ref(&self) -> &'a str {
        self.field(0)
    }

    pub fn beta_value(&self) -> &'a str {
        self.field(1)
    }

    pub fn chromosome(&self) -> &'a str {
        self.field(2)
    }

    pub fn start(&self) -> Option<u64> {
        self.field(3).trim().parse().ok()
    }

    pub fn end(&self) -> Option<u64> {
        self.field(4).trim().parse().ok()
    }

    pub fn gene_symbols(&self) -> &'a str {
        self.field(5)
    }

    pub fn gene_types(&self) -> &'a str {
        self.field(6)
    }

    pub fn transcript_ids(&self) -> &'a str {
        self.field(7)
    }

    pub fn positions_to_tss(&self) -> &'a str {
        self.field(8)
    }

    pub fn cgi_coordinate(&self) -> &'a str {
        self.field(9)
    }

    pub fn feature_type(&self) -> &'a str {
        self.field(10)
    }
}

/// Why a row was dropped during validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Chromosome token is `*` or outside chr1-22/X/Y
    UnknownChromosome,
    /// Beta value is the literal "NA" (any case)
    UnavailableBeta,
    /// Gene-symbol field is empty or the `.` placeholder
    EmptyGeneField,
    /// Start or end coordinate is not numeric
    BadCoordinates,
    /// Parallel per-transcript arrays differ in length
    MismatchedArrays,
}

/// Validate a parsed row; Ok carries the chromosome sort key and coordinates
fn validate(view: &ProbeRecordView) -> std::result::Result<(u32, u64, u64), DropReason> {
    let chromosome = view.chromosome();
    if chromosome == "*" {
        return Err(DropReason::UnknownChromosome);
    }
    let chrom_key = chrom_sort_key(chromosome).ok_or(DropReason::UnknownChromosome)?;

    if view.beta_value().trim().eq_ignore_ascii_case("na") {
        return Err(DropReason::UnavailableBeta);
    }

    let gene_field = view.gene_symbols().trim();
    if gene_field.is_empty() || gene_field == "." {
        return Err(DropReason::EmptyGeneField);
    }

    let start = view.start().ok_or(DropReason::BadCoordinates)?;
    let end = view.end().ok_or(DropReason::BadCoordinates)?;

    let n_symbols = view.gene_symbols().split(';').count();
    if view.gene_types().split(';').count() != n_symbols
        || view.transcript_ids().split(';').count() != n_symbols
        || view.positions_to_tss().split(';').count() != n_symbols
    {
        return Err(DropReason::MismatchedArrays);
    }

    Ok((chrom_key, start, end))
}

/// Conversion statistics for one input file
#[derive(Debug, Default, Clone)]
pub struct ConversionStats {
    pub total: usize,
    pub converted: usize,
    pub dropped: usize,
}

/// Convert one methylation file into `<outdir>/<aliquot_id>-mbv.bed`
///
/// Returns the output path and statistics, or `Ok(None)` when the file
/// has no convertible rows (a skip, not an error). The annotation
/// resources are threaded through mutably so the lazily-grown Gencode
/// index persists across files in the same run.
pub fn convert_file(
    input: &Path,
    outdir: &Path,
    aliquot_id: &str,
    resources: &mut AnnotationResources,
) -> Result<Option<(PathBuf, ConversionStats)>> {
    let mut reader =
        crate::core::io::open_text(input).map_err(|e| crate::core::ConvertError::InputUnreadable {
            path: input.to_path_buf(),
            source: e,
        })?;

    // Split the resource borrows so the resolver (immutable maps) can
    // coexist with the growing Gencode index.
    let AnnotationResources {
        ref mut gencode,
        ref ncbi_current,
        ref ncbi_deprecated,
        ref hgnc,
    } = *resources;
    let resolver = EntrezResolver::new(ncbi_current, ncbi_deprecated, hgnc);

    let mut writer = SortedBedWriter::new();
    let mut stats = ConversionStats::default();
    let mut line_buf = String::with_capacity(4096);
    let mut line_no = 0usize;

    loop {
        line_buf.clear();
        let bytes_read = reader
            .read_line(&mut line_buf)
            .map_err(crate::core::ConvertError::Io)?;
        if bytes_read == 0 {
            break;
        }
        line_no += 1;
        if line_no == 1 {
            // Header line
            continue;
        }

        let line = line_buf.trim_end();
        if line.is_empty() {
            continue;
        }
        stats.total += 1;

        let view = match ProbeRecordView::parse(line.as_bytes()) {
            Ok(view) => view,
            Err(e) => {
                log::debug!("{:?}:{}: dropped row: {}", input, line_no, e);
                stats.dropped += 1;
                continue;
            }
        };

        let (chrom_key, start, end) = match validate(&view) {
            Ok(v) => v,
            Err(reason) => {
                log::debug!("{:?}:{}: dropped row: {:?}", input, line_no, reason);
                stats.dropped += 1;
                continue;
            }
        };

        let symbols: Vec<&str> = view.gene_symbols().split(';').collect();
        let gene_types: Vec<&str> = view.gene_types().split(';').collect();
        let transcript_ids: Vec<&str> = view.transcript_ids().split(';').collect();
        let positions_to_tss: Vec<&str> = view.positions_to_tss().split(';').collect();

        let bundle = annotate(
            gencode,
            &resolver,
            start,
            end,
            &symbols,
            &gene_types,
            &transcript_ids,
            &positions_to_tss,
        )
        .map_err(crate::core::MethylBedError::Asset)?;

        let row = ConvertedRow {
            fields: [
                view.chromosome().to_string(),
                start.to_string(),
                end.to_string(),
                bundle.strand.to_char().to_string(),
                view.composite_element_ref().to_string(),
                view.beta_value().to_string(),
                bundle.symbol,
                bundle.entrez,
                bundle.gene_type,
                bundle.transcript_id,
                bundle.position_to_tss,
                bundle.all_gene_symbols,
                bundle.all_entrez_ids,
                bundle.all_gene_types,
                bundle.all_transcript_ids,
                bundle.all_positions_to_tss,
                view.cgi_coordinate().to_string(),
                view.feature_type().to_string(),
            ],
        };
        writer.push(chrom_key, start, row);
        stats.converted += 1;
    }

    if writer.is_empty() {
        log::info!("{:?}: no convertible rows, skipping", input);
        return Ok(None);
    }

    let out_path = outdir.join(format!("{}{}.bed", aliquot_id, OUTPUT_SUFFIX));
    writer.flush(&out_path)?;
    Ok(Some((out_path, stats)))
}
