//! Nearest-gene selection and annotation aggregation
//!
//! A probe's gene-symbol field is a semicolon list in which the same
//! symbol repeats once per transcript, so consecutive identical entries
//! form one run per gene. Each distinct gene is classified against the
//! probe interval in one of two distance regimes:
//!
//! - containment: the probe lies inside the gene body; the distance is
//!   `(start_site - gene_start) + (gene_end - end_site)`, so a tighter
//!   containing gene scores better than a larger one
//! - disjoint: the probe lies fully before or after the gene; the
//!   distance is the gap to the nearer boundary
//!
//! A gene whose body partially overlaps the probe without containing it
//! falls in neither regime. Containment always beats disjoint; ties go to
//! the first-encountered gene. The containment formula sums both offsets
//! on purpose; downstream consumers depend on its tie-breaking behavior.

use crate::core::error::AssetResult;
use crate::core::gencode::{GencodeIndex, GeneLocus, Strand};
use crate::core::resolve::EntrezResolver;

/// Gencode feature type consulted for gene bodies
const GENE_FEATURE: &str = "gene";

/// One run of consecutive identical symbols in the probe's gene list
///
/// `start..end` is the half-open index range of the run, which is also
/// the transcript sub-range of that gene in the parallel arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRun {
    pub symbol: String,
    pub start: usize,
    pub end: usize,
}

/// Group consecutive identical symbols into runs, one per distinct symbol
///
/// First-encountered order is preserved; if a symbol reappears later in a
/// separate run, only its first run is kept.
pub fn group_runs(symbols: &[&str]) -> Vec<SymbolRun> {
    let mut runs: Vec<SymbolRun> = Vec::new();
    let mut i = 0;
    while i < symbols.len() {
        let mut end = i + 1;
        while end < symbols.len() && symbols[end] == symbols[i] {
            end += 1;
        }
        if !runs.iter().any(|r| r.symbol == symbols[i]) {
            runs.push(SymbolRun {
                symbol: symbols[i].to_string(),
                start: i,
                end,
            });
        }
        i = end;
    }
    runs
}

/// Relationship of a probe interval to a gene body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    /// Probe contained in the gene body, with the summed-offset distance
    Containment(u64),
    /// Probe fully before or after the gene, with the boundary gap
    Disjoint(u64),
}

/// Classify a probe interval against a gene locus
///
/// Returns None for partial overlaps, which belong to neither regime.
fn classify(start_site: u64, end_site: u64, locus: &GeneLocus) -> Option<Relation> {
    if start_site >= locus.start && locus.end >= end_site {
        Some(Relation::Containment(
            (start_site - locus.start) + (locus.end - end_site),
        ))
    } else if end_site <= locus.start {
        Some(Relation::Disjoint(locus.start - end_site))
    } else if locus.end <= start_site {
        Some(Relation::Disjoint(start_site - locus.end))
    } else {
        None
    }
}

/// Per-probe annotation result
///
/// The selected fields describe the single nearest gene; the `all_*`
/// fields aggregate every distinct gene the probe touches, regardless of
/// which one was selected. Computed fresh per probe.
#[derive(Debug, Clone, Default)]
pub struct AnnotationBundle {
    /// Selected nearest gene symbol, empty if no candidate has a locus
    pub symbol: String,
    /// Strand of the selected gene, `*` if none selected
    pub strand: Strand,
    /// Gene type of the selected gene
    pub gene_type: String,
    /// Pipe-joined transcript ids of the selected gene
    pub transcript_id: String,
    /// Pipe-joined positions-to-TSS of the selected gene
    pub position_to_tss: String,
    /// Entrez id of the selected gene, empty if unresolved
    pub entrez: String,
    /// Semicolon-joined distinct gene symbols
    pub all_gene_symbols: String,
    /// Semicolon-joined entrez ids, one slot per distinct gene
    pub all_entrez_ids: String,
    /// Semicolon-joined gene types, one per distinct gene
    pub all_gene_types: String,
    /// Pipe-joined per gene, semicolon-joined across genes
    pub all_transcript_ids: String,
    /// Pipe-joined per gene, semicolon-joined across genes
    pub all_positions_to_tss: String,
}

/// Annotate one probe against the Gencode index and id maps
///
/// `symbols`, `gene_types`, `transcript_ids` and `positions_to_tss` are
/// the parallel per-transcript arrays from the input record. The Gencode
/// `gene` partition is loaded lazily on the first call.
pub fn annotate(
    gencode: &mut GencodeIndex,
    resolver: &EntrezResolver,
    start_site: u64,
    end_site: u64,
    symbols: &[&str],
    gene_types: &[&str],
    transcript_ids: &[&str],
    positions_to_tss: &[&str],
) -> AssetResult<AnnotationBundle> {
    gencode.ensure_loaded(GENE_FEATURE)?;

    let runs = group_runs(symbols);

    // Best candidate per regime: (run index, distance); first strict
    // improvement wins, so ties resolve to the first-encountered gene.
    let mut best_containment: Option<(usize, u64)> = None;
    let mut best_disjoint: Option<(usize, u64)> = None;
    let mut entrez_per_run: Vec<String> = Vec::with_capacity(runs.len());

    for (run_idx, run) in runs.iter().enumerate() {
        let locus = gencode.first_locus(GENE_FEATURE, &run.symbol);

        let entrez = match locus {
            Some(locus) => {
                match classify(start_site, end_site, locus) {
                    Some(Relation::Containment(d)) => {
                        if best_containment.map_or(true, |(_, best)| d < best) {
                            best_containment = Some((run_idx, d));
                        }
                    }
                    Some(Relation::Disjoint(d)) => {
                        if best_disjoint.map_or(true, |(_, best)| d < best) {
                            best_disjoint = Some((run_idx, d));
                        }
                    }
                    None => {}
                }
                resolver.resolve(&run.symbol).unwrap_or("").to_string()
            }
            // No locus: the gene still occupies an (empty) slot in the
            // aggregate fields, but is never selectable as nearest.
            None => String::new(),
        };
        entrez_per_run.push(entrez);
    }

    let mut bundle = AnnotationBundle::default();

    // Aggregate fields over every distinct gene, first-encountered order
    bundle.all_gene_symbols = runs
        .iter()
        .map(|r| r.symbol.clone())
        .collect::<Vec<_>>()
        .join(";");
    bundle.all_entrez_ids = entrez_per_run.join(";");
    bundle.all_gene_types = runs
        .iter()
        .map(|r| field_at(gene_types, r.start))
        .collect::<Vec<_>>()
        .join(";");
    bundle.all_transcript_ids = runs
        .iter()
        .map(|r| pipe_join(transcript_ids, r))
        .collect::<Vec<_>>()
        .join(";");
    bundle.all_positions_to_tss = runs
        .iter()
        .map(|r| pipe_join(positions_to_tss, r))
        .collect::<Vec<_>>()
        .join(";");

    // Containment wins over disjoint; within a regime the minimum distance
    let selected = best_containment.or(best_disjoint).map(|(idx, _)| idx);

    if let Some(run_idx) = selected {
        let run = &runs[run_idx];
        if let Some(locus) = gencode.first_locus(GENE_FEATURE, &run.symbol) {
            bundle.strand = locus.strand;
        }
        bundle.symbol = run.symbol.clone();
        bundle.gene_type = field_at(gene_types, run.start).to_string();
        bundle.transcript_id = pipe_join(transcript_ids, run);
        bundle.position_to_tss = pipe_join(positions_to_tss, run);
        bundle.entrez = entrez_per_run[run_idx].clone();
    }

    Ok(bundle)
}

/// Value at an index of a parallel array, empty when out of range
fn field_at<'a>(values: &[&'a str], idx: usize) -> &'a str {
    values.get(idx).copied().unwrap_or("")
}

/// Pipe-join a run's sub-range of a parallel array
fn pipe_join(values: &[&str], run: &SymbolRun) -> String {
    (run.start..run.end)
        .map(|idx| field_at(values, idx))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbols::SymbolIdMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn gencode_with(loci: &[(&str, &str, u64, u64, char)]) -> (NamedTempFile, GencodeIndex) {
        let mut temp = NamedTempFile::new().unwrap();
        for (symbol, chrom, start, end, strand) in loci {
            writeln!(
                temp,
                "{}\tHAVANA\tgene\t{}\t{}\t.\t{}\t.\tgene_id \"ENSG_{}.1\"; gene_name \"{}\";",
                chrom, start, end, strand, symbol, symbol
            )
            .unwrap();
        }
        temp.flush().unwrap();
        let index = GencodeIndex::new(temp.path());
        (temp, index)
    }

    fn resolver_fixture() -> (SymbolIdMap, SymbolIdMap, SymbolIdMap) {
        (
            SymbolIdMap::from_pairs(&[("GENEA", "111"), ("GENEB", "222")]),
            SymbolIdMap::default(),
            SymbolIdMap::default(),
        )
    }

    #[test]
    fn test_group_runs_basic() {
        let runs = group_runs(&["A", "A", "B", "C", "C", "C"]);
        assert_eq!(
            runs,
            vec![
                SymbolRun { symbol: "A".into(), start: 0, end: 2 },
                SymbolRun { symbol: "B".into(), start: 2, end: 3 },
                SymbolRun { symbol: "C".into(), start: 3, end: 6 },
            ]
        );
    }

    #[test]
    fn test_group_runs_keeps_first_of_repeated_symbol() {
        let runs = group_runs(&["A", "B", "A"]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], SymbolRun { symbol: "A".into(), start: 0, end: 1 });
        assert_eq!(runs[1], SymbolRun { symbol: "B".into(), start: 1, end: 2 });
    }

    #[test]
    fn test_group_runs_trailing_run_full_range() {
        // A run extending to the end of the list keeps all its indices
        let runs = group_runs(&["A", "A"]);
        assert_eq!(runs, vec![SymbolRun { symbol: "A".into(), start: 0, end: 2 }]);
    }

    #[test]
    fn test_classify_containment_distance() {
        let locus = GeneLocus {
            chrom: "chr1".into(),
            start: 900,
            end: 1100,
            strand: Strand::Plus,
            symbol: "G".into(),
            ensembl_id: "ENSG1".into(),
        };
        assert_eq!(classify(1000, 1002, &locus), Some(Relation::Containment(198)));
    }

    #[test]
    fn test_classify_disjoint_both_sides() {
        let locus = GeneLocus {
            chrom: "chr1".into(),
            start: 500,
            end: 600,
            strand: Strand::Plus,
            symbol: "G".into(),
            ensembl_id: "ENSG1".into(),
        };
        // Probe before the gene
        assert_eq!(classify(100, 200, &locus), Some(Relation::Disjoint(300)));
        // Probe after the gene
        assert_eq!(classify(700, 702, &locus), Some(Relation::Disjoint(100)));
    }

    #[test]
    fn test_classify_partial_overlap_neither_bucket() {
        let locus = GeneLocus {
            chrom: "chr1".into(),
            start: 500,
            end: 600,
            strand: Strand::Plus,
            symbol: "G".into(),
            ensembl_id: "ENSG1".into(),
        };
        // Probe straddles the gene start
        assert_eq!(classify(450, 550, &locus), None);
    }

    #[test]
    fn test_containment_beats_disjoint() {
        let (_temp, mut gencode) = gencode_with(&[
            // GENEA is adjacent (disjoint, gap 0), GENEB contains the probe
            ("GENEA", "chr1", 2000, 3000, '+'),
            ("GENEB", "chr1", 900, 1100, '-'),
        ]);
        let (c, d, h) = resolver_fixture();
        let resolver = EntrezResolver::new(&c, &d, &h);

        let bundle = annotate(
            &mut gencode,
            &resolver,
            1000,
            1002,
            &["GENEA", "GENEB"],
            &["protein_coding", "lincRNA"],
            &["ENST1", "ENST2"],
            &["10", "20"],
        )
        .unwrap();

        assert_eq!(bundle.symbol, "GENEB");
        assert_eq!(bundle.strand, Strand::Minus);
        assert_eq!(bundle.gene_type, "lincRNA");
        assert_eq!(bundle.entrez, "222");
        assert_eq!(bundle.all_gene_symbols, "GENEA;GENEB");
        assert_eq!(bundle.all_entrez_ids, "111;222");
    }

    #[test]
    fn test_containment_tie_first_encountered() {
        // Identical intervals -> identical distances; first gene wins
        let (_temp, mut gencode) = gencode_with(&[
            ("GENEA", "chr1", 900, 1100, '+'),
            ("GENEB", "chr1", 900, 1100, '-'),
        ]);
        let (c, d, h) = resolver_fixture();
        let resolver = EntrezResolver::new(&c, &d, &h);

        let bundle = annotate(
            &mut gencode,
            &resolver,
            1000,
            1002,
            &["GENEA", "GENEB"],
            &["pc", "pc"],
            &["T1", "T2"],
            &["1", "2"],
        )
        .unwrap();

        assert_eq!(bundle.symbol, "GENEA");
    }

    #[test]
    fn test_tighter_containment_wins() {
        let (_temp, mut gencode) = gencode_with(&[
            ("GENEA", "chr1", 100, 5000, '+'),
            ("GENEB", "chr1", 900, 1100, '-'),
        ]);
        let (c, d, h) = resolver_fixture();
        let resolver = EntrezResolver::new(&c, &d, &h);

        let bundle = annotate(
            &mut gencode,
            &resolver,
            1000,
            1002,
            &["GENEA", "GENEB"],
            &["pc", "pc"],
            &["T1", "T2"],
            &["1", "2"],
        )
        .unwrap();

        // GENEB: (1000-900)+(1100-1002)=198, GENEA: (1000-100)+(5000-1002)=4898
        assert_eq!(bundle.symbol, "GENEB");
    }

    #[test]
    fn test_disjoint_minimum_gap_wins() {
        let (_temp, mut gencode) = gencode_with(&[
            ("GENEA", "chr1", 2000, 3000, '+'),
            ("GENEB", "chr1", 100, 500, '-'),
        ]);
        let (c, d, h) = resolver_fixture();
        let resolver = EntrezResolver::new(&c, &d, &h);

        let bundle = annotate(
            &mut gencode,
            &resolver,
            600,
            602,
            &["GENEA", "GENEB"],
            &["pc", "pc"],
            &["T1", "T2"],
            &["1", "2"],
        )
        .unwrap();

        // GENEA gap: 2000-602=1398, GENEB gap: 600-500=100
        assert_eq!(bundle.symbol, "GENEB");
        assert_eq!(bundle.strand, Strand::Minus);
    }

    #[test]
    fn test_no_known_locus_defaults() {
        let (_temp, mut gencode) = gencode_with(&[("OTHER", "chr1", 1, 10, '+')]);
        let (c, d, h) = resolver_fixture();
        let resolver = EntrezResolver::new(&c, &d, &h);

        let bundle = annotate(
            &mut gencode,
            &resolver,
            1000,
            1002,
            &["GENEA"],
            &["pc"],
            &["T1"],
            &["1"],
        )
        .unwrap();

        assert_eq!(bundle.symbol, "");
        assert_eq!(bundle.strand, Strand::Unknown);
        assert_eq!(bundle.entrez, "");
        // Aggregates still carry the gene with an empty entrez slot
        assert_eq!(bundle.all_gene_symbols, "GENEA");
        assert_eq!(bundle.all_entrez_ids, "");
        assert_eq!(bundle.all_transcript_ids, "T1");
    }

    #[test]
    fn test_multi_transcript_pipe_join() {
        let (_temp, mut gencode) = gencode_with(&[("GENEA", "chr1", 900, 1100, '+')]);
        let (c, d, h) = resolver_fixture();
        let resolver = EntrezResolver::new(&c, &d, &h);

        let bundle = annotate(
            &mut gencode,
            &resolver,
            1000,
            1002,
            &["GENEA", "GENEA"],
            &["protein_coding", "protein_coding"],
            &["ENST1", "ENST2"],
            &["10", "20"],
        )
        .unwrap();

        assert_eq!(bundle.symbol, "GENEA");
        assert_eq!(bundle.transcript_id, "ENST1|ENST2");
        assert_eq!(bundle.position_to_tss, "10|20");
        assert_eq!(bundle.all_gene_symbols, "GENEA");
        assert_eq!(bundle.all_transcript_ids, "ENST1|ENST2");
        assert_eq!(bundle.all_positions_to_tss, "10|20");
    }

    #[test]
    fn test_aggregates_multi_gene() {
        let (_temp, mut gencode) = gencode_with(&[
            ("GENEA", "chr1", 900, 1100, '+'),
            ("GENEB", "chr1", 5000, 6000, '-'),
        ]);
        let (c, d, h) = resolver_fixture();
        let resolver = EntrezResolver::new(&c, &d, &h);

        let bundle = annotate(
            &mut gencode,
            &resolver,
            1000,
            1002,
            &["GENEA", "GENEA", "GENEB"],
            &["pc", "pc", "lincRNA"],
            &["T1", "T2", "T3"],
            &["1", "2", "3"],
        )
        .unwrap();

        assert_eq!(bundle.all_gene_symbols, "GENEA;GENEB");
        assert_eq!(bundle.all_gene_types, "pc;lincRNA");
        assert_eq!(bundle.all_transcript_ids, "T1|T2;T3");
        assert_eq!(bundle.all_positions_to_tss, "1|2;3");
        assert_eq!(bundle.all_entrez_ids, "111;222");
    }
}
