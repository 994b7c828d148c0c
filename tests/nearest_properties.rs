//! Property-based tests for gene-symbol run grouping and candidate selection

use methylbed::core::{annotate, group_runs, EntrezResolver, GencodeIndex, SymbolIdMap};
use proptest::prelude::*;
use std::io::Write;

proptest! {
    /// Every run points at a contiguous slice of identical symbols
    #[test]
    fn prop_runs_cover_identical_slices(
        symbols in prop::collection::vec("[A-D]", 1..20)
    ) {
        let refs: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
        let runs = group_runs(&refs);

        for run in &runs {
            prop_assert!(run.start < run.end);
            prop_assert!(run.end <= refs.len());
            for i in run.start..run.end {
                prop_assert_eq!(refs[i], run.symbol.as_str());
            }
        }
    }

    /// One run per distinct symbol, in first-appearance order
    #[test]
    fn prop_one_run_per_distinct_symbol(
        symbols in prop::collection::vec("[A-D]", 1..20)
    ) {
        let refs: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
        let runs = group_runs(&refs);

        let mut seen_order: Vec<&str> = Vec::new();
        for s in &refs {
            if !seen_order.contains(s) {
                seen_order.push(s);
            }
        }
        let run_symbols: Vec<&str> = runs.iter().map(|r| r.symbol.as_str()).collect();
        prop_assert_eq!(run_symbols, seen_order);
    }

    /// A run is kept at its first occurrence even when the symbol reappears
    #[test]
    fn prop_first_run_wins_for_repeated_symbol(
        prefix in 1..5usize,
        gap in 1..5usize,
        suffix in 1..5usize,
    ) {
        let mut symbols: Vec<&str> = Vec::new();
        symbols.extend(std::iter::repeat("A").take(prefix));
        symbols.extend(std::iter::repeat("B").take(gap));
        symbols.extend(std::iter::repeat("A").take(suffix));

        let runs = group_runs(&symbols);
        prop_assert_eq!(runs.len(), 2);
        prop_assert_eq!(runs[0].symbol.as_str(), "A");
        prop_assert_eq!(runs[0].start, 0);
        prop_assert_eq!(runs[0].end, prefix);
        prop_assert_eq!(runs[1].symbol.as_str(), "B");
    }
}

/// Index over a single gene locus for selection properties
fn single_gene_index(start: u64, end: u64) -> GencodeIndex {
    let mut gtf = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        gtf,
        "chr1\tHAVANA\tgene\t{}\t{}\t.\t+\t.\tgene_id \"ENSG00000000001.2\"; gene_name \"GENEA\";",
        start, end
    )
    .unwrap();
    gtf.flush().unwrap();
    let mut index = GencodeIndex::new(gtf.path());
    index.ensure_loaded("gene").unwrap();
    index
}

proptest! {
    /// A probe inside the gene body always selects it with the containment
    /// distance formula (start - gene_start) + (gene_end - end)
    #[test]
    fn prop_contained_probe_selects_gene(
        offset in 0..400u64,
    ) {
        let mut index = single_gene_index(1000, 2000);
        let empty = SymbolIdMap::default();
        let resolver = EntrezResolver::new(&empty, &empty, &empty);

        let start = 1000 + offset;
        let end = start + 2;
        prop_assume!(end <= 2000);

        let bundle = annotate(
            &mut index,
            &resolver,
            start,
            end,
            &["GENEA"],
            &["protein_coding"],
            &["ENST1"],
            &["10"],
        )
        .unwrap();

        prop_assert_eq!(bundle.symbol.as_str(), "GENEA");
        prop_assert_eq!(bundle.strand.to_char(), '+');
    }

    /// A probe strictly outside the gene still annotates from the symbol
    /// columns; the disjoint distance never panics on any side
    #[test]
    fn prop_disjoint_probe_annotates(
        start in prop_oneof![0..900u64, 2100..4000u64],
    ) {
        let mut index = single_gene_index(1000, 2000);
        let empty = SymbolIdMap::default();
        let resolver = EntrezResolver::new(&empty, &empty, &empty);

        let bundle = annotate(
            &mut index,
            &resolver,
            start,
            start + 2,
            &["GENEA"],
            &["protein_coding"],
            &["ENST1"],
            &["10"],
        )
        .unwrap();

        prop_assert_eq!(bundle.symbol.as_str(), "GENEA");
        prop_assert_eq!(bundle.all_gene_symbols.as_str(), "GENEA");
    }
}

#[test]
fn test_containment_beats_wide_disjoint() {
    let mut gtf = tempfile::NamedTempFile::new().unwrap();
    // NEAR is 1 bp away but disjoint; WIDE contains the probe
    writeln!(
        gtf,
        "chr1\tHAVANA\tgene\t2003\t2100\t.\t+\t.\tgene_id \"ENSG00000000010.1\"; gene_name \"NEAR\";"
    )
    .unwrap();
    writeln!(
        gtf,
        "chr1\tHAVANA\tgene\t1\t100000\t.\t-\t.\tgene_id \"ENSG00000000011.1\"; gene_name \"WIDE\";"
    )
    .unwrap();
    gtf.flush().unwrap();
    let mut index = GencodeIndex::new(gtf.path());

    let empty = SymbolIdMap::default();
    let resolver = EntrezResolver::new(&empty, &empty, &empty);

    let bundle = annotate(
        &mut index,
        &resolver,
        2000,
        2002,
        &["NEAR", "WIDE"],
        &["pc", "pc"],
        &["ENST1", "ENST2"],
        &["5", "900"],
    )
    .unwrap();

    assert_eq!(bundle.symbol, "WIDE");
    assert_eq!(bundle.strand.to_char(), '-');
}

#[test]
fn test_equal_distance_keeps_first_candidate() {
    let mut gtf = tempfile::NamedTempFile::new().unwrap();
    for name in ["LEFT", "RIGHT"] {
        writeln!(
            gtf,
            "chr1\tHAVANA\tgene\t500\t5000\t.\t+\t.\tgene_id \"ENSG00000000020.1\"; gene_name \"{}\";",
            name
        )
        .unwrap();
    }
    gtf.flush().unwrap();
    let mut index = GencodeIndex::new(gtf.path());

    let empty = SymbolIdMap::default();
    let resolver = EntrezResolver::new(&empty, &empty, &empty);

    let bundle = annotate(
        &mut index,
        &resolver,
        1000,
        1002,
        &["LEFT", "RIGHT"],
        &["pc", "pc"],
        &["ENST1", "ENST2"],
        &["5", "5"],
    )
    .unwrap();

    assert_eq!(bundle.symbol, "LEFT");
}
