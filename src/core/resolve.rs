//! Entrez gene id resolution
//!
//! A symbol is resolved against the three reference maps in a fixed
//! fallback order: NCBI current, then NCBI deprecated, then HGNC. The
//! first hit wins. A symbol no source recognizes resolves to `None`,
//! which is rendered as an empty field downstream; it is not an error.

use crate::core::symbols::SymbolIdMap;

/// Resolver over the three symbol-to-id maps
pub struct EntrezResolver<'a> {
    ncbi_current: &'a SymbolIdMap,
    ncbi_deprecated: &'a SymbolIdMap,
    hgnc: &'a SymbolIdMap,
}

impl<'a> EntrezResolver<'a> {
    pub fn new(
        ncbi_current: &'a SymbolIdMap,
        ncbi_deprecated: &'a SymbolIdMap,
        hgnc: &'a SymbolIdMap,
    ) -> Self {
        Self {
            ncbi_current,
            ncbi_deprecated,
            hgnc,
        }
    }

    /// Resolve a gene symbol to its Entrez id
    ///
    /// Precedence: NCBI current > NCBI deprecated > HGNC.
    pub fn resolve(&self, symbol: &str) -> Option<&'a str> {
        self.ncbi_current
            .get(symbol)
            .or_else(|| self.ncbi_deprecated.get(symbol))
            .or_else(|| self.hgnc.get(symbol))
    }
}
