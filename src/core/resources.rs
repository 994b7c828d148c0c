//! Annotation resources shared across a conversion run
//!
//! The NCBI and HGNC maps are loaded once up front and stay read-only;
//! the Gencode index grows lazily as feature types are first requested.
//! The whole bundle is carried by mutable reference through every
//! conversion call instead of living in ambient global state, so two
//! conversions must not run against the same bundle concurrently.

use crate::config::Settings;
use crate::core::error::AssetResult;
use crate::core::gencode::GencodeIndex;
use crate::core::resolve::EntrezResolver;
use crate::core::symbols::{load_hgnc, load_ncbi_current, load_ncbi_deprecated, SymbolIdMap};

/// Reference data for one conversion run
pub struct AnnotationResources {
    /// Lazily-populated Gencode locus index (grows across files)
    pub gencode: GencodeIndex,
    /// Current NCBI symbol map
    pub ncbi_current: SymbolIdMap,
    /// Deprecated (human) NCBI symbol map
    pub ncbi_deprecated: SymbolIdMap,
    /// HGNC symbol map
    pub hgnc: SymbolIdMap,
}

impl AnnotationResources {
    /// Load the NCBI and HGNC maps; Gencode stays unloaded until first use
    pub fn load(settings: &Settings) -> AssetResult<Self> {
        log::info!("Loading NCBI reference map");
        let ncbi_current = load_ncbi_current(&settings.assets.ncbi.reference)?;
        log::info!("Loading NCBI history map");
        let ncbi_deprecated = load_ncbi_deprecated(&settings.assets.ncbi.history)?;
        log::info!("Loading HGNC map");
        let hgnc = load_hgnc(&settings.assets.hgnc)?;

        Ok(Self {
            gencode: GencodeIndex::new(&settings.assets.gencode),
            ncbi_current,
            ncbi_deprecated,
            hgnc,
        })
    }

    /// Resolver view over the three id maps
    pub fn resolver(&self) -> EntrezResolver<'_> {
        EntrezResolver::new(&self.ncbi_current, &self.ncbi_deprecated, &self.hgnc)
    }
}
