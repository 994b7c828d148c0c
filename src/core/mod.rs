//! Core annotation and resolution functionality
//!
//! This module contains the reference index loaders, the Entrez id
//! resolver, and the nearest-gene selection algorithm.

pub mod error;
pub mod gencode;
pub mod io;
pub mod nearest;
pub mod resolve;
pub mod resources;
pub mod symbols;

pub use error::{
    AssetError, AssetResult, ConfigError, ConvertError, ConvertResult, MethylBedError, Result,
};
pub use gencode::{GencodeIndex, GeneLocus, Strand};
pub use io::{detect_compression, open_text, CompressionFormat, LineIterator, DEFAULT_BUFFER_SIZE};
pub use nearest::{annotate, group_runs, AnnotationBundle, SymbolRun};
pub use resolve::EntrezResolver;
pub use resources::AnnotationResources;
pub use symbols::{load_hgnc, load_ncbi_current, load_ncbi_deprecated, SymbolIdMap};
