//! methylbed - GDC methylation conversion and annotation
//!
//! Converts GDC "Methylation Beta Value" files into coordinate-sorted,
//! 18-column BED files, enriching each CpG probe with the nearest gene
//! and Entrez ids reconciled across Gencode, NCBI, and HGNC.
//!
//! # Features
//!
//! - Lazy, per-feature-type Gencode index shared across a whole run
//! - Three-source Entrez resolution (NCBI current, NCBI deprecated, HGNC)
//! - Two-tier nearest-gene rule (containment beats boundary distance)
//! - Deterministic chromosome/position output ordering (X=23, Y=24)
//!
//! # Example
//!
//! ```ignore
//! use methylbed::{config::Settings, core::AnnotationResources, formats};
//!
//! let settings = Settings::load("settings.toml".as_ref())?;
//! let mut resources = AnnotationResources::load(&settings)?;
//!
//! formats::dump_schema("converted/".as_ref())?;
//! let outcome = formats::convert_file(
//!     "downloads/uuid_sample.txt".as_ref(),
//!     "converted/".as_ref(),
//!     "aliquot-id",
//!     &mut resources,
//! )?;
//! ```

pub mod config;
pub mod core;
pub mod formats;
pub mod locate;

// Re-export commonly used types
pub use crate::core::{
    annotate, AnnotationBundle, AnnotationResources, AssetError, EntrezResolver, GencodeIndex,
    GeneLocus, MethylBedError, Result, Strand, SymbolIdMap,
};
pub use config::Settings;
pub use formats::{convert_file, dump_schema, ConversionStats, SortedBedWriter};
pub use locate::{file_uuid, AliquotLocator, FileUuidLocator, ManifestLocator};
