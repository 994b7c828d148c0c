//! Settings file loading
//!
//! Paths to the reference assets come from a TOML settings file:
//!
//! ```toml
//! [assets]
//! gencode = "assets/gencode.v22.annotation.gtf.bz2"
//! hgnc = "assets/hgnc_complete_set.txt.bz2"
//!
//! [assets.ncbi]
//! reference = "assets/GCF_000001405.39_GRCh38.p13_genomic.gff.bz2"
//! history = "assets/gene_history.bz2"
//! ```
//!
//! Relative asset paths are resolved against the current directory at
//! load time so later directory changes cannot re-point them.

use crate::core::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub assets: Assets,
}

/// Reference asset locations
#[derive(Debug, Clone, Deserialize)]
pub struct Assets {
    /// Gencode annotation GTF (compressed)
    pub gencode: PathBuf,
    /// HGNC complete-set flat file (compressed)
    pub hgnc: PathBuf,
    pub ncbi: NcbiAssets,
}

/// NCBI asset locations
#[derive(Debug, Clone, Deserialize)]
pub struct NcbiAssets {
    /// NCBI annotation GFF with current symbols (compressed)
    pub reference: PathBuf,
    /// NCBI gene_history file with deprecated symbols (compressed)
    pub history: PathBuf,
}

impl Settings {
    /// Load settings from a TOML file and absolutize the asset paths
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut settings: Settings =
            toml::from_str(&content).map_err(|e| ConfigError::Invalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        settings.assets.gencode = absolutize(&settings.assets.gencode);
        settings.assets.hgnc = absolutize(&settings.assets.hgnc);
        settings.assets.ncbi.reference = absolutize(&settings.assets.ncbi.reference);
        settings.assets.ncbi.history = absolutize(&settings.assets.ncbi.history);

        Ok(settings)
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
