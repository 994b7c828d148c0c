//! Aliquot identifier lookup
//!
//! Output files are named after the aliquot the sample came from, not
//! after the input filename. Downloaded GDC files are stored as
//! `<file_uuid>_<original_name>`, and the file uuid maps to an aliquot
//! id assigned by the data portal. The portal lookup itself lives
//! outside this crate; here it is a trait with an offline manifest
//! implementation.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

/// Resolves the aliquot id that names a converted output file
pub trait AliquotLocator {
    /// Aliquot id for a file uuid, None if unknown
    fn locate(&self, file_uuid: &str) -> Option<String>;
}

/// Extract the file uuid from an input path
///
/// The uuid is the basename prefix before the first underscore
/// (`<uuid>_<name>`); a name without an underscore is taken whole.
pub fn file_uuid(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    Some(name.split('_').next().unwrap_or(name).to_string())
}

/// Locator backed by a tab-separated manifest file
///
/// Each line maps `file_uuid<TAB>aliquot_id`; `#` comments and blank
/// lines are ignored.
pub struct ManifestLocator {
    entries: HashMap<String, String>,
}

impl ManifestLocator {
    /// Load a manifest from disk
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let mut entries = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '\t');
            if let (Some(uuid), Some(aliquot)) = (parts.next(), parts.next()) {
                entries.insert(uuid.trim().to_string(), aliquot.trim().to_string());
            }
        }

        Ok(Self { entries })
    }

    /// Number of manifest entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the manifest is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AliquotLocator for ManifestLocator {
    fn locate(&self, file_uuid: &str) -> Option<String> {
        self.entries.get(file_uuid).cloned()
    }
}

/// Fallback locator that names outputs after the file uuid itself
pub struct FileUuidLocator;

impl AliquotLocator for FileUuidLocator {
    fn locate(&self, file_uuid: &str) -> Option<String> {
        Some(file_uuid.to_string())
    }
}
