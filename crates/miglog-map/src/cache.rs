//! Per-run cache of mapping documents.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use crate::document::MapDocument;
use crate::error::Result;

/// Loads each mapping document at most once and keeps it resident for the
/// rest of the run, so patches from different steps accumulate on a single
/// in-memory tree. Nothing touches disk again until
/// [`DocumentCache::flush_all`]; a run that aborts never flushes.
#[derive(Debug)]
pub struct DocumentCache {
    map_dir: PathBuf,
    documents: BTreeMap<String, MapDocument>,
}

/// What [`DocumentCache::flush_all`] wrote for one document.
#[derive(Debug, Clone)]
pub struct FlushReport {
    pub file_name: String,
    pub path: PathBuf,
    pub appended: usize,
}

impl DocumentCache {
    pub fn new(map_dir: impl Into<PathBuf>) -> Self {
        Self {
            map_dir: map_dir.into(),
            documents: BTreeMap::new(),
        }
    }

    pub fn map_dir(&self) -> &Path {
        &self.map_dir
    }

    /// The document for a file name, loading it on first reference. Later
    /// calls hand back the same resident instance.
    pub fn get_mut(&mut self, file_name: &str) -> Result<&mut MapDocument> {
        match self.documents.entry(file_name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.map_dir.join(file_name);
                let document = MapDocument::load(file_name, path)?;
                Ok(entry.insert(document))
            }
        }
    }

    /// True when the document has been loaded during this run.
    pub fn is_resident(&self, file_name: &str) -> bool {
        self.documents.contains_key(file_name)
    }

    /// Resident documents in file-name order.
    pub fn resident(&self) -> impl Iterator<Item = &MapDocument> {
        self.documents.values()
    }

    /// Serializes every resident document back to its source path, mutated
    /// or not, and reports what was written. The caller invokes this once,
    /// at the end of a successful run; nothing flushes on drop.
    pub fn flush_all(&self) -> Result<Vec<FlushReport>> {
        let mut reports = Vec::with_capacity(self.documents.len());
        for document in self.documents.values() {
            document.write_back()?;
            reports.push(FlushReport {
                file_name: document.file_name().to_string(),
                path: document.path().to_path_buf(),
                appended: document.appended(),
            });
        }
        Ok(reports)
    }
}
