//! Fragment sources
//!
//! The reconstruction core never touches the network or the filesystem; raw
//! table fragments are handed to it by a [`FragmentSource`]. Implementations:
//!
//! - `DirFragmentSource`: reads `<dir>/<id>` or `<dir>/<id>.html` (CLI, batch jobs)
//! - `MemoryFragmentSource`: preloaded fragments (tests, WASM)
//! - `NoopFragmentSource`: every read fails with `NotSupported`

use std::collections::HashMap;

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

use crate::core::table::Table;
use crate::utils::error::{FetchError, SourceError};

/// Supplier of raw table fragments by identifier
pub trait FragmentSource: Send + Sync {
    /// Raw fragment text for `id`
    fn fragment(&self, id: &str) -> Result<String, SourceError>;

    /// Check if a fragment exists
    fn contains(&self, id: &str) -> bool;

    /// All identifiers this source can serve, sorted
    fn ids(&self) -> Vec<String>;
}

/// Fetch a fragment and reconstruct its linked table
pub fn read_table_from<S: FragmentSource + ?Sized>(source: &S, id: &str) -> Result<Table, FetchError> {
    let fragment = source.fragment(id)?;
    log::debug!("read fragment '{}' ({} bytes)", id, fragment.len());
    let mut table = Table::read(&fragment)?;
    table.link_rows()?;
    Ok(table)
}

/// Directory-backed source
#[cfg(not(target_arch = "wasm32"))]
pub struct DirFragmentSource {
    directory: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DirFragmentSource {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Try the exact name first, then with `.html`
    fn find_fragment(&self, id: &str) -> Option<PathBuf> {
        // Identifiers never escape the directory
        if id.is_empty() || id.contains(['/', '\\']) || id == ".." {
            return None;
        }

        let exact = self.directory.join(id);
        if exact.is_file() {
            return Some(exact);
        }

        let with_ext = self.directory.join(format!("{}.html", id));
        if with_ext.is_file() {
            return Some(with_ext);
        }

        None
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl FragmentSource for DirFragmentSource {
    fn fragment(&self, id: &str) -> Result<String, SourceError> {
        let path = self
            .find_fragment(id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;
        Ok(std::fs::read_to_string(path)?)
    }

    fn contains(&self, id: &str) -> bool {
        self.find_fragment(id).is_some()
    }

    fn ids(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.directory) else {
            return Vec::new();
        };

        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        ids.sort();
        ids
    }
}

/// Memory-based source (for testing and WASM with preloaded fragments)
#[derive(Debug, Default, Clone)]
pub struct MemoryFragmentSource {
    fragments: HashMap<String, String>,
}

impl MemoryFragmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment under `id`, replacing any previous one
    pub fn add_fragment(&mut self, id: &str, fragment: &str) {
        self.fragments.insert(id.to_string(), fragment.to_string());
    }

    /// Add multiple fragments
    pub fn add_fragments(&mut self, fragments: impl IntoIterator<Item = (String, String)>) {
        self.fragments.extend(fragments);
    }
}

impl FragmentSource for MemoryFragmentSource {
    fn fragment(&self, id: &str) -> Result<String, SourceError> {
        self.fragments
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    fn contains(&self, id: &str) -> bool {
        self.fragments.contains_key(id)
    }

    fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.fragments.keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// No-op source (for environments without storage)
pub struct NoopFragmentSource;

impl FragmentSource for NoopFragmentSource {
    fn fragment(&self, id: &str) -> Result<String, SourceError> {
        Err(SourceError::NotSupported(format!(
            "fragment reading not supported in this environment: {}",
            id
        )))
    }

    fn contains(&self, _id: &str) -> bool {
        false
    }

    fn ids(&self) -> Vec<String> {
        Vec::new()
    }
}
