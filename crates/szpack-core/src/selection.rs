//! Ordered, deduplicated collection of input paths

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Input paths in the order they were added, without duplicates.
///
/// Two paths are considered the same when they canonicalize to the same
/// location, so `./a.txt` and `a.txt` collapse into one entry. Paths that do
/// not exist yet are compared as written; existence is checked later when the
/// selection is turned into a request.
#[derive(Debug, Clone, Default)]
pub struct FileSelection {
    paths: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl FileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path. Returns `false` if it was already selected.
    pub fn add<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let path = path.as_ref();
        let key = identity(path);
        if !self.seen.insert(key) {
            debug!("Skipping duplicate input: {:?}", path);
            return false;
        }
        self.paths.push(path.to_path_buf());
        true
    }

    /// Add several paths, returning how many were new.
    pub fn extend<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths.into_iter().filter(|p| self.add(p)).count()
    }

    /// Remove the path at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<PathBuf> {
        if index >= self.paths.len() {
            return None;
        }
        let removed = self.paths.remove(index);
        self.seen.remove(&identity(&removed));
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn first(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Paths in the selection that do not exist on disk
    pub fn missing(&self) -> Vec<&Path> {
        self.iter().filter(|p| !p.exists()).collect()
    }
}

impl<P: AsRef<Path>> FromIterator<P> for FileSelection {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut selection = Self::new();
        selection.extend(iter);
        selection
    }
}

fn identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
