//! Workspace management for per-request scratch space
//!
//! Every execution gets its own directory or file. Names are unique by
//! construction (process id + monotonic counter + random suffix), so
//! concurrent requests never share a location.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tempfile::{TempDir, TempPath};
use tracing::{debug, warn};

/// Hands out unique name prefixes for workspaces
#[derive(Debug)]
pub struct NameGenerator {
    pid: u32,
    counter: AtomicU64,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self {
            pid: std::process::id(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn next_prefix(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("run-{}-{}-", self.pid, n)
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates workspaces under a common root
#[derive(Debug)]
pub struct WorkspaceManager {
    root: PathBuf,
    names: NameGenerator,
}

impl WorkspaceManager {
    /// Use `root` as the parent directory, or the OS temp dir when `None`
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root: root.unwrap_or_else(std::env::temp_dir),
            names: NameGenerator::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fresh empty directory
    pub fn directory(&self) -> io::Result<Workspace> {
        let dir = tempfile::Builder::new()
            .prefix(&self.names.next_prefix())
            .tempdir_in(&self.root)?;
        debug!(path = %dir.path().display(), "Created workspace directory");
        Ok(Workspace::Dir(dir))
    }

    /// Fresh empty file ending in `suffix` (e.g. ".py")
    pub fn file(&self, suffix: &str) -> io::Result<Workspace> {
        let file = tempfile::Builder::new()
            .prefix(&self.names.next_prefix())
            .suffix(suffix)
            .tempfile_in(&self.root)?;
        // only the path is kept; the handle is closed so the file can be rewritten
        let path = file.into_temp_path();
        debug!(path = %path.display(), "Created workspace file");
        Ok(Workspace::File(path))
    }
}

/// A disposable location owned by exactly one request.
///
/// Call [`Workspace::release`] when done. If a workspace is dropped without
/// being released (panic, cancelled task) the location is still removed.
#[derive(Debug)]
pub enum Workspace {
    Dir(TempDir),
    File(TempPath),
}

impl Workspace {
    pub fn path(&self) -> &Path {
        match self {
            Workspace::Dir(dir) => dir.path(),
            Workspace::File(path) => &**path,
        }
    }

    /// Path of an entry inside a directory workspace
    pub fn join(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    /// Remove the location, reporting failure to the caller
    pub fn try_release(self) -> io::Result<()> {
        match self {
            Workspace::Dir(dir) => dir.close(),
            Workspace::File(path) => path.close(),
        }
    }

    /// Remove the location. A failure is logged and otherwise ignored.
    pub fn release(self) {
        let path = self.path().to_path_buf();
        match self.try_release() {
            Ok(()) => debug!(path = %path.display(), "Released workspace"),
            Err(e) => warn!(
                path = %path.display(),
                error = %e,
                "Workspace cleanup failed"
            ),
        }
    }
}
