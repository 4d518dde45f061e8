//! The isolation unit: one fresh directory per assignment per candidate.
//!
//! Candidate code and its reference test are copied into fixed subdirectories
//! of a temporary directory, the runner executes in there, and the whole tree
//! is released when the workspace is dropped, on every path including errors.
//! Workspaces are never shared or reused, so state, imports and prior outputs
//! cannot leak between assignments.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use tempfile::TempDir;

/// Subdirectory the candidate's assignment file is staged under.
pub const ASSIGNMENT_DIR: &str = "assignments";
/// Subdirectory the matched reference test is staged under.
pub const TESTS_DIR: &str = "tests";

#[derive(Debug)]
pub struct IsolatedWorkspace {
    dir: TempDir,
}

impl IsolatedWorkspace {
    pub fn create() -> io::Result<Self> {
        let dir = TempDir::new()?;
        debug!("created isolated workspace at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Copies `source` into `subdir` (created on demand) and returns the
    /// staged path relative to the workspace root.
    pub fn stage(&self, subdir: &str, source: &Path) -> io::Result<PathBuf> {
        let dir = self.root().join(subdir);
        fs::create_dir_all(&dir)?;
        let file_name = source.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot stage {}: no file name", source.display()),
            )
        })?;
        fs::copy(source, dir.join(file_name))?;
        Ok(PathBuf::from(subdir).join(file_name))
    }
}
