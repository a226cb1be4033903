//! The scratch workspace: one directory, one active image, one crop result.
//!
//! All process-wide mutable state of the service lives in a single
//! [`Workspace`] value — the root directory plus two path slots:
//!
//! - **active**: the file every edit operation reads and overwrites. Set by
//!   the upload handler, last writer wins.
//! - **cut**: the most recent crop output. Set by the crop handler and
//!   consumed read-only by the copy-back handler; `None` until the first
//!   crop.
//!
//! The workspace itself is not synchronized; the handler layer wraps it in
//! a single mutex so concurrent requests serialize (see [`crate::api`]).
//!
//! ## Well-known filenames
//!
//! | File | Role |
//! |---|---|
//! | `<uploaded name>` | active image |
//! | `cut_image.jpg` | crop output |
//! | `filled_image<ext>` | flood-fill output, `<ext>` copied from the active file |

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Crop results are always encoded as JPEG under this name.
const CUT_FILENAME: &str = "cut_image.jpg";

/// Stem of the flood-fill output; the active file's extension is appended.
const FILLED_STEM: &str = "filled_image";

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("no active image")]
    NoActiveImage,
    #[error("invalid upload name {0:?}")]
    InvalidName(String),
}

/// Outcome of removing one directory entry during upload cleanup.
///
/// Cleanup is best-effort: every entry is attempted and the full list is
/// returned, so callers (and tests) can see exactly which removals failed
/// instead of learning only about the first.
#[derive(Debug)]
pub struct Removal {
    pub path: PathBuf,
    pub result: io::Result<()>,
}

impl Removal {
    pub fn failed(&self) -> bool {
        self.result.is_err()
    }
}

/// The single-image scratch workspace.
pub struct Workspace {
    root: PathBuf,
    active: Option<PathBuf>,
    cut: Option<PathBuf>,
}

impl Workspace {
    /// Open a workspace rooted at `root`, creating the directory if needed.
    ///
    /// Slots start empty: files left over from a previous process are not
    /// re-adopted, matching the upload-before-editing contract.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            active: None,
            cut: None,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove every entry under the workspace root, best-effort.
    ///
    /// Files and symlinks are unlinked; directories are removed recursively.
    /// Returns one [`Removal`] per entry in the order encountered. An
    /// unreadable root yields a single failed entry for the root itself.
    pub fn clear(&self) -> Vec<Removal> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Removal {
                    path: self.root.clone(),
                    result: Err(e),
                }];
            }
        };

        let mut removals = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            // symlinks must not be followed into their targets
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let result = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removals.push(Removal { path, result });
        }
        removals
    }

    /// Write uploaded bytes under the workspace root and make them the
    /// active image.
    ///
    /// Only the final path component of `name` is used, so a client cannot
    /// escape the workspace with separators or `..`.
    pub fn store_active(&mut self, name: &str, bytes: &[u8]) -> Result<PathBuf, WorkspaceError> {
        let filename = Path::new(name)
            .file_name()
            .ok_or_else(|| WorkspaceError::InvalidName(name.to_string()))?;

        let path = self.root.join(filename);
        fs::write(&path, bytes)?;
        self.active = Some(path.clone());
        Ok(path)
    }

    /// The active image file, if one has been uploaded and still exists.
    pub fn active_file(&self) -> Result<&Path, WorkspaceError> {
        match &self.active {
            Some(path) if path.exists() => Ok(path),
            _ => Err(WorkspaceError::NoActiveImage),
        }
    }

    /// The active slot regardless of whether the file still exists.
    ///
    /// Copy-back writes here, so an active image deleted out from under the
    /// service is recreated rather than refused.
    pub fn active_slot(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    /// The most recent crop output, if one exists on disk.
    pub fn cut_file(&self) -> Option<&Path> {
        self.cut.as_deref().filter(|p| p.exists())
    }

    /// Where the next crop result will be written.
    pub fn cut_output_path(&self) -> PathBuf {
        self.root.join(CUT_FILENAME)
    }

    /// Record a successfully written crop output.
    pub fn set_cut(&mut self, path: PathBuf) {
        self.cut = Some(path);
    }

    /// Where the flood-fill result for the current active image goes.
    ///
    /// Mirrors the active file's extension so the encoder picks the same
    /// format (`a.png` → `filled_image.png`).
    pub fn filled_output_path(&self) -> Result<PathBuf, WorkspaceError> {
        let active = self.active_file()?;
        let mut name = String::from(FILLED_STEM);
        if let Some(ext) = active.extension().and_then(|e| e.to_str()) {
            name.push('.');
            name.push_str(ext);
        }
        Ok(self.root.join(name))
    }
}
