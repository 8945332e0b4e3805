//! Path confinement: mapping client-relative paths into the working
//! directory.
//!
//! Clients address everything with `/`-separated paths relative to the
//! configured root. Resolution is lexical first (`.` and empty segments
//! dropped, `..` pops, popping past the root is an escape) and, for paths
//! that must exist, verified against the real filesystem so a symlink
//! cannot lead outside the root.

use std::path::{Path, PathBuf};

use crate::fs::error::{map_io_error, FsError};

/// The sandboxed root directory all client paths resolve against.
#[derive(Debug, Clone)]
pub struct Workdir {
    root: PathBuf,
}

/// A client path resolved against the workdir root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Absolute filesystem path, confined to the root.
    pub abs: PathBuf,
    /// Normalized client-relative path, always `/`-prefixed.
    pub rel: String,
}

impl Workdir {
    /// Open a workdir rooted at `root`.
    ///
    /// The root must exist; it is canonicalized up front so boundary
    /// checks compare real paths.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, FsError> {
        let root = root.as_ref();
        let root = root.canonicalize().map_err(|e| map_io_error(e, root))?;
        Ok(Self { root })
    }

    /// The canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lexically resolve a client-supplied path against the root.
    ///
    /// The empty string resolves to `/`. The target does not need to
    /// exist, so this is the entry point for destination paths of
    /// create/move/copy.
    pub fn resolve(&self, raw: &str) -> Result<Resolved, FsError> {
        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(FsError::PathEscape(raw.to_string()));
                    }
                }
                s => segments.push(s),
            }
        }

        let rel = format!("/{}", segments.join("/"));
        let mut abs = self.root.clone();
        abs.extend(&segments);

        // Invariant: the joined path never leaves the root. The segment
        // walk above guarantees this, the check keeps it guaranteed.
        if !abs.starts_with(&self.root) {
            return Err(FsError::PathEscape(raw.to_string()));
        }

        Ok(Resolved { abs, rel })
    }

    /// Resolve a destination path that need not exist yet.
    ///
    /// The parent directory must exist (the operation would fail without
    /// it anyway); it is canonicalized and re-checked against the root,
    /// so a symlinked parent cannot place the final component outside
    /// the workdir.
    pub fn resolve_destination(&self, raw: &str) -> Result<Resolved, FsError> {
        let resolved = self.resolve(raw)?;
        if resolved.abs == self.root {
            return Ok(resolved);
        }
        let (Some(parent), Some(name)) = (resolved.abs.parent(), resolved.abs.file_name()) else {
            return Err(FsError::InvalidName(raw.to_string()));
        };
        let real_parent = parent.canonicalize().map_err(|e| map_io_error(e, parent))?;
        if !real_parent.starts_with(&self.root) {
            return Err(FsError::PathEscape(raw.to_string()));
        }
        Ok(Resolved {
            abs: real_parent.join(name),
            rel: resolved.rel,
        })
    }

    /// Resolve a path that must already exist.
    ///
    /// Follows symlinks via canonicalization and re-checks the root
    /// boundary afterwards: a symlink pointing outside the root is a
    /// [`FsError::PathEscape`], not a valid target.
    pub fn resolve_existing(&self, raw: &str) -> Result<Resolved, FsError> {
        let resolved = self.resolve(raw)?;
        let real = resolved
            .abs
            .canonicalize()
            .map_err(|e| map_io_error(e, &resolved.abs))?;
        if !real.starts_with(&self.root) {
            return Err(FsError::PathEscape(raw.to_string()));
        }
        Ok(Resolved {
            abs: real,
            rel: resolved.rel,
        })
    }
}
