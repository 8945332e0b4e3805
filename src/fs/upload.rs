//! Streamed uploads written to a temp file and renamed into place.
//!
//! A part's bytes never touch the final name until the whole part has
//! been written and flushed; an interrupted upload leaves at most a
//! `.part` temp file, never a truncated file under the real name.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::fs::error::{map_io_error, FsError};

/// Distinguishes temp files created within one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reduce a client-supplied part filename to a safe bare name.
///
/// Takes the last `/`- or `\`-separated component, so a crafted name
/// like `evil/../../escape.txt` lands inside the target directory as
/// `escape.txt` instead of traversing out of it.
pub fn sanitize_file_name(raw: &str) -> Result<String, FsError> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    match base {
        "" | "." | ".." => Err(FsError::InvalidName(raw.to_string())),
        name => Ok(name.to_string()),
    }
}

/// Writer for one uploaded file part.
///
/// Bytes go to a uniquely named `.part` file in the destination
/// directory; [`finish`](Self::finish) renames it over the final name.
pub struct UploadWriter {
    writer: BufWriter<File>,
    tmp_path: PathBuf,
    dest: PathBuf,
}

impl UploadWriter {
    /// Open a writer for `file_name` (sanitized per
    /// [`sanitize_file_name`]) under `dir`.
    pub async fn create(dir: &Path, file_name: &str) -> Result<Self, FsError> {
        let name = sanitize_file_name(file_name)?;
        let dest = dir.join(&name);
        let tmp_path = dir.join(format!(
            ".{}.{}.{}.part",
            name,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let file = File::create(&tmp_path)
            .await
            .map_err(|e| map_io_error(e, &tmp_path))?;
        Ok(Self {
            writer: BufWriter::new(file),
            tmp_path,
            dest,
        })
    }

    /// Append a chunk of the part body.
    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), FsError> {
        self.writer
            .write_all(chunk)
            .await
            .map_err(|e| map_io_error(e, &self.tmp_path))
    }

    /// Flush and atomically rename the temp file over the final name.
    /// An existing file at the destination is replaced.
    pub async fn finish(mut self) -> Result<(), FsError> {
        self.writer
            .flush()
            .await
            .map_err(|e| map_io_error(e, &self.tmp_path))?;
        fs::rename(&self.tmp_path, &self.dest)
            .await
            .map_err(|e| map_io_error(e, &self.tmp_path))
    }

    /// Discard the part, removing the temp file. Best-effort.
    pub async fn abort(self) {
        drop(self.writer);
        let _ = fs::remove_file(&self.tmp_path).await;
    }

    /// Final destination path of this part.
    pub fn dest(&self) -> &Path {
        &self.dest
    }
}
