//! One-level directory listing with the wire-format entry model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fs::error::{map_io_error, FsError};
use crate::fs::resolver::{Resolved, Workdir};

/// Node kind on the wire: directories are `0`, files are `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EntryKind {
    Directory,
    File,
}

impl From<EntryKind> for u8 {
    fn from(kind: EntryKind) -> u8 {
        match kind {
            EntryKind::Directory => 0,
            EntryKind::File => 1,
        }
    }
}

impl TryFrom<u8> for EntryKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EntryKind::Directory),
            1 => Ok(EntryKind::File),
            other => Err(format!("invalid entry kind: {other}")),
        }
    }
}

/// One filesystem node as exposed to clients.
///
/// A listing is an `Entry` for the requested directory whose `children`
/// hold its immediate members. Children never carry grandchildren; the
/// listing is exactly one level deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Base name, free of path separators.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Byte length from metadata. For directories this is the raw
    /// metadata size, not a recursive sum.
    pub size: u64,
    /// Seconds since the Unix epoch; 0 when the platform cannot say.
    pub modified_time: i64,
    /// Cleaned client-relative path identifying the node.
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Entry>,
}

/// List one directory level at `client_path`.
///
/// Read-only; the directory read and per-entry metadata fetches run on
/// the blocking pool.
pub async fn list(workdir: &Workdir, client_path: &str) -> Result<Entry, FsError> {
    let resolved = workdir.resolve_existing(client_path)?;
    tokio::task::spawn_blocking(move || list_sync(&resolved))
        .await
        .map_err(|e| FsError::OperationFailed(e.to_string()))?
}

fn list_sync(resolved: &Resolved) -> Result<Entry, FsError> {
    let dir = &resolved.abs;
    let metadata = std::fs::metadata(dir).map_err(|e| map_io_error(e, dir))?;
    if !metadata.is_dir() {
        return Err(FsError::NotFound(format!(
            "{}: not a directory",
            resolved.rel
        )));
    }

    let mut children = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| map_io_error(e, dir))? {
        let entry = entry.map_err(|e| map_io_error(e, dir))?;
        let name = entry.file_name().to_string_lossy().to_string();

        // A metadata failure on one member fails the listing; skipping
        // would silently hide entries.
        let meta = entry
            .metadata()
            .map_err(|e| map_io_error(e, &entry.path()))?;

        let path = if resolved.rel == "/" {
            format!("/{name}")
        } else {
            format!("{}/{name}", resolved.rel)
        };

        children.push(Entry {
            name,
            kind: if meta.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
            size: meta.len(),
            modified_time: modified_epoch(&meta),
            path,
            children: Vec::new(),
        });
    }

    // Directories first, then by name, so listings are deterministic
    // across platforms instead of readdir-ordered.
    children.sort_by(|a, b| {
        (a.kind != EntryKind::Directory)
            .cmp(&(b.kind != EntryKind::Directory))
            .then_with(|| a.name.cmp(&b.name))
    });

    let name = base_name(dir);
    Ok(Entry {
        name,
        kind: EntryKind::Directory,
        size: metadata.len(),
        modified_time: modified_epoch(&metadata),
        path: resolved.rel.clone(),
        children,
    })
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "/".to_string())
}

fn modified_epoch(meta: &std::fs::Metadata) -> i64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workdir() -> (TempDir, Workdir) {
        let tmp = TempDir::new().unwrap();
        let workdir = Workdir::open(tmp.path()).unwrap();
        (tmp, workdir)
    }

    #[tokio::test]
    async fn list_empty_root() {
        let (_tmp, w) = workdir();
        let entry = list(&w, "/").await.unwrap();
        assert_eq!(entry.kind, EntryKind::Directory);
        assert_eq!(entry.path, "/");
        assert!(entry.children.is_empty());
    }

    #[tokio::test]
    async fn list_root_with_file_and_dir() {
        let (tmp, w) = workdir();
        std::fs::write(tmp.path().join("a.txt"), "hello").unwrap();
        std::fs::create_dir(tmp.path().join("b")).unwrap();

        let entry = list(&w, "/").await.unwrap();
        assert_eq!(entry.children.len(), 2);

        // Directories sort before files.
        assert_eq!(entry.children[0].name, "b");
        assert_eq!(entry.children[0].kind, EntryKind::Directory);
        assert_eq!(entry.children[0].path, "/b");

        assert_eq!(entry.children[1].name, "a.txt");
        assert_eq!(entry.children[1].kind, EntryKind::File);
        assert_eq!(entry.children[1].size, 5);
        assert_eq!(entry.children[1].path, "/a.txt");
        assert!(entry.children[1].modified_time > 0);
    }

    #[tokio::test]
    async fn listing_is_one_level_deep() {
        let (tmp, w) = workdir();
        std::fs::create_dir_all(tmp.path().join("outer/inner")).unwrap();
        std::fs::write(tmp.path().join("outer/inner/deep.txt"), "x").unwrap();

        let entry = list(&w, "/").await.unwrap();
        let outer = &entry.children[0];
        assert_eq!(outer.name, "outer");
        assert!(
            outer.children.is_empty(),
            "children of children must stay empty"
        );

        let entry = list(&w, "/outer").await.unwrap();
        assert_eq!(entry.path, "/outer");
        assert_eq!(entry.children.len(), 1);
        assert_eq!(entry.children[0].name, "inner");
        assert!(entry.children[0].children.is_empty());
    }

    #[tokio::test]
    async fn children_sorted_by_name_within_kind() {
        let (tmp, w) = workdir();
        for name in ["zeta.txt", "alpha.txt", "mid.txt"] {
            std::fs::write(tmp.path().join(name), "").unwrap();
        }

        let entry = list(&w, "/").await.unwrap();
        let names: Vec<&str> = entry.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["alpha.txt", "mid.txt", "zeta.txt"]);
    }

    #[tokio::test]
    async fn list_missing_dir() {
        let (_tmp, w) = workdir();
        let result = list(&w, "/nope").await;
        assert!(matches!(result, Err(FsError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_file_is_not_found() {
        let (tmp, w) = workdir();
        std::fs::write(tmp.path().join("plain.txt"), "x").unwrap();
        let result = list(&w, "/plain.txt").await;
        assert!(matches!(result, Err(FsError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_escape_rejected() {
        let (_tmp, w) = workdir();
        let result = list(&w, "/../../etc").await;
        assert!(matches!(result, Err(FsError::PathEscape(_))));
    }

    #[test]
    fn entry_kind_wire_values() {
        assert_eq!(serde_json::to_string(&EntryKind::Directory).unwrap(), "0");
        assert_eq!(serde_json::to_string(&EntryKind::File).unwrap(), "1");
        assert_eq!(
            serde_json::from_str::<EntryKind>("1").unwrap(),
            EntryKind::File
        );
        assert!(serde_json::from_str::<EntryKind>("7").is_err());
    }

    #[test]
    fn entry_json_shape_and_round_trip() {
        let tree = Entry {
            name: "docs".to_string(),
            kind: EntryKind::Directory,
            size: 4096,
            modified_time: 1_700_000_000,
            path: "/docs".to_string(),
            children: vec![Entry {
                name: "a.txt".to_string(),
                kind: EntryKind::File,
                size: 12,
                modified_time: 1_700_000_001,
                path: "/docs/a.txt".to_string(),
                children: Vec::new(),
            }],
        };

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["type"], 0);
        assert_eq!(json["children"][0]["type"], 1);
        assert_eq!(json["children"][0]["modified_time"], 1_700_000_001);
        // Empty children are omitted entirely.
        assert!(json["children"][0].get("children").is_none());

        let parsed: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, tree);
    }
}
