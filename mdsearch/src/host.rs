//! The boundary between the engine and its host environment.
//!
//! The engine never touches the disk directly: content is fetched on demand
//! per file through [`FileHost`], used to produce matches or replacements,
//! and discarded. [`LocalFileHost`] is the production implementation over
//! `tokio::fs`; editor hosts embed their own.

use async_trait::async_trait;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::errors::{SearchError, SearchResult};
use crate::tree::{FileNode, NodeKind};

/// Extensions a workspace tree exposes to the engine
const DOCUMENT_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Asynchronous file I/O and tree listing supplied by the host
#[async_trait]
pub trait FileHost: Send + Sync {
    /// Reads a file as UTF-8 text
    async fn read_file(&self, path: &Path) -> SearchResult<String>;

    /// Overwrites a file with UTF-8 text
    async fn write_file(&self, path: &Path, content: &str) -> SearchResult<()>;

    /// Lists the hierarchical file tree under a root directory
    fn list_tree(&self, root: &Path) -> SearchResult<Vec<FileNode>>;
}

/// Validates the project root and returns its file tree.
///
/// A missing or non-directory root surfaces [`SearchError::NoRoot`] before
/// any scanning begins.
pub fn open_project(host: &dyn FileHost, root: &Path) -> SearchResult<Vec<FileNode>> {
    if !root.is_dir() {
        return Err(SearchError::NoRoot);
    }
    host.list_tree(root)
}

/// Host implementation over the local filesystem.
///
/// Tree listings are restricted to document extensions, pruned of empty
/// directories, sorted by name for deterministic ordering, and tolerant of
/// unreadable entries (skipped with a warning). Dot-entries are not
/// traversed.
#[derive(Debug, Clone, Default)]
pub struct LocalFileHost;

impl LocalFileHost {
    pub fn new() -> Self {
        Self
    }

    fn is_document(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                DOCUMENT_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    fn read_dir_recursive(dir: &Path, relative: &str) -> Vec<FileNode> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();

        let mut nodes = Vec::new();
        for name in names {
            let path = dir.join(&name);
            let child_relative = if relative.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", relative, name)
            };

            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    warn!("Cannot access {}: {}", path.display(), e);
                    continue;
                }
            };

            if metadata.is_dir() {
                let children = Self::read_dir_recursive(&path, &child_relative);
                if !children.is_empty() {
                    nodes.push(FileNode {
                        name,
                        path,
                        relative_path: child_relative,
                        kind: NodeKind::Directory,
                        size: None,
                        children,
                    });
                }
            } else if metadata.is_file() && Self::is_document(&path) {
                nodes.push(FileNode {
                    name,
                    path,
                    relative_path: child_relative,
                    kind: NodeKind::File,
                    size: Some(metadata.len()),
                    children: vec![],
                });
            }
        }
        nodes
    }
}

#[async_trait]
impl FileHost for LocalFileHost {
    async fn read_file(&self, path: &Path) -> SearchResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SearchError::file_access(path, e))
    }

    async fn write_file(&self, path: &Path, content: &str) -> SearchResult<()> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| SearchError::file_access(path, e))
    }

    fn list_tree(&self, root: &Path) -> SearchResult<Vec<FileNode>> {
        Ok(Self::read_dir_recursive(root, ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::flatten;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_list_tree_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("notes/draft")).unwrap();
        fs::write(dir.path().join("zeta.md"), "z").unwrap();
        fs::write(dir.path().join("alpha.txt"), "a").unwrap();
        fs::write(dir.path().join("image.png"), [0u8; 4]).unwrap();
        fs::write(dir.path().join("notes/b.markdown"), "b").unwrap();
        fs::write(dir.path().join("notes/draft/c.md"), "c").unwrap();

        let host = LocalFileHost::new();
        let tree = open_project(&host, dir.path()).unwrap();
        let files: Vec<_> = flatten(&tree)
            .into_iter()
            .map(|f| f.relative_path)
            .collect();

        assert_eq!(
            files,
            ["alpha.txt", "notes/b.markdown", "notes/draft/c.md", "zeta.md"]
        );
    }

    #[test]
    fn test_empty_directories_are_pruned() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("only/binaries")).unwrap();
        fs::write(dir.path().join("only/binaries/tool.exe"), [0u8; 4]).unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();

        let host = LocalFileHost::new();
        let tree = host.list_tree(dir.path()).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "a.md");
    }

    #[test]
    fn test_dot_entries_are_skipped() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/notes.md"), "hidden").unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();

        let host = LocalFileHost::new();
        let files = flatten(&host.list_tree(dir.path()).unwrap());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "a.md");
    }

    #[test]
    fn test_open_project_requires_directory() {
        let host = LocalFileHost::new();
        let err = open_project(&host, Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, SearchError::NoRoot));
    }

    #[tokio::test]
    async fn test_read_failure_maps_to_file_access() {
        let host = LocalFileHost::new();
        let err = host
            .read_file(Path::new("/definitely/not/here.md"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::FileAccess { .. }));
    }
}
