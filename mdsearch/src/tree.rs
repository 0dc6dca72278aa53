//! Host-supplied file tree structures and flattening.
//!
//! The tree is owned by the host (one listing per opened folder) and is
//! read-only to the engine; field names serialize in the camelCase shape the
//! host wire contract uses.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Node kind in the hierarchical file tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One node of the host-supplied file tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub name: String,
    pub path: PathBuf,
    pub relative_path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

/// Read-only projection of a file node handed to the scan loop
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub path: PathBuf,
    pub relative_path: String,
    pub size: Option<u64>,
}

/// Depth-first traversal yielding only file leaves, in tree display order.
///
/// Directories are structural and never yielded themselves.
pub fn flatten(nodes: &[FileNode]) -> Vec<FileDescriptor> {
    let mut files = Vec::new();
    collect_files(nodes, &mut files);
    files
}

fn collect_files(nodes: &[FileNode], acc: &mut Vec<FileDescriptor>) {
    for node in nodes {
        if node.kind == NodeKind::File {
            acc.push(FileDescriptor {
                path: node.path.clone(),
                relative_path: node.relative_path.clone(),
                size: node.size,
            });
        }
        if !node.children.is_empty() {
            collect_files(&node.children, acc);
        }
    }
}
