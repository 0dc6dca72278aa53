use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::tempdir;

use mdsearch::{
    open_project, replace_all_in_project, replace_and_rescan, search, FileHost, FileNode,
    LocalFileHost, QueryOptions, SearchConfig, SearchError, SearchResult,
};

fn config(root: &Path, query: &str) -> SearchConfig {
    SearchConfig {
        query: query.to_string(),
        case_sensitive: false,
        whole_word: false,
        use_regex: false,
        include: vec![],
        exclude: vec![],
        root_path: root.to_path_buf(),
        preview_context: 24,
        log_level: "warn".to_string(),
    }
}

#[tokio::test]
async fn test_literal_query_with_metacharacters() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "a.b*c and aXbYc").unwrap();

    let host = LocalFileHost::new();
    let tree = open_project(&host, dir.path()).unwrap();
    let result = search(&host, &tree, &config(dir.path(), "a.b*c"))
        .await
        .unwrap();

    // The dot and star are literal, so only the exact substring matches.
    assert_eq!(result.total_matches, 1);
    let m = &result.file_results[0].matches[0];
    assert_eq!(m.span.start, 0);
    assert_eq!(m.span.text, "a.b*c");
}

#[tokio::test]
async fn test_whole_word_matching() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "category cat catalog").unwrap();

    let host = LocalFileHost::new();
    let tree = open_project(&host, dir.path()).unwrap();
    let mut cfg = config(dir.path(), "cat");
    cfg.whole_word = true;

    let result = search(&host, &tree, &cfg).await.unwrap();
    assert_eq!(result.total_matches, 1);
    assert_eq!(result.file_results[0].matches[0].span.start, 9);
}

#[tokio::test]
async fn test_case_sensitivity_modes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "test Test TEST").unwrap();

    let host = LocalFileHost::new();
    let tree = open_project(&host, dir.path()).unwrap();

    let insensitive = search(&host, &tree, &config(dir.path(), "Test"))
        .await
        .unwrap();
    assert_eq!(insensitive.total_matches, 3);

    let mut cfg = config(dir.path(), "Test");
    cfg.case_sensitive = true;
    let sensitive = search(&host, &tree, &cfg).await.unwrap();
    assert_eq!(sensitive.total_matches, 1);
}

#[tokio::test]
async fn test_line_and_column_reporting() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "ab\ncd\nef").unwrap();

    let host = LocalFileHost::new();
    let tree = open_project(&host, dir.path()).unwrap();
    let result = search(&host, &tree, &config(dir.path(), "d")).await.unwrap();

    let m = &result.file_results[0].matches[0];
    assert_eq!(m.line, 2);
    assert_eq!(m.column, 2);
}

#[tokio::test]
async fn test_zero_width_regex_terminates() {
    let dir = tempdir().unwrap();
    let content = "plain text without the letter";
    fs::write(dir.path().join("a.md"), content).unwrap();

    let host = LocalFileHost::new();
    let tree = open_project(&host, dir.path()).unwrap();
    let mut cfg = config(dir.path(), "x*");
    cfg.use_regex = true;

    let result = search(&host, &tree, &cfg).await.unwrap();
    let matches = &result.file_results[0].matches;

    // Bounded, finite match count with a non-decreasing cursor.
    assert!(matches.len() <= content.len() + 1);
    let mut previous = 0;
    for m in matches {
        assert!(m.span.start >= previous);
        previous = m.span.start;
    }
}

#[tokio::test]
async fn test_glob_include_exclude() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("notes/draft")).unwrap();
    fs::write(dir.path().join("notes/x.md"), "needle").unwrap();
    fs::write(dir.path().join("notes/draft/x.md"), "needle").unwrap();
    fs::write(dir.path().join("notes/x.txt"), "needle").unwrap();

    let host = LocalFileHost::new();
    let tree = open_project(&host, dir.path()).unwrap();
    let mut cfg = config(dir.path(), "needle");
    cfg.include = vec!["**/*.md".to_string()];
    cfg.exclude = vec!["**/draft/**".to_string()];

    let result = search(&host, &tree, &cfg).await.unwrap();
    let paths: Vec<_> = result
        .file_results
        .iter()
        .map(|f| f.relative_path.as_str())
        .collect();
    assert_eq!(paths, ["notes/x.md"]);
}

#[tokio::test]
async fn test_replace_all_round_trip() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("notes")).unwrap();
    fs::write(dir.path().join("a.md"), "aaa\n").unwrap();
    fs::write(dir.path().join("notes/b.md"), "a line with a and a\n").unwrap();

    let host = LocalFileHost::new();
    let tree = open_project(&host, dir.path()).unwrap();
    let cfg = config(dir.path(), "a");

    let (summary, fresh) = replace_and_rescan(&host, &tree, &cfg, "bb").await.unwrap();

    // Growing replacements must not corrupt later offsets in the same file.
    assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "bbbbbb\n");
    assert!(summary.total_replaced > 0);
    assert_eq!(summary.files_changed, 2);

    // Search → replace-all → re-search yields zero remaining matches.
    assert!(fresh.is_empty());
}

#[tokio::test]
async fn test_searches_are_repeatable_and_ordered() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a.md"), "needle").unwrap();
    fs::write(dir.path().join("sub/b.md"), "needle").unwrap();
    fs::write(dir.path().join("z.md"), "needle").unwrap();

    let host = LocalFileHost::new();
    let tree = open_project(&host, dir.path()).unwrap();
    let cfg = config(dir.path(), "needle");

    let first = search(&host, &tree, &cfg).await.unwrap();
    let second = search(&host, &tree, &cfg).await.unwrap();

    let order = |r: &mdsearch::ProjectSearchResult| {
        r.file_results
            .iter()
            .map(|f| f.relative_path.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(order(&first), order(&second));
    assert_eq!(order(&first), ["a.md", "sub/b.md", "z.md"]);
}

/// In-memory host: tree and contents are fixed, and chosen paths fail.
struct MemoryHost {
    tree: Vec<FileNode>,
    contents: Vec<(PathBuf, String)>,
    broken: Vec<PathBuf>,
}

impl MemoryHost {
    fn lookup(&self, path: &Path) -> SearchResult<String> {
        if self.broken.iter().any(|p| p == path) {
            return Err(SearchError::file_access(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "broken"),
            ));
        }
        self.contents
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| {
                SearchError::file_access(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                )
            })
    }
}

#[async_trait]
impl FileHost for MemoryHost {
    async fn read_file(&self, path: &Path) -> SearchResult<String> {
        self.lookup(path)
    }

    async fn write_file(&self, _path: &Path, _content: &str) -> SearchResult<()> {
        Ok(())
    }

    fn list_tree(&self, _root: &Path) -> SearchResult<Vec<FileNode>> {
        Ok(self.tree.clone())
    }
}

fn memory_file(rel: &str) -> FileNode {
    FileNode {
        name: rel.rsplit('/').next().unwrap().to_string(),
        path: PathBuf::from("/mem").join(rel),
        relative_path: rel.to_string(),
        kind: mdsearch::NodeKind::File,
        size: None,
        children: vec![],
    }
}

#[tokio::test]
async fn test_unreadable_file_degrades_gracefully() {
    let host = MemoryHost {
        tree: vec![memory_file("broken.md"), memory_file("good.md")],
        contents: vec![
            (PathBuf::from("/mem/broken.md"), "needle".to_string()),
            (PathBuf::from("/mem/good.md"), "needle needle".to_string()),
        ],
        broken: vec![PathBuf::from("/mem/broken.md")],
    };

    let tree = host.list_tree(Path::new("/mem")).unwrap();
    let result = search(&host, &tree, &config(Path::new("/mem"), "needle"))
        .await
        .unwrap();

    // The broken file contributes no matches but the scan still completes.
    assert_eq!(result.files_scanned, 2);
    assert_eq!(result.files_with_matches, 1);
    assert_eq!(result.total_matches, 2);
    assert_eq!(result.file_results[0].relative_path, "good.md");
}

#[tokio::test]
async fn test_project_replace_reports_surviving_counts() {
    let host = MemoryHost {
        tree: vec![memory_file("broken.md"), memory_file("good.md")],
        contents: vec![(PathBuf::from("/mem/good.md"), "needle".to_string())],
        broken: vec![],
    };

    let tree = host.list_tree(Path::new("/mem")).unwrap();
    let results = search(&host, &tree, &config(Path::new("/mem"), "needle"))
        .await
        .unwrap();

    let summary = replace_all_in_project(
        &host,
        &results,
        "needle",
        QueryOptions::default(),
        "thread",
    )
    .await
    .unwrap();

    assert_eq!(summary.files_changed, 1);
    assert_eq!(summary.total_replaced, 1);
}

#[tokio::test]
async fn test_pattern_error_reported_before_any_result() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "content").unwrap();

    let host = LocalFileHost::new();
    let tree = open_project(&host, dir.path()).unwrap();
    let mut cfg = config(dir.path(), "[unclosed");
    cfg.use_regex = true;

    let err = search(&host, &tree, &cfg).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidPattern(_)));
}

#[tokio::test]
async fn test_missing_root_is_rejected() {
    let host = LocalFileHost::new();
    let err = open_project(&host, Path::new("/no/such/project/root")).unwrap_err();
    assert!(matches!(err, SearchError::NoRoot));
}
