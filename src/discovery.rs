//! Root resolution and recursive source discovery
//!
//! Discovery never fails: a missing root, an unreadable directory or an unreadable entry simply
//! contributes no files. Problems are logged at debug level and the walk continues.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{OrderingPolicy, RootRole, SourceRoot};

/// A source root joined onto its anchor directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    pub path: PathBuf,
    pub role: RootRole,
}

/// One discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Index of the root it was found under.
    pub root: usize,
    /// Directories between the root and the file; 0 for files directly inside the root.
    pub depth: usize,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, root: usize, depth: usize) -> Self {
        Self {
            path: path.into(),
            root,
            depth,
        }
    }
}

/// Join every configured root onto `anchor`, keeping configuration order.
///
/// Absolute roots are kept as they are. The process working directory is never consulted, so the
/// same anchor always yields the same roots.
pub fn resolve_roots(anchor: &Path, roots: &[SourceRoot]) -> Vec<ResolvedRoot> {
    roots
        .iter()
        .map(|root| ResolvedRoot {
            path: anchor.join(&root.path),
            role: root.role,
        })
        .collect()
}

/// Recursively collect files with `extension` under one root.
///
/// ## Parameters
/// - `root`: resolved root directory (it may not exist).
/// - `index`: position of the root in the root list, recorded on every file.
/// - `extension`: extension without the dot; compared case-sensitively.
/// - `ordering`: [`OrderingPolicy::Sorted`] sorts by full path string for `local` roots only.
pub fn discover_files(root: &ResolvedRoot, index: usize, extension: &str, ordering: OrderingPolicy) -> Vec<SourceFile> {
    let mut files: Vec<SourceFile> = WalkDir::new(&root.path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(root = %root.path.display(), error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension() == Some(OsStr::new(extension)))
        .map(|entry| SourceFile::new(entry.path(), index, entry.depth().saturating_sub(1)))
        .collect();

    if ordering == OrderingPolicy::Sorted && root.role == RootRole::Local {
        files.sort_by(|a, b| a.path.to_string_lossy().cmp(&b.path.to_string_lossy()));
    }

    tracing::debug!(root = %root.path.display(), count = files.len(), "discovered sources");
    files
}

/// Discover sources under every root, in root-list order.
pub fn discover_all(roots: &[ResolvedRoot], extension: &str, ordering: OrderingPolicy) -> Vec<SourceFile> {
    roots
        .iter()
        .enumerate()
        .flat_map(|(index, root)| discover_files(root, index, extension, ordering))
        .collect()
}
