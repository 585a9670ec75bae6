use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::HarnessError;
use crate::testing::options::EntryOrder;

/// What a path refers to, as far as discovery cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Missing paths, dangling links, sockets and the like.
    Other,
}

/// Directory listing used by [`discover`].
pub trait DirectorySource {
    fn kind(&self, path: &Path) -> EntryKind;

    /// Names of the entries directly inside `dir`, in listing order.
    fn entries(&self, dir: &Path) -> io::Result<Vec<OsString>>;
}

/// Lists the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl DirectorySource for FsSource {
    fn kind(&self, path: &Path) -> EntryKind {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            Ok(meta) if meta.is_file() => EntryKind::File,
            _ => EntryKind::Other,
        }
    }

    fn entries(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            names.push(entry?.file_name().to_os_string());
        }
        Ok(names)
    }
}

/// An in-memory directory tree. Entries are listed in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    entries: Vec<(PathBuf, EntryKind)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory and any missing ancestors.
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), EntryKind::Directory);
        self
    }

    /// Adds a file and any missing ancestor directories.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), EntryKind::File);
        self
    }

    fn insert(&mut self, path: &Path, kind: EntryKind) {
        let mut ancestors: Vec<&Path> = path
            .ancestors()
            .skip(1)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        ancestors.reverse();
        for dir in ancestors {
            if !self.entries.iter().any(|(p, _)| p == dir) {
                self.entries.push((dir.to_path_buf(), EntryKind::Directory));
            }
        }
        if !self.entries.iter().any(|(p, _)| p == path) {
            self.entries.push((path.to_path_buf(), kind));
        }
    }
}

impl DirectorySource for MemorySource {
    fn kind(&self, path: &Path) -> EntryKind {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map_or(EntryKind::Other, |(_, kind)| *kind)
    }

    fn entries(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        if self.kind(dir) != EntryKind::Directory {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", dir.display()),
            ));
        }
        Ok(self
            .entries
            .iter()
            .filter(|(p, _)| p.parent() == Some(dir))
            .filter_map(|(p, _)| p.file_name().map(|n| n.to_os_string()))
            .collect())
    }
}

/// A discovered tree of fixtures: groups mirror directories, cases mirror
/// files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureNode {
    Group(FixtureGroup),
    Case(FixtureCase),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureGroup {
    pub name: String,
    pub children: Vec<FixtureNode>,
}

impl FixtureGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Number of cases anywhere below this group.
    pub fn case_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                FixtureNode::Group(group) => group.case_count(),
                FixtureNode::Case(_) => 1,
            })
            .sum()
    }
}

/// One fixture file, not yet loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCase {
    /// File name without extension.
    pub name: String,
    pub path: PathBuf,
}

impl FixtureCase {
    /// Identifying description of the case: its full path.
    pub fn description(&self) -> String {
        self.path.display().to_string()
    }
}

/// Walks `base/relative` and attaches what it finds to `out`.
///
/// A directory becomes a group named after its last path segment holding one
/// child per entry; a regular file becomes a case. Anything else is skipped.
/// Returns the number of cases found, which is zero for an empty directory.
pub fn discover(
    listing: &dyn DirectorySource,
    base: &Path,
    relative: &Path,
    order: EntryOrder,
    out: &mut FixtureGroup,
) -> Result<usize, HarnessError> {
    let full = base.join(relative);
    match listing.kind(&full) {
        EntryKind::Directory => {
            let mut group = FixtureGroup::new(last_segment(relative));
            let mut names = listing
                .entries(&full)
                .map_err(|source| HarnessError::Discovery {
                    path: full.clone(),
                    source,
                })?;
            if order == EntryOrder::Sorted {
                names.sort();
            }

            let mut count = 0;
            for name in names {
                count += discover(listing, base, &relative.join(name), order, &mut group)?;
            }
            debug!(group = %group.name, cases = count, "discovered fixture directory");
            out.children.push(FixtureNode::Group(group));
            Ok(count)
        }
        EntryKind::File => {
            let name = relative
                .file_stem()
                .map_or_else(|| last_segment(relative), |s| s.to_string_lossy().into_owned());
            out.children.push(FixtureNode::Case(FixtureCase { name, path: full }));
            Ok(1)
        }
        EntryKind::Other => {
            debug!(path = %full.display(), "skipping entry that is neither file nor directory");
            Ok(0)
        }
    }
}

fn last_segment(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}
