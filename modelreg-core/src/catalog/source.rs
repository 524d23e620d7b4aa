//! Read-only file trees the loader can build a catalog from
//!
//! A source is either a local directory (downloaded release data) or the
//! bundle compiled into the library. Paths are always `/`-separated and
//! relative to the tree root, and are listed in sorted order so that loads
//! are reproducible.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::bundled;
use crate::error::LoadError;

/// A virtual read-only file tree
pub trait CatalogSource: Send + Sync {
    /// Human-readable description for logs
    fn describe(&self) -> String;

    /// All regular files in the tree, sorted
    fn paths(&self) -> Result<Vec<String>, LoadError>;

    /// Contents of one file returned by [`paths`](Self::paths)
    fn read(&self, path: &str) -> Result<Cow<'static, [u8]>, LoadError>;
}

/// A catalog tree on the local filesystem
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Join a relative path's components with `/`
fn to_slash(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

impl CatalogSource for DirSource {
    fn describe(&self) -> String {
        format!("local directory {}", self.root.display())
    }

    fn paths(&self) -> Result<Vec<String>, LoadError> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|source| LoadError::Walk {
                path: self.root.clone(),
                source,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            // walkdir only yields paths below the root it was given
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                paths.push(to_slash(relative));
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<Cow<'static, [u8]>, LoadError> {
        let full = path
            .split('/')
            .fold(self.root.clone(), |acc, part| acc.join(part));

        std::fs::read(&full)
            .map(Cow::Owned)
            .map_err(|source| LoadError::Read { path: full, source })
    }
}

/// The catalog compiled into this library
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl CatalogSource for EmbeddedSource {
    fn describe(&self) -> String {
        format!("embedded bundle {}", bundled::BUNDLED_VERSION)
    }

    fn paths(&self) -> Result<Vec<String>, LoadError> {
        let mut paths: Vec<String> = bundled::FILES
            .iter()
            .map(|(path, _)| (*path).to_string())
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<Cow<'static, [u8]>, LoadError> {
        bundled::FILES
            .iter()
            .find(|(candidate, _)| *candidate == path)
            .map(|(_, contents)| Cow::Borrowed(contents.as_bytes()))
            .ok_or_else(|| LoadError::Read {
                path: PathBuf::from(path),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "not part of the embedded bundle",
                ),
            })
    }
}
