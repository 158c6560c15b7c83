//! Readable resources and the directories that hold them
//!
//! The parser and resolver never touch the filesystem directly; they see
//! [`Resource`]s and [`ResourcePath`]s. Paths are plain strings with `/`
//! separators since that is what globs match against.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file-like resource that may or may not exist
pub trait Resource {
    /// Absolute path with `/` separators
    fn path(&self) -> &str;

    /// Directory containing this resource
    fn parent(&self) -> Option<Box<dyn ResourcePath>>;

    fn exists(&self) -> bool;

    fn open_reader(&self) -> io::Result<Box<dyn Read + '_>>;
}

/// A directory-like location that resources can be resolved against
pub trait ResourcePath {
    /// Absolute path with `/` separators and no trailing slash (except `/`)
    fn path(&self) -> &str;

    fn parent(&self) -> Option<Box<dyn ResourcePath>>;

    /// The resource called `name` directly inside this path
    fn resolve(&self, name: &str) -> Box<dyn Resource>;
}

/// Render a filesystem path the way globs expect it.
pub fn slash_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    let text = if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.into_owned()
    };

    match text.trim_end_matches('/') {
        "" if text.starts_with('/') => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

// ===========================================
// Filesystem
// ===========================================

/// A file on disk
#[derive(Debug, Clone)]
pub struct FileResource {
    path: PathBuf,
    display: String,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = slash_path(&path);
        Self { path, display }
    }

    pub fn fs_path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn path(&self) -> &str {
        &self.display
    }

    fn parent(&self) -> Option<Box<dyn ResourcePath>> {
        self.path
            .parent()
            .map(|p| Box::new(FilePath::new(p)) as Box<dyn ResourcePath>)
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn open_reader(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }
}

/// A directory on disk
#[derive(Debug, Clone)]
pub struct FilePath {
    path: PathBuf,
    display: String,
}

impl FilePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = slash_path(&path);
        Self { path, display }
    }
}

impl ResourcePath for FilePath {
    fn path(&self) -> &str {
        &self.display
    }

    fn parent(&self) -> Option<Box<dyn ResourcePath>> {
        self.path
            .parent()
            .map(|p| Box::new(FilePath::new(p)) as Box<dyn ResourcePath>)
    }

    fn resolve(&self, name: &str) -> Box<dyn Resource> {
        Box::new(FileResource::new(self.path.join(name)))
    }
}

// ===========================================
// In memory
// ===========================================

/// A set of files held in memory, keyed by absolute `/`-separated path.
///
/// Cloning is cheap; resources handed out share the same file table.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    files: Arc<BTreeMap<String, String>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. Must be called before resources are handed out.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        Arc::make_mut(&mut self.files).insert(path.to_string(), content.to_string());
        self
    }

    pub fn resource(&self, path: &str) -> MemoryResource {
        MemoryResource {
            files: Arc::clone(&self.files),
            path: path.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryResource {
    files: Arc<BTreeMap<String, String>>,
    path: String,
}

impl Resource for MemoryResource {
    fn path(&self) -> &str {
        &self.path
    }

    fn parent(&self) -> Option<Box<dyn ResourcePath>> {
        memory_parent(&self.path).map(|dir| {
            Box::new(MemoryPath {
                files: Arc::clone(&self.files),
                path: dir,
            }) as Box<dyn ResourcePath>
        })
    }

    fn exists(&self) -> bool {
        self.files.contains_key(&self.path)
    }

    fn open_reader(&self) -> io::Result<Box<dyn Read + '_>> {
        let content = self.files.get(&self.path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", self.path))
        })?;
        Ok(Box::new(Cursor::new(content.as_bytes())))
    }
}

#[derive(Debug, Clone)]
pub struct MemoryPath {
    files: Arc<BTreeMap<String, String>>,
    path: String,
}

impl ResourcePath for MemoryPath {
    fn path(&self) -> &str {
        &self.path
    }

    fn parent(&self) -> Option<Box<dyn ResourcePath>> {
        memory_parent(&self.path).map(|dir| {
            Box::new(MemoryPath {
                files: Arc::clone(&self.files),
                path: dir,
            }) as Box<dyn ResourcePath>
        })
    }

    fn resolve(&self, name: &str) -> Box<dyn Resource> {
        let path = if self.path == "/" {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.path)
        };
        Box::new(MemoryResource {
            files: Arc::clone(&self.files),
            path,
        })
    }
}

fn memory_parent(path: &str) -> Option<String> {
    if path == "/" {
        return None;
    }
    match path.rfind('/')? {
        0 => Some("/".to_string()),
        idx => Some(path[..idx].to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_slash_path_trims_trailing_separator() {
        assert_eq!(slash_path(Path::new("/a/b/")), "/a/b");
        assert_eq!(slash_path(Path::new("/")), "/");
    }

    #[test]
    fn test_memory_parent_chain() {
        let tree = MemoryTree::new();
        let resource = tree.resource("/a/b/c.txt");

        let dir = resource.parent().unwrap();
        assert_eq!(dir.path(), "/a/b");
        let dir = dir.parent().unwrap();
        assert_eq!(dir.path(), "/a");
        let dir = dir.parent().unwrap();
        assert_eq!(dir.path(), "/");
        assert!(dir.parent().is_none());
    }

    #[test]
    fn test_memory_resolve_and_read() {
        let tree = MemoryTree::new().with_file("/a/.editorconfig", "root = true\n");
        let dir = tree.resource("/a/x.c").parent().unwrap();

        let config = dir.resolve(".editorconfig");
        assert_eq!(config.path(), "/a/.editorconfig");
        assert!(config.exists());

        let mut text = String::new();
        config.open_reader().unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "root = true\n");

        let missing = dir.parent().unwrap().resolve(".editorconfig");
        assert_eq!(missing.path(), "/.editorconfig");
        assert!(!missing.exists());
        assert!(missing.open_reader().is_err());
    }

    #[test]
    fn test_file_resource() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(".editorconfig");
        fs::write(&file, "[*]\n").unwrap();

        let resource = FileResource::new(&file);
        assert!(resource.exists());
        assert_eq!(resource.parent().unwrap().path(), slash_path(dir.path()));

        let sibling = resource.parent().unwrap().resolve("missing.txt");
        assert!(!sibling.exists());
    }
}
