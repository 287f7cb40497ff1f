//! File access for the transform.
//!
//! The [`WikiStorage`] trait is the only way the transform touches files, so
//! the pipeline can be tested against an in-memory store. [`FsStorage`] is
//! the production implementation over the local filesystem.

use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Directory listing, reads and writes used by the transform.
///
/// Must be `Sync`: pages are read and written from rayon worker threads.
pub trait WikiStorage: Sync {
    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Names of the regular files directly inside `dir`, in no particular order.
    fn list(&self, dir: &Path) -> io::Result<Vec<String>>;

    fn read(&self, path: &Path) -> io::Result<String>;

    fn write(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Local filesystem storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl WikiStorage for FsStorage {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry?;
            if entry.file_type().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }
}
