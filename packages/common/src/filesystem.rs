use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use walkdir::WalkDir;

/// File system abstraction for template access and testing
pub trait FileSystem: Send + Sync {
    /// Check if a file or directory exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if a path is a symlink, without following it
    fn is_symlink(&self, path: &Path) -> bool;

    /// Canonicalize a path (resolve symlinks, make absolute)
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Every regular file below `path`, depth first with each directory's
    /// entries sorted by name. Symlinks are listed as neither files nor
    /// directories, so they are never followed.
    fn walk_files(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Real file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::copy(from, to).map(|_| ())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn walk_files(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                // The root itself is unreadable
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                }
            }
        }
        Ok(files)
    }
}

/// In-memory file system for testing
///
/// Directories are implied by the files stored beneath them, or created
/// explicitly through `create_dir_all`.
pub struct MockFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(BTreeMap::new()),
            dirs: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files().insert(path.into(), contents.into());
    }

    /// Snapshot of every stored file path
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files().keys().cloned().collect()
    }

    fn files(&self) -> MutexGuard<'_, BTreeMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn all_dirs(&self) -> BTreeSet<PathBuf> {
        let mut dirs = self.dirs.lock().unwrap_or_else(|e| e.into_inner()).clone();
        for path in self.files().keys() {
            for ancestor in path.ancestors().skip(1) {
                if ancestor.as_os_str().is_empty() {
                    break;
                }
                dirs.insert(ancestor.to_path_buf());
            }
        }
        dirs
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", path.display()),
    )
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let is_file = self.files().contains_key(path);
        is_file || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.all_dirs().contains(path)
    }

    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        // For mock, just return the path as-is
        if self.exists(path) {
            Ok(path.to_path_buf())
        } else {
            Err(not_found(path))
        }
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files()
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        let contents = self.read_to_string(from)?;
        self.add_file(to, contents);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.dirs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf());
        Ok(())
    }

    fn walk_files(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.is_dir(path) {
            return Err(not_found(path));
        }
        // Path ordering compares component by component, which is walk order
        Ok(self
            .files()
            .keys()
            .filter(|file| file.starts_with(path))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_walk_lists_nested_files() {
        let fs = MockFileSystem::new();
        fs.add_file("/root/a/one.scriban", "1");
        fs.add_file("/root/a/nested/two.scriban", "2");
        fs.add_file("/root/ab/three.scriban", "3");
        fs.add_file("/root/b.txt", "b");

        let files = fs.walk_files(Path::new("/root/a")).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/root/a/nested/two.scriban"),
                PathBuf::from("/root/a/one.scriban"),
            ]
        );
        assert!(fs.is_dir(Path::new("/root")));
        assert!(!fs.is_dir(Path::new("/root/b.txt")));
        assert_eq!(
            fs.walk_files(Path::new("/root/missing")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_mock_copy_and_missing_file() {
        let fs = MockFileSystem::new();
        fs.add_file("/src.txt", "hello");
        fs.copy(Path::new("/src.txt"), Path::new("/dst.txt")).unwrap();

        assert_eq!(fs.read_to_string(Path::new("/dst.txt")).unwrap(), "hello");
        let err = fs.read_to_string(Path::new("/missing.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_real_walk_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();
        std::fs::write(dir.path().join("c/d.scriban"), "d").unwrap();
        std::fs::write(dir.path().join("b.scriban"), "b").unwrap();
        std::fs::write(dir.path().join("a.scriban"), "a").unwrap();

        let files = RealFileSystem.walk_files(dir.path()).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.scriban"),
                PathBuf::from("b.scriban"),
                PathBuf::from("c/d.scriban"),
            ]
        );
        assert!(RealFileSystem.walk_files(&dir.path().join("missing")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_real_walk_does_not_follow_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let formatting = dir.path().join("Formatting");
        std::fs::create_dir(&formatting).unwrap();
        std::fs::write(formatting.join("A.scriban"), "a").unwrap();
        std::os::unix::fs::symlink(&formatting, formatting.join("loop")).unwrap();
        std::os::unix::fs::symlink(formatting.join("A.scriban"), formatting.join("B.scriban"))
            .unwrap();

        let files = RealFileSystem.walk_files(dir.path()).unwrap();
        assert_eq!(files, vec![formatting.join("A.scriban")]);
    }
}
