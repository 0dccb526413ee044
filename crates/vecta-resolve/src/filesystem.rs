//! Filesystem-backed resources
//!
//! References are resolved below a base directory, usually the one holding
//! the source document. Documents are untrusted input, so a reference may not
//! name an absolute path, climb above the base with `..`, or reach outside it
//! through a symlink. Any of those is reported as not found.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, OnceLock};

use vecta_core::{ResourceError, ResourceProvider, SharedImageData};

/// Loads resources from below a base directory
///
/// The base does not have to exist yet. It is canonicalized the first time a
/// lookup finds it on disk.
#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    canonical_base: OnceLock<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            canonical_base: OnceLock::new(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    fn canonical_base(&self) -> Option<&Path> {
        if let Some(base) = self.canonical_base.get() {
            return Some(base);
        }
        let canonical = self.base_path.canonicalize().ok()?;
        Some(self.canonical_base.get_or_init(|| canonical))
    }

    /// Maps a reference to a path below the base
    ///
    /// The reference is first checked lexically. If the target exists, its
    /// canonical form must also sit below the canonical base.
    fn locate(&self, reference: &str) -> Result<PathBuf, ResourceError> {
        let escapes = || ResourceError::NotFound(format!("{reference} (outside base directory)"));

        let mut relative = PathBuf::new();
        for component in Path::new(reference).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !relative.pop() {
                        return Err(escapes());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(escapes()),
            }
        }

        let joined = self.base_path.join(relative);
        match (joined.canonicalize(), self.canonical_base()) {
            (Ok(target), Some(base)) if !target.starts_with(base) => Err(escapes()),
            (Ok(target), Some(_)) => Ok(target),
            _ => Ok(joined),
        }
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedImageData, ResourceError> {
        let target = self.locate(path)?;
        match fs::read(&target) {
            Ok(bytes) => Ok(Arc::from(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(ResourceError::NotFound(path.to_string()))
            }
            Err(err) => Err(ResourceError::LoadFailed {
                path: path.to_string(),
                message: err.to_string(),
            }),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.locate(path).is_ok_and(|target| target.is_file())
    }

    fn size_hint(&self, path: &str) -> Option<u64> {
        let metadata = fs::metadata(self.locate(path).ok()?).ok()?;
        metadata.is_file().then(|| metadata.len())
    }

    fn base_path(&self) -> Option<&str> {
        self.base_path.to_str()
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
