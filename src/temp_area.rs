use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile, TempPath};

use crate::error::{SortError, SortResult};

/// Directory and name prefix for intermediate files.
///
/// Every file is created as a [NamedTempFile] and is removed when its handle is dropped, so
/// intermediate files are cleaned up on success, early return and error alike.
#[derive(Clone, Debug)]
pub(crate) struct TempArea {
    dir: PathBuf,
    prefix: String,
}

impl TempArea {
    pub(crate) fn new(dir: PathBuf, prefix: String) -> TempArea {
        TempArea {
            dir,
            prefix,
        }
    }

    /// Create a new temp file named `<prefix><role>-<random><suffix>`
    pub(crate) fn create(&self, role: &str, suffix: &str) -> SortResult<NamedTempFile> {
        let prefix = format!("{}{}-", self.prefix, role);
        let file = Builder::new()
            .prefix(&prefix)
            .suffix(suffix)
            .tempfile_in(&self.dir)?;
        log::debug!("Created temp file {}", file.path().display());
        Ok(file)
    }
}

/// Remove a temp file now, logging instead of failing when removal does not succeed
pub(crate) fn discard(path: TempPath) {
    let display = path.to_path_buf();
    if let Err(e) = path.close() {
        log::warn!("Failed to remove temp file {}: {}", display.display(), e);
    }
}

/// Move a fully written temp file over `target`.
///
/// The rename is atomic when both paths are on the same file system. When the rename fails,
/// for example across devices, the content is copied to a sibling of `target` which is then
/// renamed over it, see [copy_replace].
pub(crate) fn replace_file(replacement: TempPath, target: &Path) -> SortResult<()> {
    let permissions = match fs::metadata(target) {
        Ok(metadata) => { Some(metadata.permissions()) }
        Err(e) => {
            log::warn!("Failed to read metadata of {}: {}", target.display(), e);
            None
        }
    };
    if let Some(permissions) = &permissions {
        if let Err(e) = fs::set_permissions(&replacement, permissions.clone()) {
            log::warn!("Failed to copy permissions of {}: {}", target.display(), e);
        }
    }

    match replacement.persist(target) {
        Ok(()) => {
            log::info!("Replaced {}", target.display());
            Ok(())
        }
        Err(e) => {
            log::warn!("Rename onto {} failed: {}, copying instead", target.display(), e.error);
            let replacement = e.path;
            copy_replace(&replacement, target, permissions)?;
            discard(replacement);
            Ok(())
        }
    }
}

/// Copy `replacement` into a temp file next to `target` and rename it over `target`.
///
/// Only when no file can be created next to `target` is `target` overwritten in place, which
/// is not atomic.
pub(crate) fn copy_replace(replacement: &Path, target: &Path, permissions: Option<fs::Permissions>) -> SortResult<()> {
    let atomic_replace_error = |source| SortError::AtomicReplace { target: target.to_path_buf(), source };
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => { parent }
        _ => { Path::new(".") }
    };

    let sibling = match Builder::new().prefix(".").suffix(".tmp").tempfile_in(parent) {
        Ok(sibling) => { sibling.into_temp_path() }
        Err(e) => {
            log::warn!("Failed to create a temp file in {}: {}, overwriting {} in place",
                parent.display(), e, target.display());
            fs::copy(replacement, target).map_err(atomic_replace_error)?;
            log::info!("Replaced {} by overwrite", target.display());
            return Ok(());
        }
    };

    // on error the sibling is removed when dropped
    fs::copy(replacement, &sibling).map_err(atomic_replace_error)?;
    if let Some(permissions) = permissions {
        if let Err(e) = fs::set_permissions(&sibling, permissions) {
            log::warn!("Failed to copy permissions of {}: {}", target.display(), e);
        }
    }
    sibling.persist(target).map_err(|e| atomic_replace_error(e.error))?;
    log::info!("Replaced {} by copy", target.display());
    Ok(())
}
