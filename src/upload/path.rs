//! Destination confinement for upload filenames.
//!
//! Client-supplied names (request paths, multipart filenames) never get to
//! pick a location outside the served directory.

use std::path::{Component, Path, PathBuf};

use super::sink::UploadError;

/// Resolve `name` to a destination inside `dir`.
///
/// Leading slashes are ignored (PUT paths arrive as `/foo.txt`). Any parent,
/// root or prefix component is rejected rather than collapsed: a name like
/// `../../etc/passwd` must never resolve outside `dir`.
pub fn confine(dir: &Path, name: &str) -> Result<PathBuf, UploadError> {
    let trimmed = name.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(UploadError::UnsafeFilename(name.to_owned()));
    }

    let relative = Path::new(trimmed);
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(UploadError::UnsafeFilename(name.to_owned()));
            }
        }
    }

    Ok(dir.join(relative))
}
