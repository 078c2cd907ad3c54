//! Output path helpers.

use std::path::{Path, PathBuf};

/// `path` itself if nothing exists there, otherwise the first free
/// `stem_N.ext` beside it.
pub fn unused_filepath(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    (1u32..)
        .map(|n| {
            let name = match &extension {
                Some(ext) => format!("{stem}_{n}.{ext}"),
                None => format!("{stem}_{n}"),
            };
            parent.join(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Resolve a path recorded in a file: as given, else relative to `base_dir`.
pub fn resolve_recorded_path(recorded: &str, base_dir: &Path) -> PathBuf {
    let direct = PathBuf::from(recorded);
    if direct.exists() || direct.is_absolute() {
        return direct;
    }
    let relative = base_dir.join(&direct);
    if relative.exists() {
        return relative;
    }
    match direct.file_name() {
        Some(name) if base_dir.join(name).exists() => base_dir.join(name),
        _ => direct,
    }
}

/// File stem of a recorded image name, for naming derived files.
pub fn stem_of(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string())
}
