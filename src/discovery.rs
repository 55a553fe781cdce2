//! Recursive discovery of the scripts to plan.

use crate::reorg_map::{ReorgError, ReorgResult};
use glob::Pattern;
use std::fs;
use std::path::{Component, Path};
use walkdir::{DirEntry, WalkDir};

/// Lists every file below `root` whose bare name matches `pattern`.
///
/// Paths are relative to `root`, joined with `/` on every platform, and
/// returned in ascending order. Entries below the root that cannot be read
/// are skipped; only the root itself has to be readable.
///
/// # Errors
///
/// Returns `ReorgError::Filesystem` if `root` does not exist, is not a
/// directory, or cannot be listed, and for a matching file whose path is
/// not valid UTF-8.
///
/// # Examples
///
/// ```no_run
/// use reorgmap::discovery::discover;
/// use glob::Pattern;
/// use std::path::Path;
///
/// let scripts = discover(Path::new("Assets/Scripts"), &Pattern::new("*.cs").unwrap())?;
/// for script in &scripts {
///     println!("{}", script);
/// }
/// # Ok::<(), reorgmap::ReorgError>(())
/// ```
pub fn discover(root: &Path, pattern: &Pattern) -> ReorgResult<Vec<String>> {
    let filesystem_error = |source: std::io::Error| ReorgError::Filesystem {
        path: root.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(root).map_err(filesystem_error)?;
    if !metadata.is_dir() {
        return Err(filesystem_error(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }
    fs::read_dir(root).map_err(filesystem_error)?;

    let mut relative_paths = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !is_file(&entry) {
            continue;
        }

        // Undecodable names are only an error for files that would be planned.
        let file_name = entry.file_name();
        let candidate = match file_name.to_str() {
            Some(name) => pattern.matches(name),
            None => pattern.matches(&file_name.to_string_lossy()),
        };
        if !candidate {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative_path = to_forward_slashes(relative).ok_or_else(|| ReorgError::Filesystem {
            path: entry.path().to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "path is not valid UTF-8",
            ),
        })?;
        relative_paths.push(relative_path);
    }

    relative_paths.sort();
    Ok(relative_paths)
}

/// Regular files, plus symlinks that resolve to one.
fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Joins the normal components of a relative path with `/`.
///
/// Returns `None` if any component is not valid UTF-8.
pub fn to_forward_slashes(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
