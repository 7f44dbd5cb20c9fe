//! Path helpers for destinations and configured directories.
//!
//! Everything here is lexical: nothing touches the filesystem, so paths that
//! do not exist yet normalize the same way as ones that do.

use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::template;

/// Remove `.` components and resolve `..` against preceding components.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use scenerename::paths::normalize;
///
/// assert_eq!(normalize(Path::new("/a/./b/../c")), Path::new("/a/c"));
/// assert_eq!(normalize(Path::new("/../x")), Path::new("/x"));
/// ```
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Resolve a relative path against the working directory.
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            tracing::warn!("Cannot read working directory, keeping {:?} relative: {}", path, e);
            path.to_path_buf()
        }
    }
}

/// Absolute, normalized form of `path`.
pub fn clean(path: &Path) -> PathBuf {
    normalize(&absolute(path))
}

/// Join a base directory with a rendered name.
pub fn resolve_destination(base: &Path, rendered_name: &str) -> PathBuf {
    clean(&base.join(rendered_name))
}

/// Turn a configured directory into a path: render it as a template with no
/// fields, then expand a leading `~`.
pub fn expand_directory(dir: &str) -> Result<PathBuf> {
    let rendered = template::render(dir, &serde_json::json!({}))?;
    let expanded = shellexpand::tilde(&rendered);
    Ok(clean(Path::new(expanded.as_ref())))
}

/// Whether two paths name the same location once normalized.
pub fn same_location(a: &Path, b: &Path) -> bool {
    clean(a) == clean(b)
}

/// File suffix without the dot, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}
