// Path resolution: turn the path the user typed into the file's location
// relative to the local sync folder.

use crate::error::{OwError, Result};
use std::path::{Component, Path, PathBuf};

/// A local file inside the sync folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    /// Absolute, symlink-free path on the local filesystem.
    pub absolute: PathBuf,
    /// Path below the sync folder, `/`-separated, no leading separator.
    pub relative: String,
}

/// Resolve `input` and strip `sync_root` from it.
///
/// The comparison is done component by component, so `/home/u/Nextcloud2`
/// is not considered to be inside `/home/u/Nextcloud`.
pub fn resolve_target(input: &Path, sync_root: &Path) -> Result<TargetRef> {
    if !input.exists() {
        return Err(OwError::PathNotFound(input.to_path_buf()));
    }
    let absolute = input
        .canonicalize()
        .map_err(|_| OwError::PathNotFound(input.to_path_buf()))?;

    // the sync root may itself be reached through a symlink
    let root = sync_root
        .canonicalize()
        .unwrap_or_else(|_| sync_root.to_path_buf());

    let relative = relative_to(&absolute, &root)?;

    Ok(TargetRef { absolute, relative })
}

/// `/`-joined components of `path` below `root`.
///
/// Fails when `path` is not under `root` or when a component below the
/// root is not valid UTF-8, since the server addresses files by name.
pub fn relative_to(path: &Path, root: &Path) -> Result<String> {
    let rest = path.strip_prefix(root).map_err(|_| OwError::OutsideSyncRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    })?;
    let mut parts = Vec::new();
    for component in rest.components() {
        if let Component::Normal(s) = component {
            let name = s
                .to_str()
                .ok_or_else(|| OwError::PathNotUtf8(path.to_path_buf()))?;
            parts.push(name);
        }
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn strips_sync_root_and_leading_separator() {
        assert_eq!(
            relative_to(Path::new("/home/u/Nextcloud/photos/cat.jpg"), Path::new("/home/u/Nextcloud")).unwrap(),
            "photos/cat.jpg"
        );
        assert_eq!(
            relative_to(Path::new("/home/u/Nextcloud/a.txt"), Path::new("/home/u/Nextcloud/")).unwrap(),
            "a.txt"
        );
    }

    #[test]
    fn sibling_with_common_prefix_is_outside() {
        let err = relative_to(Path::new("/home/u/Nextcloud2/a.txt"), Path::new("/home/u/Nextcloud")).unwrap_err();
        assert!(matches!(err, OwError::OutsideSyncRoot { .. }));
    }

    #[test]
    fn root_itself_is_empty_relative_path() {
        assert_eq!(
            relative_to(Path::new("/home/u/Nextcloud"), Path::new("/home/u/Nextcloud")).unwrap(),
            ""
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_component_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/home/u/Nextcloud/photos").join(OsStr::from_bytes(b"caf\xe9.jpg"));
        let err = relative_to(&path, Path::new("/home/u/Nextcloud")).unwrap_err();
        assert!(matches!(err, OwError::PathNotUtf8(_)));
        assert!(err.is_local());
    }

    #[test]
    fn missing_path_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let err = resolve_target(&root.path().join("nope.txt"), root.path()).unwrap_err();
        assert!(matches!(err, OwError::PathNotFound(_)));
    }

    #[test]
    fn resolves_existing_file_under_root() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("photos")).unwrap();
        fs::write(root.path().join("photos/cat.jpg"), b"jpg").unwrap();

        let target = resolve_target(&root.path().join("photos/../photos/cat.jpg"), root.path()).unwrap();
        assert_eq!(target.relative, "photos/cat.jpg");
        assert!(target.absolute.is_absolute());
    }

    #[test]
    fn file_outside_root_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let file = elsewhere.path().join("a.txt");
        fs::write(&file, b"a").unwrap();

        let err = resolve_target(&file, root.path()).unwrap_err();
        assert!(matches!(err, OwError::OutsideSyncRoot { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_into_root_resolves_to_real_location() {
        let root = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        fs::write(root.path().join("notes.md"), b"# notes").unwrap();
        let link = elsewhere.path().join("link.md");
        std::os::unix::fs::symlink(root.path().join("notes.md"), &link).unwrap();

        let target = resolve_target(&link, root.path()).unwrap();
        assert_eq!(target.relative, "notes.md");
    }
}
