//! Path handling shared by the layer loader.

use crate::ConfigError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Resolve the working directory the cwd layers hang off.
///
/// A directory that does not exist yet is kept as given so its layers are
/// simply skipped later.
pub(super) fn normalize_path(path: &Path) -> Result<PathBuf, ConfigError> {
    path.canonicalize().or_else(|err| match err.kind() {
        ErrorKind::NotFound => Ok(path.to_path_buf()),
        _ => Err(ConfigError::ReadFailed(err)),
    })
}

/// Key used to load a `batgpt.json5` reached through two layers only once.
pub(super) fn unique_path(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(resolved) => resolved,
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_directory_is_kept_as_given() {
        let temp = TempDir::new().expect("tmp");
        let missing = temp.path().join("no-such-scene");
        assert_eq!(normalize_path(&missing).expect("normalize"), missing);
    }

    #[test]
    fn dotted_paths_share_a_key() {
        let temp = TempDir::new().expect("tmp");
        let dir = temp.path().join(".batgpt");
        std::fs::create_dir_all(&dir).expect("dir");
        let direct = dir.join("batgpt.json5");
        std::fs::write(&direct, "{}").expect("write");
        let dotted = dir.join("..").join(".batgpt").join("batgpt.json5");
        assert_eq!(unique_path(&direct), unique_path(&dotted));
    }
}
