//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Returns the path to the config file if found.
///
/// # Example
/// ```text
/// /home/user/site/public/blog/  ← start
/// /home/user/site/stylebake.toml ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_parent() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("public/blog");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("stylebake.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("stylebake.toml")).unwrap();
        assert_eq!(found, temp.path().join("stylebake.toml"));
    }

    #[test]
    fn test_find_config_missing() {
        let temp = TempDir::new().unwrap();
        assert!(find_config_file(temp.path(), Path::new("stylebake-missing.toml")).is_none());
    }

    #[test]
    fn test_find_config_absolute() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(Path::new("/"), &path), Some(path));
    }
}
