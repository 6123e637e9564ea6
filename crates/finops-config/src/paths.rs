use std::path::PathBuf;

/// XDG app name for the per-user configuration directory.
pub const APP_NAME: &str = "finops";

/// Filename of the persisted store document.
pub const STORE_FILE: &str = "config.json";

/// Per-user configuration directory (e.g. `~/.config/finops` on Linux).
///
/// Returns `None` when the home directory cannot be determined
/// (e.g., no HOME in containers).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Full path of the persisted store document.
pub fn store_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(STORE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_file_under_config_dir() {
        if let Some(path) = store_file() {
            assert!(path.ends_with(STORE_FILE));
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
    }
}
