use directories::BaseDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up in the working directory and the user directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Directory under $HOME holding the user-level config
pub const USER_DIR_NAME: &str = ".goenv-switch";

/// All computed paths used by goenv-switch
#[derive(Debug, Clone)]
pub struct Paths {
    /// ./config.yaml (relative to the working directory)
    pub local_config: PathBuf,
    /// ~/.goenv-switch
    pub user_dir: PathBuf,
    /// ~/.goenv-switch/config.yaml
    pub user_config: PathBuf,
}

impl Paths {
    pub fn new() -> Self {
        let local_config = PathBuf::from(CONFIG_FILE_NAME);

        match BaseDirs::new() {
            Some(base_dirs) => {
                let user_dir = base_dirs.home_dir().join(USER_DIR_NAME);
                let user_config = user_dir.join(CONFIG_FILE_NAME);
                Self {
                    local_config,
                    user_dir,
                    user_config,
                }
            }
            None => {
                warn!("could not determine home directory; using the working directory");
                Self {
                    user_dir: PathBuf::from("."),
                    user_config: local_config.clone(),
                    local_config,
                }
            }
        }
    }

    /// Resolve which config file to load.
    ///
    /// An explicit path wins and is not checked for existence. Otherwise the
    /// working-directory file is preferred over the user-level file. When
    /// neither exists the working-directory candidate is returned so that the
    /// later load error names it.
    pub fn resolve_config(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "using config path from command line");
            return path.to_path_buf();
        }

        for candidate in [&self.local_config, &self.user_config] {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "found config file");
                return candidate.clone();
            }
        }

        debug!(
            path = %self.local_config.display(),
            "no config file found, falling back to working directory"
        );
        self.local_config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_paths;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_user_config_path() {
        let paths = Paths::new();
        assert!(paths.user_config.ends_with(".goenv-switch/config.yaml"));
        assert_eq!(paths.local_config, PathBuf::from("config.yaml"));
    }

    #[test]
    fn test_explicit_path_is_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let explicit = Path::new("/does/not/exist.yaml");
        assert_eq!(paths.resolve_config(Some(explicit)), explicit);
    }

    #[test]
    fn test_local_wins_over_user() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        fs::create_dir_all(&paths.user_dir).unwrap();
        fs::write(&paths.local_config, "environments: {}\n").unwrap();
        fs::write(&paths.user_config, "environments: {}\n").unwrap();

        assert_eq!(paths.resolve_config(None), paths.local_config);
    }

    #[test]
    fn test_user_used_when_no_local() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        fs::create_dir_all(&paths.user_dir).unwrap();
        fs::write(&paths.user_config, "environments: {}\n").unwrap();

        assert_eq!(paths.resolve_config(None), paths.user_config);
    }

    #[test]
    fn test_falls_back_to_local_when_nothing_exists() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        assert_eq!(paths.resolve_config(None), paths.local_config);
    }

    #[test]
    #[serial]
    fn test_relative_candidate_in_working_directory() {
        let temp_dir = TempDir::new().unwrap();
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp_dir.path()).unwrap();
        fs::write(CONFIG_FILE_NAME, "environments: {}\n").unwrap();

        let resolved = Paths::new().resolve_config(None);

        std::env::set_current_dir(original).unwrap();
        assert_eq!(resolved, PathBuf::from(CONFIG_FILE_NAME));
    }
}
