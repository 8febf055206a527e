//! The YAML configuration document.
//!
//! Loading is deliberately lenient: unknown top-level keys are ignored, and a
//! missing or `null` field becomes an empty string. Only documents whose
//! shape cannot be mapped onto [`Config`] are rejected.

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{SwitchError, SwitchResult};
use crate::settings::GoSetting;

/// Document written by `goenv-switch init` when no template is given
pub const DEFAULT_CONFIG: &str = r#"# goenv-switch configuration

environments:
  # Corporate network, private modules served by an internal proxy
  company:
    name: "Company network"
    goprivate: "git.company.com"
    goproxy: "https://goproxy.company.com,direct"
    gosumdb: "off"
    gonoproxy: "git.company.com"
    gonosumdb: "git.company.com"

  # Public proxies only
  public:
    name: "Public"
    goprivate: ""
    goproxy: "https://goproxy.cn,https://goproxy.io,direct"
    gosumdb: "sum.golang.org"
    gonoproxy: ""
    gonosumdb: ""

# Marked as (default) in listings
default_env: public
"#;

/// One named set of Go settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "name", default, deserialize_with = "null_as_default")]
    pub display_name: String,

    #[serde(rename = "goprivate", default, deserialize_with = "null_as_default")]
    pub private_pattern: String,

    #[serde(rename = "goproxy", default, deserialize_with = "null_as_default")]
    pub proxy_url_list: String,

    #[serde(rename = "gosumdb", default, deserialize_with = "null_as_default")]
    pub checksum_db_mode: String,

    #[serde(rename = "gonoproxy", default, deserialize_with = "null_as_default")]
    pub no_proxy_pattern: String,

    #[serde(rename = "gonosumdb", default, deserialize_with = "null_as_default")]
    pub no_checksum_db_pattern: String,
}

impl Profile {
    pub fn value(&self, setting: GoSetting) -> &str {
        match setting {
            GoSetting::GoPrivate => &self.private_pattern,
            GoSetting::GoProxy => &self.proxy_url_list,
            GoSetting::GoSumDb => &self.checksum_db_mode,
            GoSetting::GoNoProxy => &self.no_proxy_pattern,
            GoSetting::GoNoSumDb => &self.no_checksum_db_pattern,
        }
    }

    /// The five settings paired with this profile's values, in apply order.
    pub fn settings(&self) -> [(GoSetting, &str); 5] {
        GoSetting::ALL.map(|setting| (setting, self.value(setting)))
    }
}

/// The whole config.yaml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "null_as_default")]
    pub environments: BTreeMap<String, Profile>,

    /// Informational only; may name a profile that does not exist.
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_env: String,
}

impl Config {
    /// Read and parse a config file
    pub fn load(path: &Path) -> SwitchResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| SwitchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&content, path)?;
        info!(
            path = %path.display(),
            profiles = config.environments.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Parse config text; `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> SwitchResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|source| SwitchError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn profile(&self, key: &str) -> Option<&Profile> {
        self.environments.get(key)
    }

    pub fn is_default(&self, key: &str) -> bool {
        self.default_env == key
    }
}

/// Write a brand-new config document to `path`.
///
/// Parent directories are created as needed. An existing file is only
/// replaced when `force` is set, and is first copied to a timestamped
/// backup whose path is returned.
pub fn write_config_file(path: &Path, content: &str, force: bool) -> SwitchResult<Option<PathBuf>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SwitchError::config_write(path, e))?;
    }

    let backup = if path.exists() {
        if !force {
            return Err(SwitchError::config_write(
                path,
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "file already exists (use --force to overwrite)",
                ),
            ));
        }
        let backup = backup_path(path);
        fs::copy(path, &backup).map_err(|e| SwitchError::config_write(path, e))?;
        debug!(backup = %backup.display(), "backed up existing config");
        Some(backup)
    } else {
        None
    };

    // Write to a sibling temp file, then rename over the target
    let temp_path = path.with_extension("yaml.tmp");
    fs::write(&temp_path, content).map_err(|e| SwitchError::config_write(path, e))?;
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SwitchError::config_write(path, e)
    })?;

    info!(path = %path.display(), "wrote config file");
    Ok(backup)
}

fn backup_path(path: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::paths::CONFIG_FILE_NAME.to_string());
    path.with_file_name(format!("{}.{}.bak", file_name, stamp))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
