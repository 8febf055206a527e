//! Test utilities shared across test modules

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

use crate::config::Config;
use crate::error::{SwitchError, SwitchResult};
use crate::paths::{CONFIG_FILE_NAME, Paths, USER_DIR_NAME};
use crate::toolchain::Toolchain;

/// Two profiles, `a` marked as default
pub const SAMPLE_CONFIG: &str = r#"
environments:
  a:
    name: "Profile A"
    goprivate: "git.a.com"
    goproxy: "https://proxy.a.com,direct"
    gosumdb: "off"
    gonoproxy: "git.a.com"
    gonosumdb: "git.a.com"
  b:
    name: "Profile B"
    goprivate: ""
    goproxy: "https://proxy.golang.org,direct"
    gosumdb: "sum.golang.org"
    gonoproxy: ""
    gonosumdb: ""
default_env: a
"#;

/// Create a Paths struct rooted in a temporary directory
///
/// `local_config` stands in for ./config.yaml and `user_dir` for ~/.goenv-switch.
pub fn setup_test_paths(temp_dir: &TempDir) -> Paths {
    let user_dir = temp_dir.path().join("home").join(USER_DIR_NAME);
    Paths {
        local_config: temp_dir.path().join(CONFIG_FILE_NAME),
        user_config: user_dir.join(CONFIG_FILE_NAME),
        user_dir,
    }
}

pub fn sample_config() -> Config {
    Config::parse(SAMPLE_CONFIG, Path::new("sample.yaml")).unwrap()
}

/// One recorded toolchain invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Set(String, String),
    Get(String),
}

/// Toolchain fake that records calls and serves values from memory
#[derive(Debug, Default)]
pub struct RecordingToolchain {
    pub calls: RefCell<Vec<Call>>,
    pub values: RefCell<HashMap<String, String>>,
    /// Calls touching this key fail with `ExternalTool`
    pub fail_on: Option<String>,
}

impl RecordingToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(key: &str) -> Self {
        Self {
            fail_on: Some(key.to_string()),
            ..Self::default()
        }
    }

    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn set_calls(&self) -> Vec<(String, String)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Set(k, v) => Some((k.clone(), v.clone())),
                Call::Get(_) => None,
            })
            .collect()
    }

    fn check(&self, key: &str, command: String) -> SwitchResult<()> {
        if self.fail_on.as_deref() == Some(key) {
            return Err(SwitchError::ExternalTool {
                command,
                output: format!("go: cannot touch {}", key),
            });
        }
        Ok(())
    }
}

impl Toolchain for RecordingToolchain {
    fn set(&self, key: &str, value: &str) -> SwitchResult<()> {
        self.calls
            .borrow_mut()
            .push(Call::Set(key.to_string(), value.to_string()));
        self.check(key, format!("go env -w {}={}", key, value))?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> SwitchResult<String> {
        self.calls.borrow_mut().push(Call::Get(key.to_string()));
        self.check(key, format!("go env {}", key))?;
        let value = self.values.borrow().get(key).cloned().unwrap_or_default();
        Ok(value.trim_end().to_string())
    }
}
