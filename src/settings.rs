use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Go environment settings managed by goenv-switch profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoSetting {
    GoPrivate,
    GoProxy,
    GoSumDb,
    GoNoProxy,
    GoNoSumDb,
}

impl GoSetting {
    /// All settings, in the order they are applied and read.
    pub const ALL: [GoSetting; 5] = [
        GoSetting::GoPrivate,
        GoSetting::GoProxy,
        GoSetting::GoSumDb,
        GoSetting::GoNoProxy,
        GoSetting::GoNoSumDb,
    ];

    /// Variable name as understood by `go env`
    pub fn env_key(&self) -> &'static str {
        match self {
            GoSetting::GoPrivate => "GOPRIVATE",
            GoSetting::GoProxy => "GOPROXY",
            GoSetting::GoSumDb => "GOSUMDB",
            GoSetting::GoNoProxy => "GONOPROXY",
            GoSetting::GoNoSumDb => "GONOSUMDB",
        }
    }

    /// One-line summary shown next to the setting in `show`
    pub fn description(&self) -> &'static str {
        match self {
            GoSetting::GoPrivate => "Module path patterns treated as private",
            GoSetting::GoProxy => "Module proxy URL list",
            GoSetting::GoSumDb => "Checksum database (or \"off\")",
            GoSetting::GoNoProxy => "Patterns fetched without the proxy",
            GoSetting::GoNoSumDb => "Patterns skipped by the checksum database",
        }
    }
}

impl fmt::Display for GoSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_key())
    }
}

impl FromStr for GoSetting {
    type Err = String;

    /// Parse a setting by its `go env` name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|setting| setting.env_key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown Go setting '{}'", s))
    }
}

impl Serialize for GoSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.env_key())
    }
}
