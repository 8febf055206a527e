//! Core profile operations.
//!
//! [`ProfileManager`] answers list/show queries from the loaded [`Config`] and
//! applies or reads settings through a [`Toolchain`]. It never writes the
//! config file.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, Profile};
use crate::error::{SwitchError, SwitchResult};
use crate::settings::GoSetting;
use crate::toolchain::Toolchain;

/// One row of `goenv-switch list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub key: String,
    pub display_name: String,
    pub is_default: bool,
}

/// A setting name with the value the toolchain currently holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentSetting {
    pub name: GoSetting,
    pub value: String,
}

pub struct ProfileManager<'a> {
    config: &'a Config,
    toolchain: &'a dyn Toolchain,
}

impl<'a> ProfileManager<'a> {
    pub fn new(config: &'a Config, toolchain: &'a dyn Toolchain) -> Self {
        Self { config, toolchain }
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Every profile once, sorted by key
    pub fn list(&self) -> Vec<ProfileSummary> {
        self.config
            .environments
            .iter()
            .map(|(key, profile)| ProfileSummary {
                key: key.clone(),
                display_name: profile.display_name.clone(),
                is_default: self.config.is_default(key),
            })
            .collect()
    }

    pub fn show(&self, key: &str) -> SwitchResult<&'a Profile> {
        self.config
            .profile(key)
            .ok_or_else(|| SwitchError::ProfileNotFound(key.to_string()))
    }

    /// Apply all five settings of `key`
    pub fn switch(&self, key: &str) -> SwitchResult<()> {
        self.switch_with(key, |_, _| {})
    }

    /// Apply all five settings of `key`, reporting each one once it is written.
    ///
    /// Settings are written one at a time in [`GoSetting::ALL`] order. The
    /// first failure stops the sequence and is returned as-is; settings
    /// written before it stay written. There is no rollback, so a failed
    /// switch can leave the toolchain with a mix of old and new values.
    pub fn switch_with<F>(&self, key: &str, mut on_applied: F) -> SwitchResult<()>
    where
        F: FnMut(GoSetting, &str),
    {
        let profile = self.show(key)?;
        info!(profile = key, "switching profile");

        for (setting, value) in profile.settings() {
            self.toolchain.set(setting.env_key(), value)?;
            debug!(setting = %setting, value, "applied setting");
            on_applied(setting, value);
        }

        Ok(())
    }

    /// Read the five settings from the toolchain, stopping at the first failure
    pub fn current(&self) -> SwitchResult<Vec<CurrentSetting>> {
        GoSetting::ALL
            .into_iter()
            .map(|name| {
                self.toolchain
                    .get(name.env_key())
                    .map(|value| CurrentSetting { name, value })
            })
            .collect()
    }

    /// Keys of profiles whose five settings equal `current` exactly
    pub fn matching_profiles(&self, current: &[CurrentSetting]) -> Vec<String> {
        self.config
            .environments
            .iter()
            .filter(|(_, profile)| {
                GoSetting::ALL.iter().all(|setting| {
                    current
                        .iter()
                        .find(|c| c.name == *setting)
                        .is_some_and(|c| c.value == profile.value(*setting))
                })
            })
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Let the user pick a profile, then switch to it.
    ///
    /// `read_selection` receives the numbered choices (in [`Self::list`] order)
    /// and returns one line of input. Returns the key that was applied.
    pub fn interactive_switch<P>(&self, read_selection: P) -> SwitchResult<String>
    where
        P: FnOnce(&[ProfileSummary]) -> SwitchResult<String>,
    {
        self.interactive_switch_with(read_selection, |_, _| {})
    }

    pub fn interactive_switch_with<P, F>(&self, read_selection: P, on_applied: F) -> SwitchResult<String>
    where
        P: FnOnce(&[ProfileSummary]) -> SwitchResult<String>,
        F: FnMut(GoSetting, &str),
    {
        if self.config.environments.is_empty() {
            return Err(SwitchError::NoProfilesConfigured);
        }

        let choices = self.list();
        let input = read_selection(&choices)?;
        let key = self.resolve_selection(&choices, &input)?;

        self.switch_with(&key, on_applied)?;
        Ok(key)
    }

    /// Map one line of input onto a profile key.
    ///
    /// An in-range 1-based number picks from `choices`. Anything else is
    /// looked up as a literal key. Numbers that match neither are an invalid
    /// selection.
    pub fn resolve_selection(&self, choices: &[ProfileSummary], input: &str) -> SwitchResult<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SwitchError::InvalidSelection(String::new()));
        }

        if let Ok(n) = input.parse::<usize>()
            && n >= 1
            && let Some(choice) = choices.get(n - 1)
        {
            return Ok(choice.key.clone());
        }

        if self.config.profile(input).is_some() {
            return Ok(input.to_string());
        }

        if is_integer(input) {
            return Err(SwitchError::InvalidSelection(input.to_string()));
        }
        Err(SwitchError::ProfileNotFound(input.to_string()))
    }
}

/// Optional sign followed by ASCII digits, whatever the magnitude
fn is_integer(input: &str) -> bool {
    let digits = input.strip_prefix(['+', '-']).unwrap_or(input);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
