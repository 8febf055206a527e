//! Diagnostics for `goenv-switch doctor`.
//!
//! Checks that a config file can be found and parsed, that its default
//! profile exists, and that the Go toolchain answers `go env`. Each check
//! prints its own findings and the run returns the number of failed checks.

use anstyle::AnsiColor;
use std::path::Path;

use crate::config::Config;
use crate::paths::Paths;
use crate::profiles::ProfileManager;
use crate::toolchain::Toolchain;
use crate::ui::Ui;

/// Run every check and return how many reported a problem
pub fn run_doctor(
    paths: &Paths,
    explicit: Option<&Path>,
    toolchain: &dyn Toolchain,
    ui: &Ui,
) -> usize {
    ui.section("goenv-switch Doctor");
    ui.newline();

    let mut failed = 0;
    let mut loaded: Option<Config> = None;

    // 1. Config file
    let config_ok = check_step(ui, "Config File", || {
        let path = paths.resolve_config(explicit);
        if path.is_file() {
            ui.println(format!("  {} Using {}", ui.icon_ok(), path.display()));
        } else {
            ui.println(format!("  {} Not found: {}", ui.icon_err(), path.display()));
            ui.println(format!("  {} Run 'goenv-switch init' to create one", ui.icon_info()));
            return false;
        }

        match Config::load(&path) {
            Ok(config) => {
                ui.println(format!(
                    "  {} Parsed {} profile(s)",
                    ui.icon_ok(),
                    config.environments.len()
                ));
                loaded = Some(config);
                true
            }
            Err(e) => {
                ui.println(format!("  {} {}", ui.icon_err(), e));
                false
            }
        }
    });
    if !config_ok {
        failed += 1;
    }

    // 2. Profiles
    if let Some(config) = &loaded {
        let ok = check_step(ui, "Profiles", || check_profiles(config, ui));
        if !ok {
            failed += 1;
        }
    }

    // 3. Toolchain
    let toolchain_ok = check_step(ui, "Go Toolchain", || {
        let spinner = ui.spinner("Running go env...");
        match toolchain.get("GOVERSION") {
            Ok(version) => {
                ui.spinner_finish_ok(&spinner, format!("Go responds: {}", version));
                if let Ok(env_file) = toolchain.get("GOENV") {
                    ui.println(format!("  {} Settings file: {}", ui.icon_info(), env_file));
                }
                true
            }
            Err(e) => {
                ui.spinner_finish_err(&spinner, format!("Go did not respond: {}", e));
                false
            }
        }
    });
    if !toolchain_ok {
        failed += 1;
    }

    // 4. Which profile is active, if any
    if let (Some(config), true) = (&loaded, toolchain_ok) {
        check_step(ui, "Active Profile", || {
            let manager = ProfileManager::new(config, toolchain);
            match manager.current() {
                Ok(current) => {
                    let matching = manager.matching_profiles(&current);
                    if matching.is_empty() {
                        ui.println(format!(
                            "  {} Current Go settings match no profile",
                            ui.icon_info()
                        ));
                    } else {
                        ui.println(format!(
                            "  {} Current Go settings match: {}",
                            ui.icon_ok(),
                            matching.join(", ")
                        ));
                    }
                }
                Err(e) => ui.println(format!("  {} {}", ui.icon_warn(), e)),
            }
            // Informational only
            true
        });
    }

    failed
}

fn check_profiles(config: &Config, ui: &Ui) -> bool {
    if config.environments.is_empty() {
        ui.println(format!("  {} No profiles defined under 'environments:'", ui.icon_err()));
        return false;
    }

    for (key, profile) in &config.environments {
        if profile.proxy_url_list.is_empty() {
            ui.println(format!(
                "  {} {} has no goproxy (Go will fall back to its default)",
                ui.icon_warn(),
                key
            ));
        } else {
            ui.println(format!("  {} {}", ui.icon_ok(), key));
        }
    }

    if config.default_env.is_empty() {
        ui.println(format!("  {} No default_env set", ui.icon_info()));
    } else if config.profile(&config.default_env).is_none() {
        // Only used for display, so not fatal
        ui.println(format!(
            "  {} default_env '{}' does not name a profile",
            ui.icon_warn(),
            config.default_env
        ));
    }

    true
}

fn check_step<F>(ui: &Ui, name: &str, check_fn: F) -> bool
where
    F: FnOnce() -> bool,
{
    ui.println(ui.bold(format!("Checking {}...", name)));
    let success = check_fn();
    if !success {
        ui.println(ui.colored("  Issues detected!", AnsiColor::Red));
    }
    ui.newline();
    success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingToolchain, SAMPLE_CONFIG, setup_test_paths};
    use crate::ui::ColorMode;
    use std::fs;
    use tempfile::TempDir;

    fn test_ui() -> Ui {
        Ui::new(ColorMode::Never, false)
    }

    #[test]
    fn test_healthy_setup() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        fs::write(&paths.local_config, SAMPLE_CONFIG).unwrap();
        let toolchain = RecordingToolchain::new().with_value("GOVERSION", "go1.22.4");

        assert_eq!(run_doctor(&paths, None, &toolchain, &test_ui()), 0);
    }

    #[test]
    fn test_missing_config_and_broken_go() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let toolchain = RecordingToolchain::failing_on("GOVERSION");

        assert_eq!(run_doctor(&paths, None, &toolchain, &test_ui()), 2);
    }

    #[test]
    fn test_empty_profiles_is_an_issue() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let explicit = temp_dir.path().join("empty.yaml");
        fs::write(&explicit, "environments: {}\ndefault_env: ghost\n").unwrap();
        let toolchain = RecordingToolchain::new();

        assert_eq!(run_doctor(&paths, Some(&explicit), &toolchain, &test_ui()), 1);
    }
}
