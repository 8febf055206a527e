//! Handlers for each CLI subcommand.
//!
//! Handlers render through `crate::ui` and turn library errors into `anyhow`
//! errors with a hint for the user. Profile commands receive a
//! [`ProfileManager`] built by [`with_manager`]; `init`, `doctor` and
//! `completions` work without a loaded config.

use anstyle::AnsiColor;
use anyhow::{Context, Result, anyhow, bail};
use clap::CommandFactory;
use clap_complete::Shell;
use comfy_table::Table;
use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::Path;
use tracing::debug;

use crate::cli::Cli;
use crate::config::{Config, DEFAULT_CONFIG, write_config_file};
use crate::doctor::run_doctor;
use crate::error::SwitchError;
use crate::paths::Paths;
use crate::profiles::{ProfileManager, ProfileSummary};
use crate::settings::GoSetting;
use crate::toolchain::Toolchain;
use crate::ui::Ui;

const BIN: &str = "goenv-switch";

/// Resolve and load the config, pointing at `init` when that fails
pub fn load_config(paths: &Paths, explicit: Option<&Path>) -> Result<Config> {
    let path = paths.resolve_config(explicit);
    Config::load(&path).map_err(|e| {
        anyhow!(
            "{}\nHint: Run '{} init' to create a default config file, or pass --config <path>.",
            e,
            BIN
        )
    })
}

/// Load the config and run `f` with a manager over it
pub fn with_manager<F>(
    paths: &Paths,
    explicit: Option<&Path>,
    toolchain: &dyn Toolchain,
    f: F,
) -> Result<()>
where
    F: FnOnce(&ProfileManager) -> Result<()>,
{
    let config = load_config(paths, explicit)?;
    let manager = ProfileManager::new(&config, toolchain);
    f(&manager)
}

/// Attach a hint to library errors the user can act on
fn explain(err: SwitchError) -> anyhow::Error {
    let hint = match &err {
        SwitchError::ProfileNotFound(_) => {
            Some(format!("Use '{} list' to see available profiles.", BIN))
        }
        SwitchError::NoProfilesConfigured => {
            Some("Add profiles under 'environments:' in your config file.".to_string())
        }
        SwitchError::InvalidSelection(_) => {
            Some("Enter a number from the list or a profile key.".to_string())
        }
        SwitchError::ExternalTool { .. } => {
            Some("Check that Go is installed and on PATH, or pass --go-bin <path>.".to_string())
        }
        SwitchError::ConfigWrite { source, .. } if source.kind() == io::ErrorKind::AlreadyExists => {
            Some(format!("Use '{} init --force' to replace it (the old file is backed up).", BIN))
        }
        _ => None,
    };

    match hint {
        Some(hint) => anyhow!("{}\nHint: {}", err, hint),
        None => err.into(),
    }
}

fn profile_table(ui: &Ui, profiles: &[ProfileSummary], numbered: bool) -> Table {
    let mut table = ui.simple_table();
    for (index, profile) in profiles.iter().enumerate() {
        let mut row = Vec::with_capacity(4);
        if numbered {
            row.push(ui.colored_cell(format!("{}.", index + 1), AnsiColor::Yellow));
        } else {
            row.push(ui.cell(if profile.is_default { ui.icon_ok() } else { " " }));
        }
        row.push(ui.colored_cell(&profile.key, AnsiColor::Yellow));
        row.push(ui.cell(&profile.display_name));
        row.push(if profile.is_default {
            ui.colored_cell("(default)", AnsiColor::Green)
        } else {
            ui.cell("")
        });
        table.add_row(row);
    }
    table
}

fn settings_table<'a>(ui: &Ui, settings: impl IntoIterator<Item = (GoSetting, &'a str)>) -> Table {
    let mut table = ui.simple_table();
    for (setting, value) in settings {
        table.add_row(vec![ui.header_cell(setting.env_key()), ui.value_cell(value)]);
    }
    table
}

fn print_json<T: serde::Serialize>(ui: &Ui, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    ui.println(json);
    Ok(())
}

/// List all profiles
pub fn list(manager: &ProfileManager, ui: &Ui, json: bool) -> Result<()> {
    let profiles = manager.list();

    if json {
        return print_json(ui, &profiles);
    }

    if profiles.is_empty() {
        ui.warn("No profiles configured.");
        ui.println("Add entries under 'environments:' in your config file.");
        return Ok(());
    }

    ui.section("Profiles");
    ui.println(profile_table(ui, &profiles, false).to_string());
    Ok(())
}

/// Show one profile's settings
pub fn show(manager: &ProfileManager, key: &str, ui: &Ui, json: bool) -> Result<()> {
    let profile = manager.show(key).map_err(explain)?;
    let is_default = manager.config().is_default(key);

    if json {
        return print_json(
            ui,
            &serde_json::json!({
                "key": key,
                "default": is_default,
                "profile": profile,
            }),
        );
    }

    let title = if is_default {
        format!("Profile: {} (default)", key)
    } else {
        format!("Profile: {}", key)
    };
    ui.section(title);
    ui.newline();

    let mut table = ui.simple_table();
    table.add_row(vec![ui.header_cell("Name"), ui.value_cell(&profile.display_name)]);
    for (setting, value) in profile.settings() {
        table.add_row(vec![
            ui.header_cell(setting.env_key()),
            ui.value_cell(value),
            ui.colored_cell(setting.description(), AnsiColor::BrightBlack),
        ]);
    }
    ui.println(table.to_string());
    Ok(())
}

/// Apply a profile with `go env -w`
pub fn switch(manager: &ProfileManager, key: &str, ui: &Ui) -> Result<()> {
    let spinner = ui.spinner(format!("Switching to '{}'...", key));

    let mut applied = Vec::new();
    let result = manager.switch_with(key, |setting, value| {
        spinner.set_message(format!("Set {}", setting));
        applied.push((setting, value.to_string()));
    });
    spinner.finish_and_clear();

    report_switch(manager, result.map(|()| key.to_string()), &applied, ui)
}

/// Print the outcome of a switch. `applied` lists the settings written,
/// which on failure is everything before the failing one.
fn report_switch(
    manager: &ProfileManager,
    result: Result<String, SwitchError>,
    applied: &[(GoSetting, String)],
    ui: &Ui,
) -> Result<()> {
    let applied_table = || settings_table(ui, applied.iter().map(|(s, v)| (*s, v.as_str())));

    match result {
        Ok(key) => {
            let name = manager
                .config()
                .profile(&key)
                .map(|p| p.display_name.as_str())
                .unwrap_or_default();
            if name.is_empty() {
                ui.ok(format!("Switched to '{}'", key));
            } else {
                ui.ok(format!("Switched to '{}' ({})", key, name));
            }
            ui.println(applied_table().to_string());
            Ok(())
        }
        Err(e) => {
            if !applied.is_empty() {
                ui.warn(format!(
                    "{} of {} settings were written before the failure and were left in place:",
                    applied.len(),
                    GoSetting::ALL.len()
                ));
                ui.println(applied_table().to_string());
            }
            Err(explain(e))
        }
    }
}

/// Prompt for a profile and apply it
pub fn interactive(manager: &ProfileManager, ui: &Ui) -> Result<()> {
    let mut applied = Vec::new();
    let result = manager.interactive_switch_with(
        |choices| prompt_selection(ui, choices),
        |setting, value| applied.push((setting, value.to_string())),
    );
    report_switch(manager, result, &applied, ui)
}

fn prompt_selection(ui: &Ui, choices: &[ProfileSummary]) -> Result<String, SwitchError> {
    ui.section("Select a profile");
    ui.println(profile_table(ui, choices, true).to_string());
    ui.newline();

    let prompt = format!("Profile number (1-{}) or key:", choices.len());
    if io::stdin().is_terminal() {
        inquire::Text::new(&prompt)
            .with_help_message("Enter to confirm, Esc to cancel")
            .prompt()
            .map_err(|e| SwitchError::InputAborted(e.to_string()))
    } else {
        ui.println(prompt);
        read_selection_line(&mut io::stdin().lock())
    }
}

/// Read one line of selection input from a non-interactive stdin
pub fn read_selection_line(reader: &mut impl BufRead) -> Result<String, SwitchError> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => Err(SwitchError::InputAborted("end of input".to_string())),
        Ok(_) => Ok(line),
        Err(e) => Err(SwitchError::InputAborted(e.to_string())),
    }
}

/// Show what the Go toolchain currently holds
pub fn current(manager: &ProfileManager, ui: &Ui, json: bool) -> Result<()> {
    let spinner = ui.spinner("Reading Go settings...");
    let result = manager.current();
    spinner.finish_and_clear();
    let current = result.map_err(explain)?;
    let matching = manager.matching_profiles(&current);

    if json {
        return print_json(
            ui,
            &serde_json::json!({
                "settings": current,
                "matching_profiles": matching,
            }),
        );
    }

    ui.section("Current Go settings");
    ui.newline();
    ui.println(
        settings_table(ui, current.iter().map(|c| (c.name, c.value.as_str()))).to_string(),
    );
    ui.newline();

    if matching.is_empty() {
        ui.info("Current settings do not match any profile.");
    } else {
        ui.info(format!("Matches profile: {}", matching.join(", ")));
    }
    Ok(())
}

/// Write a config to the user-level path.
///
/// The template is `template` when given, else `./config.yaml` when present.
/// Its text is copied verbatim after checking that it parses. With neither,
/// the built-in document is written.
pub fn init(paths: &Paths, template: Option<&Path>, force: bool, ui: &Ui) -> Result<()> {
    let template = template.or_else(|| {
        (paths.local_config.is_file() && paths.local_config != paths.user_config)
            .then_some(paths.local_config.as_path())
    });

    let content = match template {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read template {}", path.display()))?;
            Config::parse(&text, path).map_err(|e| anyhow!("{}", e))?;
            debug!(path = %path.display(), "using config template");
            text
        }
        None => DEFAULT_CONFIG.to_string(),
    };

    let target = &paths.user_config;
    let backup = write_config_file(target, &content, force).map_err(explain)?;

    if let Some(backup) = backup {
        ui.info(format!("Previous config saved to {}", backup.display()));
    }
    ui.ok(format!("Created config file: {}", target.display()));
    ui.newline();
    ui.println("Next:");
    ui.println(format!("  {} list", ui.bold(BIN)));
    ui.println(format!("  {} switch <key>", ui.bold(BIN)));
    Ok(())
}

/// Run diagnostics; fails when any check reports a problem
pub fn doctor(
    paths: &Paths,
    explicit: Option<&Path>,
    toolchain: &dyn Toolchain,
    ui: &Ui,
) -> Result<()> {
    let issues = run_doctor(paths, explicit, toolchain, ui);
    if issues > 0 {
        bail!("Doctor found {} issue(s)", issues);
    }
    ui.ok("No issues found");
    Ok(())
}

/// Print a completion script for `shell` to stdout
pub fn completions(shell: Shell) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, BIN, &mut io::stdout());
}
