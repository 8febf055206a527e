use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::toolchain::DEFAULT_GO_BIN;
use crate::ui::ColorMode;

#[derive(Debug, Parser)]
#[command(name = "goenv-switch")]
#[command(about = "Go Environment Switcher - switch GOPROXY/GOPRIVATE/GOSUMDB between named profiles")]
#[command(version, disable_version_flag = true)]
pub struct Cli {
    /// Config file to use instead of ./config.yaml or ~/.goenv-switch/config.yaml
    #[arg(short, long, global = true, value_name = "PATH", env = "GOENV_SWITCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Go binary used to read and write settings
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "GOENV_SWITCH_GO",
        default_value = DEFAULT_GO_BIN
    )]
    pub go_bin: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// When to use colors
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Log more detail to stderr (repeat for more)
    #[arg(long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List all profiles
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the settings stored in a profile
    Show {
        /// Profile key
        key: String,

        #[arg(long)]
        json: bool,
    },

    /// Apply a profile's settings with `go env -w`
    Switch {
        /// Profile key
        key: String,
    },

    /// Pick a profile by number or key, then switch to it
    #[command(alias = "i")]
    Interactive,

    /// Show the settings the Go toolchain currently holds
    Current {
        #[arg(long)]
        json: bool,
    },

    /// Write a default config to ~/.goenv-switch/config.yaml
    ///
    /// With --config, that file is used as the template instead of the
    /// built-in one.
    Init {
        /// Replace an existing file (a backup is kept)
        #[arg(long)]
        force: bool,
    },

    /// Check the config file and the Go toolchain
    Doctor,

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("goenv-switch").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_switch_with_config() {
        let cli = parse(&["-c", "/tmp/envs.yaml", "switch", "company"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/envs.yaml")));
        match cli.command {
            Some(Commands::Switch { key }) => assert_eq!(key, "company"),
            other => panic!("expected switch, got {other:?}"),
        }
    }

    #[test]
    fn test_config_flag_after_command() {
        let cli = parse(&["show", "public", "--config", "envs.yaml", "--json"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("envs.yaml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Show { ref key, json: true }) if key == "public"
        ));
    }

    #[test]
    fn test_interactive_alias() {
        let cli = parse(&["i"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Interactive)));
    }

    #[test]
    fn test_no_command_is_allowed() {
        let cli = parse(&[]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_missing_key_is_usage_error() {
        let err = parse(&["switch"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = parse(&["show"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_unknown_command_is_usage_error() {
        let err = parse(&["frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_short_version_flag() {
        let err = parse(&["-v"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_init_force() {
        let cli = parse(&["init", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init { force: true })));
    }
}
