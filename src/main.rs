use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt};

use goenv_switch::{
    cli::{Cli, Commands},
    commands,
    paths::Paths,
    toolchain::GoToolchain,
    ui::Ui,
};

/// Overrides the --verbose level when set, e.g. `GOENV_SWITCH_LOG=debug`
const LOG_ENV: &str = "GOENV_SWITCH_LOG";

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("goenv_switch={level}")));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = Paths::new();
    let ui = Ui::new(cli.color, cli.no_color);
    let toolchain = GoToolchain::new(&cli.go_bin);
    let config = cli.config.as_deref();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::List { json } => {
            commands::with_manager(&paths, config, &toolchain, |m| commands::list(m, &ui, json))
        }
        Commands::Show { key, json } => {
            commands::with_manager(&paths, config, &toolchain, |m| {
                commands::show(m, &key, &ui, json)
            })
        }
        Commands::Switch { key } => {
            commands::with_manager(&paths, config, &toolchain, |m| commands::switch(m, &key, &ui))
        }
        Commands::Interactive => {
            commands::with_manager(&paths, config, &toolchain, |m| commands::interactive(m, &ui))
        }
        Commands::Current { json } => {
            commands::with_manager(&paths, config, &toolchain, |m| commands::current(m, &ui, json))
        }
        Commands::Init { force } => commands::init(&paths, config, force, &ui),
        Commands::Doctor => commands::doctor(&paths, config, &toolchain, &ui),
        Commands::Completions { shell } => {
            commands::completions(shell);
            Ok(())
        }
    }
}
