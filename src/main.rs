//! `nmass` command line tool

// standard library
use std::error::Error as StdError;
use std::io::Write;
use std::process::ExitCode;

// external crates
use log::LevelFilter;

// nmass modules
use nmass::db::{Config, Result};

mod cli;
mod commands;

fn main() -> ExitCode {
    let cli = cli::parse();

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&cli.global, &config);

    let mut out = std::io::stdout().lock();
    let result = commands::dispatch(cli.command, config, &mut out).and_then(|()| {
        out.flush()?;
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = StdError::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

/// Configuration file if given, environment otherwise, then flag overrides
fn load_config(global: &cli::GlobalOptions) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::from_env(),
    };
    if let Some(dir) = &global.data_dir {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

/// Logger on stderr, each -v raises the configured level by one step
fn init_logging(global: &cli::GlobalOptions, config: &Config) {
    let level = match global.quiet {
        true => LevelFilter::Error,
        false => raised(config.log_level_filter(), global.verbose),
    };

    if let Err(e) = stderrlog::new()
        .verbosity(level)
        .show_module_names(level >= LevelFilter::Debug)
        .init()
    {
        eprintln!("warning: logging unavailable: {e}");
    }
}

fn raised(level: LevelFilter, steps: u8) -> LevelFilter {
    (0..steps).fold(level, |level, _| match level {
        LevelFilter::Off => LevelFilter::Error,
        LevelFilter::Error => LevelFilter::Warn,
        LevelFilter::Warn => LevelFilter::Info,
        LevelFilter::Info => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    })
}
