use crate::commands::builtin::value_of;
use cliconf::error::CliConfResult;
use config::Config;
use env_logger::{Builder, Target};
use log::LevelFilter;

mod cli;
mod commands;
mod config;

fn init_logging(verbosity: &u8) {
    let mut builder = Builder::new();
    match verbosity {
        1 => {
            builder.filter_level(LevelFilter::Debug);
            builder.filter_module("cliconf", LevelFilter::Warn)
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
            builder.filter_module("cliconf::framer", LevelFilter::Warn);
            builder.filter_module("cliconf::session", LevelFilter::Debug)
        }
        3 => {
            builder.filter_level(LevelFilter::Debug);
            builder.filter_module("cliconf", LevelFilter::Debug)
        }
        _ => {
            builder.filter_level(LevelFilter::Info);
            builder.filter_module("cliconf", LevelFilter::Warn)
        }
    };
    builder.target(Target::Stderr);
    builder.init();
}

fn main() -> CliConfResult<()> {
    let mut args = cli::cli().get_matches();
    let verbosity = value_of::<u8>("verbose", &args)?;
    let disable_logging = value_of::<bool>("quiet", &args)?;
    if !disable_logging {
        init_logging(verbosity);
    }

    match args.remove_subcommand() {
        Some((cmd, args)) => {
            let config = Config::new(args)?;
            cli::exec(&cmd, config)?;
        }
        _ => {
            cli::cli().print_help()?;
        }
    }
    Ok(())
}
