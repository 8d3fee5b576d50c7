use crate::commands::builtin::{value_of, value_of_if_exists};
use clap::ArgMatches;
use cliconf::config::SessionConfig;
use cliconf::error::CliConfResult;
use log::debug;

#[derive(Debug)]
pub struct Config {
    pub args: ArgMatches,
    pub session: SessionConfig,
    pub dry_run: bool,
}

impl Config {
    pub fn new(args: ArgMatches) -> CliConfResult<Self> {
        let mut session = SessionConfig::new()
            .logfile(value_of::<String>("logfile", &args)?)
            .debug(*value_of::<bool>("debug", &args)?);
        if let Some(program) = value_of_if_exists::<String>("program", &args) {
            session.program = program.clone();
        }
        let dry_run = *value_of::<bool>("dry-run", &args)?;
        debug!(
            "Session config: logfile '{}', program '{}' {:?}",
            session.logfile.display(),
            session.program,
            session.args
        );
        Ok(Self {
            args,
            session,
            dry_run,
        })
    }
}
