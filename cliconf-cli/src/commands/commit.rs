use crate::commands::builtin::help_template;
use crate::config::Config;
use clap::Command;
use cliconf::error::CliConfResult;
use cliconf::session::DeviceSession;
use log::info;

pub fn cli() -> Command {
    Command::new("commit")
        .about("Commit the candidate configuration")
        .help_template(help_template())
}

pub fn exec(_cfg: &Config, session: &mut DeviceSession) -> CliConfResult<()> {
    session.commit()?;
    info!("Commit sent");
    Ok(())
}
