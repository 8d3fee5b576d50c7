use crate::commands::builtin::help_template;
use crate::config::Config;
use clap::Command;
use cliconf::error::CliConfResult;
use cliconf::session::DeviceSession;
use log::warn;

pub fn cli() -> Command {
    Command::new("reboot")
        .about("Reboot the device")
        .help_template(help_template())
}

pub fn exec(_cfg: &Config, session: &mut DeviceSession) -> CliConfResult<()> {
    session.reboot()?;
    warn!("Reboot requested");
    Ok(())
}
