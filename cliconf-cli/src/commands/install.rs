use crate::commands::builtin::{arg, flag, help_template, switch, value_of};
use crate::config::Config;
use clap::{Command, ValueHint};
use cliconf::error::CliConfResult;
use cliconf::message::PackageOptions;
use cliconf::session::DeviceSession;
use log::info;

pub fn cli() -> Command {
    Command::new("install")
        .about("Install a software package")
        .help_template(help_template())
        .args([
            arg(
                "url",
                "Package location: local path, ftp:// or http:// url",
                true,
                Some('u'),
                None,
                Some(ValueHint::Url),
                None,
            ),
            switch("copy", "Keep a copy of the package (sends no <no-copy/>)"),
            switch("validate", "Validate the configuration against the package"),
            switch("keep", "Keep the package file after installing"),
            switch("reboot", "Reboot once the package is installed"),
        ])
}

pub fn exec(cfg: &Config, session: &mut DeviceSession) -> CliConfResult<()> {
    let url = value_of::<String>("url", &cfg.args)?;
    let options = PackageOptions {
        no_copy: !flag("copy", &cfg.args),
        no_validate: !flag("validate", &cfg.args),
        unlink: !flag("keep", &cfg.args),
        reboot: flag("reboot", &cfg.args),
    };
    session.install_package(url, options)?;
    info!("Package install requested for {}", url);
    Ok(())
}
