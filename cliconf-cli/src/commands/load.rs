use crate::commands::builtin::{
    action_arg, arg, commit_arg, commit_if_requested, format_arg, help_template, value_of,
    value_of_if_exists,
};
use crate::config::Config;
use clap::{Command, ValueHint};
use cliconf::error::CliConfResult;
use cliconf::message::{ConfigFormat, ConfigSource, LoadAction};
use cliconf::session::DeviceSession;
use log::info;
use std::str::FromStr;

pub fn cli() -> Command {
    Command::new("load")
        .about("Load configuration from a url or string")
        .help_template(help_template())
        .args([
            arg(
                "url",
                "Local path, ftp:// or http:// url readable by the device",
                false,
                Some('u'),
                None,
                Some(ValueHint::Url),
                None,
            ),
            arg(
                "text",
                "Configuration string",
                false,
                Some('t'),
                None,
                None,
                None,
            ),
            format_arg(),
            action_arg(),
            commit_arg(),
        ])
}

pub fn exec(cfg: &Config, session: &mut DeviceSession) -> CliConfResult<()> {
    let source = ConfigSource::from_parts(
        value_of_if_exists::<String>("text", &cfg.args).cloned(),
        value_of_if_exists::<String>("url", &cfg.args).cloned(),
    )?;
    let format = ConfigFormat::from_str(value_of::<String>("format", &cfg.args)?)?;
    let action = LoadAction::from_str(value_of::<String>("action", &cfg.args)?)?;
    session.load_config(source, format, action)?;
    info!("Configuration loaded");
    commit_if_requested(cfg, session)
}
