use crate::commands::*;
use crate::config::Config;
use clap::builder::{IntoResettable, ValueParser};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use cliconf::error::{CliConfError, CliConfResult};
use cliconf::session::DeviceSession;

pub fn builtin() -> Vec<Command> {
    vec![
        load::cli(),
        template::cli(),
        commit::cli(),
        install::cli(),
        reboot::cli(),
    ]
}

pub fn builtin_exec(
    cmd: &str,
    session: &mut DeviceSession,
    cfg: &Config,
) -> Option<CliConfResult<()>> {
    let f = match cmd {
        "load" => load::exec(cfg, session),
        "template" => template::exec(cfg, session),
        "commit" => commit::exec(cfg, session),
        "install" => install::exec(cfg, session),
        "reboot" => reboot::exec(cfg, session),
        _ => return None,
    };
    Some(f)
}

pub(crate) fn value_of<'a, T: Clone + Send + Sync + 'static>(
    name: &str,
    args: &'a ArgMatches,
) -> CliConfResult<&'a T> {
    args.get_one::<T>(name)
        .ok_or_else(|| CliConfError::new(format!("Missing argument '{}'", name)))
}

pub(crate) fn value_of_if_exists<'a, T: Clone + Send + Sync + 'static>(
    name: &str,
    args: &'a ArgMatches,
) -> Option<&'a T> {
    if args.contains_id(name) {
        args.get_one::<T>(name)
    } else {
        None
    }
}

pub(crate) fn flag(name: &str, args: &ArgMatches) -> bool {
    args.get_flag(name)
}

pub(super) fn arg(
    name: &'static str,
    help: &'static str,
    required: bool,
    short: Option<char>,
    default: Option<&'static str>,
    hint: Option<ValueHint>,
    parser: impl IntoResettable<ValueParser>,
) -> Arg {
    Arg::new(name)
        .short(short)
        .long(name)
        .help(help)
        .required(required)
        .default_value(default)
        .value_hint(hint)
        .value_parser(parser)
}

pub(super) fn switch(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .action(ArgAction::SetTrue)
}

pub(super) fn format_arg() -> Arg {
    arg(
        "format",
        "Configuration format",
        false,
        None,
        Some("text"),
        None,
        ["text", "set", "xml"],
    )
}

pub(super) fn action_arg() -> Arg {
    arg(
        "action",
        "How the configuration is combined with the existing one",
        false,
        Some('a'),
        Some("merge"),
        None,
        ["merge", "override", "replace", "update", "set"],
    )
    .env("CLICONF_ACTION")
}

pub(super) fn commit_arg() -> Arg {
    switch("commit", "Commit after loading")
}

pub(super) fn help_template() -> &'static str {
    color_print::cstr!(
        "\
{about-with-newline}
<green,bold>Usage:</> {usage}

<green,bold>Options:</>
{options}\n",
    )
}

/// Commits when `--commit` was given; ZTP configurations must keep
/// `chassis auto-image-upgrade` or the upgrade process marks the run failed.
pub(super) fn commit_if_requested(cfg: &Config, session: &mut DeviceSession) -> CliConfResult<()> {
    if flag("commit", &cfg.args) {
        session.commit()?;
    }
    Ok(())
}
