use crate::commands::builtin::{builtin, builtin_exec};
use crate::config::Config;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, Command,
    ValueHint,
};
use cliconf::config::{DEFAULT_CLI_PROGRAM, DEFAULT_LOGFILE};
use cliconf::error::{CliConfError, CliConfResult};
use cliconf::eventlog::EventLog;
use cliconf::session::DeviceSession;
use cliconf::template::JinjaEngine;
use cliconf::transport::stream::StreamTransport;
use log::{debug, error, info};
use std::io::{self, Write};
use std::time::Instant;

pub fn exec(cmd: &str, cfg: Config) -> CliConfResult<()> {
    exec_with(cmd, cfg, io::stdout())
}

/// Runs `cmd`; with `--dry-run` the framed rpcs go to `dry_run_out`.
fn exec_with<W>(cmd: &str, cfg: Config, dry_run_out: W) -> CliConfResult<()>
where
    W: Write + Send + 'static,
{
    let start_time = Instant::now();
    let session = if cfg.dry_run {
        debug!("Dry run, writing rpcs to stdout");
        DeviceSession::new(
            StreamTransport::new(dry_run_out),
            EventLog::new(io::stderr(), cfg.session.debug),
        )
    } else {
        DeviceSession::launch(cfg.session.clone())?
    };
    let mut session = session.with_template_engine(JinjaEngine::new());
    info!("Started device cli session");

    let result = builtin_exec(cmd, &mut session, &cfg).unwrap_or_else(|| {
        Err(CliConfError::Anyhow(anyhow::Error::msg(format!(
            "Unknown command: {}",
            cmd
        ))))
    });
    match &result {
        Ok(_) => info!(
            "Operation took: {:.3}s",
            start_time.elapsed().as_secs_f32()
        ),
        Err(err) => error!("Command '{}' failed with error: {}", cmd, err),
    }

    let closed = session.close();
    result.and(closed)
}

pub fn cli() -> Command {
    Command::new(crate_name!())
        .author(crate_authors!("\n"))
        .about(crate_description!())
        .version(crate_version!())
        .long_version(crate_version!())
        .arg_required_else_help(true)
        .allow_external_subcommands(false)
        .bin_name("cliconf")
        .display_name("cliconf")
        .help_template(color_print::cstr!(
            "\
{about-with-newline}
<green,bold>Author:</> {author}

<green,bold>Usage:</> {usage}

<green,bold>Options:</>
{options}

<green,bold>Commands:</>
    <cyan,bold>load</>              Load configuration from a url or string
    <cyan,bold>template</>          Render a Jinja2 template and load it
    <cyan,bold>commit</>            Commit the candidate configuration
    <cyan,bold>install</>           Install a software package
    <cyan,bold>reboot</>            Reboot the device

See '<cyan,bold>cliconf help</> <cyan><<command>></>' for more information on a specific command.\n",
        ))
        .args([
            arg!(-v --verbose ... "Use verbose output (-vv to log session events, -vvv to print also rpc requests)")
                .global(true),
            arg!(-q --quiet "Disable logging completely")
                .global(true),
            global_opt("logfile", "Session log file")
                .env("CLICONF_LOGFILE")
                .default_value(DEFAULT_LOGFILE)
                .value_hint(ValueHint::FilePath),
            global_opt("program", "Device cli started in xml-mode netconf")
                .env("CLICONF_PROGRAM")
                .default_value(DEFAULT_CLI_PROGRAM)
                .value_hint(ValueHint::CommandName),
            global_opt("debug", "Echo session log entries to stdout")
                .env("CLICONF_DEBUG")
                .action(ArgAction::SetTrue),
            global_opt("dry-run", "Write rpcs to stdout instead of the device cli")
                .action(ArgAction::SetTrue),
        ])
        .subcommands(builtin())
}

fn global_opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).help(help).long(name).global(true)
}

#[test]
fn verify_cli() {
    cli().debug_assert();
}
