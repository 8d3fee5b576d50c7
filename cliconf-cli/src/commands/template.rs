use crate::commands::builtin::{
    action_arg, arg, commit_arg, commit_if_requested, format_arg, help_template, value_of,
    value_of_if_exists,
};
use crate::config::Config;
use clap::{Command, ValueHint};
use cliconf::error::{CliConfError, CliConfResult};
use cliconf::message::{ConfigFormat, LoadAction};
use cliconf::session::DeviceSession;
use log::info;
use serde_json::Value;
use std::fs;
use std::str::FromStr;

pub fn cli() -> Command {
    Command::new("template")
        .about("Render a Jinja2 template and load it")
        .help_template(help_template())
        .args([
            arg(
                "template",
                "File containing the configuration template",
                true,
                Some('t'),
                None,
                Some(ValueHint::FilePath),
                None,
            ),
            arg(
                "vars",
                "JSON file with the template variables",
                false,
                None,
                None,
                Some(ValueHint::FilePath),
                None,
            ),
            format_arg(),
            action_arg(),
            commit_arg(),
        ])
}

pub fn exec(cfg: &Config, session: &mut DeviceSession) -> CliConfResult<()> {
    let template = fs::read_to_string(value_of::<String>("template", &cfg.args)?)?;
    let vars = match value_of_if_exists::<String>("vars", &cfg.args) {
        Some(path) => read_vars(path)?,
        None => Value::Object(Default::default()),
    };
    let format = ConfigFormat::from_str(value_of::<String>("format", &cfg.args)?)?;
    let action = LoadAction::from_str(value_of::<String>("action", &cfg.args)?)?;
    session.load_config_template(&template, &vars, format, action)?;
    info!("Template loaded");
    commit_if_requested(cfg, session)
}

pub(crate) fn read_vars(path: &str) -> CliConfResult<Value> {
    let content = fs::read_to_string(path)?;
    let vars: Value = serde_json::from_str(&content).map_err(|err| {
        CliConfError::new(format!("Invalid template variables '{}': {}", path, err))
    })?;
    if !vars.is_object() {
        return Err(CliConfError::new(format!(
            "Template variables '{}' must be a JSON object",
            path
        )));
    }
    Ok(vars)
}
