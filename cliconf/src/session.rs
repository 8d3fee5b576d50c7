use crate::config::SessionConfig;
use crate::error::{CliConfError, CliConfResult};
use crate::eventlog::EventLog;
use crate::message::{ConfigFormat, ConfigSource, LoadAction, PackageOptions, Rpc, RpcOperation};
use crate::template::TemplateEngine;
use crate::transport::cli::CliTransport;
use crate::transport::Transport;
use log::{debug, error, warn};
use serde_json::Value;
use std::fs::OpenOptions;

/// A device cli session in `xml-mode netconf`.
///
/// Every operation writes one RPC and returns once it is on the pipe. Nothing
/// is read back: the cli's replies land in the log file. Ordering (load before
/// commit, close last) is up to the caller.
///
/// ```no_run
/// use cliconf::config::SessionConfig;
/// use cliconf::message::{ConfigFormat, ConfigSource, LoadAction};
/// use cliconf::session::DeviceSession;
///
/// # fn main() -> cliconf::error::CliConfResult<()> {
/// let mut dev = DeviceSession::launch(SessionConfig::default())?;
/// dev.load_config(
///     ConfigSource::Url("/var/tmp/set.cfg".to_string()),
///     ConfigFormat::Text,
///     LoadAction::Set,
/// )?;
/// dev.commit()?;
/// dev.close()
/// # }
/// ```
///
/// When committing during ZTP make sure the configuration keeps
/// `chassis auto-image-upgrade`, otherwise the auto image upgrade process
/// exits and marks the script as failed.
pub struct DeviceSession {
    transport: Box<dyn Transport + Send + 'static>,
    log: EventLog,
    templates: Option<Box<dyn TemplateEngine>>,
    is_closed: bool,
}

impl DeviceSession {
    /// Opens the log file for append and spawns the device cli with its
    /// output redirected into it.
    pub fn launch(config: SessionConfig) -> CliConfResult<DeviceSession> {
        let logfile = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logfile)?;
        let mut log = EventLog::new(logfile.try_clone()?, config.debug);

        match CliTransport::spawn(&config.program, &config.args, &logfile) {
            Ok(transport) => {
                debug!("Device cli session started, pid {}", transport.id());
                Ok(DeviceSession::new(transport, log))
            }
            Err(err) => {
                note(&mut log, &format!("RPC Session Error: {}", err));
                Err(err)
            }
        }
    }

    /// Builds a session over an already established transport.
    pub fn new<T>(transport: T, log: EventLog) -> DeviceSession
    where
        T: Transport + 'static,
    {
        DeviceSession {
            transport: Box::from(transport),
            log,
            templates: None,
            is_closed: false,
        }
    }

    pub fn with_template_engine<E>(mut self, engine: E) -> Self
    where
        E: TemplateEngine + 'static,
    {
        self.templates = Some(Box::new(engine));
        self
    }

    pub fn supports_templates(&self) -> bool {
        self.templates.is_some()
    }

    /// Timestamps `msg` and appends it to the session log.
    pub fn log(&mut self, msg: &str) -> CliConfResult<()> {
        self.log.record(msg)
    }

    /// Writes a raw, already serialized RPC to the device cli.
    pub fn send_rpc(&mut self, rpc: &str) -> CliConfResult<()> {
        self.note(&format!("RPC Data Sent to host:\n {}", rpc));
        self.transport.write(rpc).map_err(|err| {
            self.note(&format!("RPC Communication Error: {}", err));
            err
        })
    }

    /// `<load-configuration>` from inline text or a url.
    pub fn load_config(
        &mut self,
        source: ConfigSource,
        format: ConfigFormat,
        action: LoadAction,
    ) -> CliConfResult<()> {
        let operation = RpcOperation::new_load_configuration(source, format, action)
            .map_err(|err| self.failed("RPC Load Error", err))?;
        self.run_rpc(Rpc::new_with_operation(operation), "RPC Load Error")
    }

    /// Renders `template` with the session's template engine and loads the
    /// result as inline configuration.
    pub fn load_config_template(
        &mut self,
        template: &str,
        vars: &Value,
        format: ConfigFormat,
        action: LoadAction,
    ) -> CliConfResult<()> {
        let rendered = match &self.templates {
            Some(engine) => engine.render(template, vars),
            None => Err(CliConfError::TemplatingUnavailable),
        };
        let rendered = rendered.map_err(|err| self.failed("Load_Template Render Error", err))?;
        self.load_config(ConfigSource::Text(rendered), format, action)
    }

    pub fn commit(&mut self) -> CliConfResult<()> {
        self.run_rpc(
            Rpc::new_with_operation(RpcOperation::Commit),
            "RPC Commit Error",
        )
    }

    /// Adds a software package, typically a Junos image during ZTP.
    pub fn install_package(&mut self, url: &str, options: PackageOptions) -> CliConfResult<()> {
        let rpc = Rpc::new_with_operation(RpcOperation::new_request_package_add(url, options));
        self.run_rpc(rpc, "Install Package Error")
    }

    pub fn reboot(&mut self) -> CliConfResult<()> {
        self.run_rpc(
            Rpc::new_with_operation(RpcOperation::RequestReboot),
            "RPC Reboot Error",
        )
    }

    /// Sends `<close-session/>`, then shuts the cli down and releases the log.
    /// Every step runs even if an earlier one failed; the first error is
    /// returned.
    pub fn close(mut self) -> CliConfResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> CliConfResult<()> {
        self.is_closed = true;
        let sent = self.run_rpc(
            Rpc::new_with_operation(RpcOperation::CloseSession),
            "RPC Close Error",
        );
        let stopped = self
            .transport
            .close()
            .map_err(|err| self.failed("Error stopping device cli", err));
        let released = self.log.close().map_err(|err| {
            warn!("Error closing logfile: {}", err);
            err
        });
        sent.and(stopped).and(released)
    }

    fn run_rpc(&mut self, rpc: Rpc, context: &str) -> CliConfResult<()> {
        let xml = rpc
            .to_xml()
            .map_err(|err| self.failed(context, err))?;
        self.send_rpc(&xml).map_err(|err| self.failed(context, err))
    }

    fn failed(&mut self, context: &str, err: CliConfError) -> CliConfError {
        self.note(&format!("{}: {}", context, err));
        err
    }

    fn note(&mut self, msg: &str) {
        note(&mut self.log, msg);
    }
}

/// Session log entries never fail an operation on their own.
fn note(log: &mut EventLog, msg: &str) {
    if !log.is_open() {
        return;
    }
    if let Err(err) = log.record(msg) {
        warn!("Error logging to file: {}", err);
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        if !self.is_closed {
            if let Err(err) = self.shutdown() {
                error!("Error closing device cli session: {}", err);
            }
        }
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("log_open", &self.log.is_open())
            .field("templates", &self.templates.is_some())
            .field("is_closed", &self.is_closed)
            .finish()
    }
}
