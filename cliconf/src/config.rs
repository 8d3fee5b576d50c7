use std::path::{Path, PathBuf};

/// Persistent and writable during ZTP.
pub const DEFAULT_LOGFILE: &str = "/var/root/ztp-log.txt";
pub const DEFAULT_CLI_PROGRAM: &str = "/usr/sbin/cli";
pub const DEFAULT_CLI_ARGS: [&str; 2] = ["xml-mode", "netconf"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub logfile: PathBuf,
    pub debug: bool,
    pub program: String,
    pub args: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            logfile: PathBuf::from(DEFAULT_LOGFILE),
            debug: false,
            program: DEFAULT_CLI_PROGRAM.to_string(),
            args: DEFAULT_CLI_ARGS.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> SessionConfig {
        SessionConfig::default()
    }

    pub fn logfile<P: AsRef<Path>>(mut self, logfile: P) -> Self {
        self.logfile = logfile.as_ref().to_path_buf();
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Replaces the device cli, arguments included.
    pub fn program<I, S>(mut self, program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.program = program.to_string();
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}
