use crate::error::{CliConfError, CliConfResult};
use crate::framer::Framer;
use crate::transport::Transport;
use log::{debug, warn};
use std::fs::File;
use std::process::{Child, ChildStdin, Command, Stdio};

/// Device cli running in `xml-mode netconf`, fed through its stdin.
pub struct CliTransport {
    child: Child,
    stdin: Option<ChildStdin>,
    framer: Framer,
}

impl CliTransport {
    /// Spawns `program` with stdout and stderr appended to `output`.
    pub fn spawn(program: &str, args: &[String], output: &File) -> CliConfResult<CliTransport> {
        let launch_error = |source| CliConfError::SessionLaunch {
            program: program.to_string(),
            source,
        };
        let stdout = output.try_clone().map_err(launch_error)?;
        let stderr = output.try_clone().map_err(launch_error)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(launch_error)?;
        debug!("Spawned '{}' with pid {}", program, child.id());

        let stdin = child.stdin.take();
        Ok(CliTransport {
            child,
            stdin,
            framer: Framer::new(),
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

impl Transport for CliTransport {
    fn write(&mut self, rpc: &str) -> CliConfResult<()> {
        let stdin = self.stdin.as_mut().ok_or(CliConfError::SessionClosed)?;
        self.framer.write_xml(rpc, stdin)
    }

    fn close(&mut self) -> CliConfResult<()> {
        if self.stdin.take().is_none() {
            return Ok(());
        }
        let status = self.child.wait()?;
        if status.success() {
            debug!("Device cli exited");
        } else {
            warn!("Device cli exited with {}", status);
        }
        Ok(())
    }
}
