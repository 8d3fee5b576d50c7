use crate::error::{CliConfError, CliConfResult};
use crate::framer::Framer;
use crate::transport::Transport;
use std::io::Write;

/// Frames RPCs into any writer, e.g. stdout for a dry run.
pub struct StreamTransport<W> {
    writer: Option<W>,
    framer: Framer,
}

impl<W: Write + Send> StreamTransport<W> {
    pub fn new(writer: W) -> StreamTransport<W> {
        StreamTransport {
            writer: Some(writer),
            framer: Framer::new(),
        }
    }

    pub fn into_inner(self) -> Option<W> {
        self.writer
    }
}

impl<W: Write + Send> Transport for StreamTransport<W> {
    fn write(&mut self, rpc: &str) -> CliConfResult<()> {
        let writer = self.writer.as_mut().ok_or(CliConfError::SessionClosed)?;
        self.framer.write_xml(rpc, writer)
    }

    fn close(&mut self) -> CliConfResult<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}
