use crate::error::CliConfResult;

pub mod cli;
pub mod stream;

/// Trait for the channel RPCs are written to. Replies are never read back,
/// the device cli's output goes to the session log.
pub trait Transport: Send {
    fn write(&mut self, rpc: &str) -> CliConfResult<()>;
    fn close(&mut self) -> CliConfResult<()>;
}
