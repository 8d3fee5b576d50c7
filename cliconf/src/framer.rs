use crate::error::{CliConfError, CliConfResult};
use log::debug;
use std::io::Write;

pub const NETCONF_1_0_TERMINATOR: &str = "]]>]]>";

/// End-of-message framing for the device cli in `xml-mode netconf`.
/// See [RFC6242](https://tools.ietf.org/html/rfc6242#section-4.3)
#[derive(Debug, Default)]
pub struct Framer;

impl Framer {
    pub fn new() -> Framer {
        Framer
    }

    pub fn write_xml<T>(&mut self, rpc: &str, mut to: T) -> CliConfResult<()>
    where
        T: Write,
    {
        if rpc.contains(NETCONF_1_0_TERMINATOR) {
            return Err(CliConfError::EmbeddedTerminator);
        }
        debug!("RPC:\n{}", rpc);
        let mut send = || -> std::io::Result<()> {
            to.write_all(rpc.as_bytes())?;
            to.write_all(NETCONF_1_0_TERMINATOR.as_bytes())?;
            to.flush()
        };
        send().map_err(CliConfError::RpcWrite)
    }
}
