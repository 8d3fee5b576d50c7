//! # cliconf
//!
//! Minimal on-box bootstrapping of a Junos device, primarily for Zero Touch
//! Provisioning (ZTP). A [`DeviceSession`](session::DeviceSession) runs the
//! device cli in `xml-mode netconf` and writes NETCONF RPCs to it.
//!
//! ## Example
//!
//! ```no_run
//! use cliconf::config::SessionConfig;
//! use cliconf::message::{ConfigFormat, LoadAction};
//! use cliconf::session::DeviceSession;
//! use cliconf::template::JinjaEngine;
//! use serde_json::json;
//!
//! # fn main() -> cliconf::error::CliConfResult<()> {
//! let mut dev = DeviceSession::launch(SessionConfig::default())?
//!     .with_template_engine(JinjaEngine::new());
//! dev.load_config_template(
//!     "system { host-name {{ hostname }}-{{ suffix }}; }",
//!     &json!({"hostname": "foo", "suffix": "bah"}),
//!     ConfigFormat::Text,
//!     LoadAction::Merge,
//! )?;
//! dev.commit()?;
//! dev.close()
//! # }
//! ```
//!
pub mod config;
pub mod error;
pub mod eventlog;
pub mod framer;
pub mod message;
pub mod session;
pub mod template;
pub mod transport;

pub const NETCONF_URN: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
