use crate::error::{CliConfError, CliConfResult};
use crate::NETCONF_URN;
use core::str::FromStr;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::se::Serializer;
use quick_xml::Reader;
use serde_derive::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct Rpc {
    #[serde(rename = "@message-id")]
    message_id: String,
    #[serde(rename = "@xmlns")]
    xmlns: String,
    #[serde(rename = "$value")]
    operation: RpcOperation,
}

impl Rpc {
    pub fn new_with_operation(operation: RpcOperation) -> Rpc {
        Rpc {
            xmlns: NETCONF_URN.to_string(),
            message_id: Uuid::new_v4().to_string(),
            operation,
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn operation(&self) -> &RpcOperation {
        &self.operation
    }

    /// Serializes the request into the `<rpc>` element sent to the device.
    ///
    /// Inline XML configuration is embedded as markup rather than text, so the
    /// escaping applied by the serializer is reverted for that payload only.
    pub fn to_xml(&self) -> CliConfResult<String> {
        use serde::Serialize;
        let mut buffer = String::with_capacity(256);
        let mut ser = Serializer::with_root(&mut buffer, Some("rpc"))?;
        ser.indent(' ', 2);
        self.serialize(ser)?;
        if self.operation.embeds_xml() {
            Ok(unescape(&buffer)?.into_owned())
        } else {
            Ok(buffer)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RpcOperation {
    CloseSession,
    Commit,
    RequestReboot,
    LoadConfiguration(LoadConfiguration),
    RequestPackageAdd(RequestPackageAdd),
}

impl RpcOperation {
    /// Builds a `<load-configuration>` request.
    ///
    /// The `set` action and the `set` format are interchangeable: either one
    /// selects `action="set"`, `format="text"` and a `<configuration-set>`
    /// payload.
    pub fn new_load_configuration(
        source: ConfigSource,
        format: ConfigFormat,
        action: LoadAction,
    ) -> CliConfResult<RpcOperation> {
        let set_mode = action == LoadAction::Set || format == ConfigFormat::Set;
        let (action, format) = if set_mode {
            (LoadAction::Set, ConfigFormat::Text)
        } else {
            (action, format)
        };

        let (url, content) = match source {
            ConfigSource::Url(url) => (Some(url), None),
            ConfigSource::Text(text) => {
                let content = if set_mode {
                    ConfigContent::ConfigurationSet(text)
                } else if format == ConfigFormat::Xml {
                    ConfigContent::Configuration(embeddable_xml(&text)?)
                } else {
                    ConfigContent::ConfigurationText(text)
                };
                (None, Some(content))
            }
        };

        Ok(RpcOperation::LoadConfiguration(LoadConfiguration {
            url,
            action,
            format,
            content,
        }))
    }

    pub fn new_request_package_add(url: &str, options: PackageOptions) -> RpcOperation {
        RpcOperation::RequestPackageAdd(RequestPackageAdd {
            package_name: url.to_string(),
            no_copy: options.no_copy.then_some(()),
            no_validate: options.no_validate.then_some(()),
            unlink: options.unlink.then_some(()),
            reboot: options.reboot.then_some(()),
        })
    }

    fn embeds_xml(&self) -> bool {
        matches!(
            self,
            RpcOperation::LoadConfiguration(LoadConfiguration {
                content: Some(ConfigContent::Configuration(_)),
                ..
            })
        )
    }
}

#[derive(Debug, Serialize)]
pub struct LoadConfiguration {
    #[serde(rename = "@url", skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(rename = "@action")]
    action: LoadAction,
    #[serde(rename = "@format")]
    format: ConfigFormat,
    #[serde(rename = "$value", skip_serializing_if = "Option::is_none")]
    content: Option<ConfigContent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ConfigContent {
    Configuration(String),
    ConfigurationText(String),
    ConfigurationSet(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RequestPackageAdd {
    package_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_copy: Option<()>,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_validate: Option<()>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unlink: Option<()>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reboot: Option<()>,
}

/// Flags for `request-package-add`. Reboot is off by default so an upgrade
/// never restarts the device unless asked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageOptions {
    pub no_copy: bool,
    pub no_validate: bool,
    pub unlink: bool,
    pub reboot: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        PackageOptions {
            no_copy: true,
            no_validate: true,
            unlink: true,
            reboot: false,
        }
    }
}

/// Where the configuration comes from. A url may be a local path, or an
/// `ftp://` or `http://` location reachable from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Text(String),
    Url(String),
}

impl ConfigSource {
    pub fn from_parts(text: Option<String>, url: Option<String>) -> CliConfResult<ConfigSource> {
        match (text, url) {
            (Some(text), None) => Ok(ConfigSource::Text(text)),
            (None, Some(url)) => Ok(ConfigSource::Url(url)),
            (Some(_), Some(_)) => Err(CliConfError::AmbiguousConfigSource),
            (None, None) => Err(CliConfError::MissingConfigSource),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    #[default]
    Text,
    Set,
    Xml,
}

impl FromStr for ConfigFormat {
    type Err = CliConfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = s.to_lowercase();
        match format.as_str() {
            "text" => Ok(ConfigFormat::Text),
            "set" => Ok(ConfigFormat::Set),
            "xml" => Ok(ConfigFormat::Xml),
            _ => Err(CliConfError::InvalidFormat {
                expected: vec!["text".to_string(), "set".to_string(), "xml".to_string()],
                unknown: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadAction {
    #[default]
    Merge,
    Override,
    Replace,
    Update,
    Set,
}

impl FromStr for LoadAction {
    type Err = CliConfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = s.to_lowercase();
        match action.as_str() {
            "merge" => Ok(LoadAction::Merge),
            "override" => Ok(LoadAction::Override),
            "replace" => Ok(LoadAction::Replace),
            "update" => Ok(LoadAction::Update),
            "set" => Ok(LoadAction::Set),
            _ => Err(CliConfError::InvalidAction {
                expected: vec![
                    "merge".to_string(),
                    "override".to_string(),
                    "replace".to_string(),
                    "update".to_string(),
                    "set".to_string(),
                ],
                unknown: s.to_string(),
            }),
        }
    }
}

/// Checks that `xml` can be nested inside `<configuration>` and returns the
/// markup to embed. A leading xml declaration is dropped; a declaration
/// anywhere else, or a doctype, is rejected.
fn embeddable_xml(xml: &str) -> CliConfResult<String> {
    let malformed = |msg: String| CliConfError::MalformedConfiguration(msg);
    let mut reader = Reader::from_str(xml);
    let mut depth: usize = 0;
    let mut body_start = 0;
    let mut seen_markup = false;
    loop {
        let event = reader.read_event().map_err(|err| malformed(err.to_string()))?;
        match event {
            Event::Decl(_) if !seen_markup => {
                body_start = reader.buffer_position();
                seen_markup = true;
            }
            Event::Decl(_) => {
                return Err(malformed(
                    "xml declaration is only allowed at the start".to_string(),
                ))
            }
            Event::DocType(_) => {
                return Err(malformed("doctype is not allowed in an rpc".to_string()))
            }
            Event::Start(_) => {
                depth += 1;
                seen_markup = true;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            Event::Eof => break,
            _ => seen_markup = true,
        }
    }
    if depth != 0 {
        return Err(malformed(format!("{} unclosed element(s)", depth)));
    }
    Ok(xml[body_start..].trim_start().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MESSAGE_ID: &str = "c1be0e7f-3cbc-413f-8aa8-18ed663221d4";

    fn rpc(operation: RpcOperation) -> Rpc {
        Rpc {
            xmlns: NETCONF_URN.to_string(),
            message_id: MESSAGE_ID.to_string(),
            operation,
        }
    }

    #[test]
    fn test_serialize_commit() {
        let expected = r#"
<rpc message-id="c1be0e7f-3cbc-413f-8aa8-18ed663221d4" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <commit/>
</rpc>
"#;
        assert_eq!(rpc(RpcOperation::Commit).to_xml().unwrap(), expected.trim());
    }

    #[test]
    fn test_serialize_close_session() {
        let expected = r#"
<rpc message-id="c1be0e7f-3cbc-413f-8aa8-18ed663221d4" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <close-session/>
</rpc>
"#;
        assert_eq!(rpc(RpcOperation::CloseSession).to_xml().unwrap(), expected.trim());
    }

    #[test]
    fn test_serialize_reboot() {
        let expected = r#"
<rpc message-id="c1be0e7f-3cbc-413f-8aa8-18ed663221d4" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <request-reboot/>
</rpc>
"#;
        assert_eq!(rpc(RpcOperation::RequestReboot).to_xml().unwrap(), expected.trim());
    }

    #[test]
    fn test_serialize_package_add_without_flags() {
        let expected = r#"
<rpc message-id="c1be0e7f-3cbc-413f-8aa8-18ed663221d4" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <request-package-add>
    <package-name>http://172.32.32.254/jinstall-X.Y.tgz</package-name>
  </request-package-add>
</rpc>
"#;
        let options = PackageOptions {
            no_copy: false,
            no_validate: false,
            unlink: false,
            reboot: false,
        };
        let operation =
            RpcOperation::new_request_package_add("http://172.32.32.254/jinstall-X.Y.tgz", options);
        assert_eq!(rpc(operation).to_xml().unwrap(), expected.trim());
    }

    #[test]
    fn test_serialize_package_add_with_defaults() {
        let expected = r#"
<rpc message-id="c1be0e7f-3cbc-413f-8aa8-18ed663221d4" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <request-package-add>
    <package-name>/var/tmp/jinstall-X.Y.tgz</package-name>
    <no-copy/>
    <no-validate/>
    <unlink/>
  </request-package-add>
</rpc>
"#;
        let operation = RpcOperation::new_request_package_add(
            "/var/tmp/jinstall-X.Y.tgz",
            PackageOptions::default(),
        );
        assert_eq!(rpc(operation).to_xml().unwrap(), expected.trim());

        let options = PackageOptions {
            reboot: true,
            ..PackageOptions::default()
        };
        let operation = RpcOperation::new_request_package_add("/var/tmp/jinstall-X.Y.tgz", options);
        assert!(rpc(operation).to_xml().unwrap().contains("<unlink/>\n    <reboot/>"));
    }

    #[test]
    fn test_serialize_load_url() {
        let expected = r#"
<rpc message-id="c1be0e7f-3cbc-413f-8aa8-18ed663221d4" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <load-configuration url="http://172.32.32.254/ztp.cfg" action="replace" format="text"/>
</rpc>
"#;
        let operation = RpcOperation::new_load_configuration(
            ConfigSource::Url("http://172.32.32.254/ztp.cfg".to_string()),
            ConfigFormat::Text,
            LoadAction::Replace,
        )
        .unwrap();
        assert_eq!(rpc(operation).to_xml().unwrap(), expected.trim());
    }

    #[test]
    fn test_serialize_load_url_set() {
        let operation = RpcOperation::new_load_configuration(
            ConfigSource::Url("/var/tmp/set.cfg".to_string()),
            ConfigFormat::Set,
            LoadAction::Merge,
        )
        .unwrap();
        assert!(rpc(operation)
            .to_xml()
            .unwrap()
            .contains(r#"<load-configuration url="/var/tmp/set.cfg" action="set" format="text"/>"#));
    }

    #[test]
    fn test_serialize_load_text() {
        let expected = r#"
<rpc message-id="c1be0e7f-3cbc-413f-8aa8-18ed663221d4" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <load-configuration action="merge" format="text">
    <configuration-text>system { host-name foo; }</configuration-text>
  </load-configuration>
</rpc>
"#;
        let operation = RpcOperation::new_load_configuration(
            ConfigSource::Text("system { host-name foo; }".to_string()),
            ConfigFormat::default(),
            LoadAction::default(),
        )
        .unwrap();
        assert_eq!(rpc(operation).to_xml().unwrap(), expected.trim());
    }

    #[test]
    fn test_serialize_load_text_is_escaped() {
        let operation = RpcOperation::new_load_configuration(
            ConfigSource::Text("system { login { message a<b&c; } }".to_string()),
            ConfigFormat::Text,
            LoadAction::Merge,
        )
        .unwrap();
        let xml = rpc(operation).to_xml().unwrap();
        assert!(xml.contains("message a&lt;b&amp;c;"));
        assert!(!xml.contains("a<b"));
    }

    #[test]
    fn test_serialize_load_set_action_forces_text() {
        let expected = r#"
<rpc message-id="c1be0e7f-3cbc-413f-8aa8-18ed663221d4" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <load-configuration action="set" format="text">
    <configuration-set>set system host-name set-string</configuration-set>
  </load-configuration>
</rpc>
"#;
        for format in [ConfigFormat::Text, ConfigFormat::Set, ConfigFormat::Xml] {
            let operation = RpcOperation::new_load_configuration(
                ConfigSource::Text("set system host-name set-string".to_string()),
                format,
                LoadAction::Set,
            )
            .unwrap();
            assert_eq!(rpc(operation).to_xml().unwrap(), expected.trim());
        }

        let operation = RpcOperation::new_load_configuration(
            ConfigSource::Text("set system host-name set-string".to_string()),
            ConfigFormat::Set,
            LoadAction::Replace,
        )
        .unwrap();
        assert_eq!(rpc(operation).to_xml().unwrap(), expected.trim());
    }

    #[test]
    fn test_serialize_load_xml_for_every_action() {
        let config = "<system><host-name>foo</host-name></system>";
        for (action, name) in [
            (LoadAction::Merge, "merge"),
            (LoadAction::Override, "override"),
            (LoadAction::Replace, "replace"),
            (LoadAction::Update, "update"),
        ] {
            let expected = format!(
                r#"
<rpc message-id="c1be0e7f-3cbc-413f-8aa8-18ed663221d4" xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
  <load-configuration action="{}" format="xml">
    <configuration>{}</configuration>
  </load-configuration>
</rpc>
"#,
                name, config
            );
            let operation = RpcOperation::new_load_configuration(
                ConfigSource::Text(config.to_string()),
                ConfigFormat::Xml,
                action,
            )
            .unwrap();
            assert_eq!(rpc(operation).to_xml().unwrap(), expected.trim());
        }
    }

    #[test]
    fn test_load_xml_keeps_entities() {
        let config = "<system><login><message>a &amp; b</message></login></system>";
        let operation = RpcOperation::new_load_configuration(
            ConfigSource::Text(config.to_string()),
            ConfigFormat::Xml,
            LoadAction::Merge,
        )
        .unwrap();
        assert!(rpc(operation).to_xml().unwrap().contains(config));
    }

    #[test]
    fn test_load_xml_rejects_malformed() {
        for config in [
            "<system><host-name>foo</system>",
            "<system><host-name>foo</host-name>",
        ] {
            let result = RpcOperation::new_load_configuration(
                ConfigSource::Text(config.to_string()),
                ConfigFormat::Xml,
                LoadAction::Merge,
            );
            assert!(matches!(
                result,
                Err(CliConfError::MalformedConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_load_xml_drops_leading_declaration() {
        let operation = RpcOperation::new_load_configuration(
            ConfigSource::Text(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<system><host-name>foo</host-name></system>"
                    .to_string(),
            ),
            ConfigFormat::Xml,
            LoadAction::Merge,
        )
        .unwrap();
        let xml = rpc(operation).to_xml().unwrap();
        assert!(!xml.contains("<?xml"));
        assert!(xml.contains("<configuration><system><host-name>foo</host-name></system></configuration>"));
    }

    #[test]
    fn test_load_xml_rejects_doctype_and_late_declaration() {
        for config in [
            "<!DOCTYPE system><system/>",
            "<system/><?xml version=\"1.0\"?>",
            "<?xml version=\"1.0\"?><?xml version=\"1.0\"?><system/>",
        ] {
            let result = RpcOperation::new_load_configuration(
                ConfigSource::Text(config.to_string()),
                ConfigFormat::Xml,
                LoadAction::Merge,
            );
            assert!(
                matches!(result, Err(CliConfError::MalformedConfiguration(_))),
                "accepted {}",
                config
            );
        }
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(LoadAction::from_str("merge").unwrap(), LoadAction::Merge);
        assert_eq!(LoadAction::from_str("Override").unwrap(), LoadAction::Override);
        assert_eq!(LoadAction::from_str("SET").unwrap(), LoadAction::Set);
        match LoadAction::from_str("bogus") {
            Err(CliConfError::InvalidAction { unknown, expected }) => {
                assert_eq!(unknown, "bogus");
                assert_eq!(expected.len(), 5);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(ConfigFormat::from_str("xml").unwrap(), ConfigFormat::Xml);
        assert_eq!(ConfigFormat::default(), ConfigFormat::Text);
        assert!(matches!(
            ConfigFormat::from_str("json"),
            Err(CliConfError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_config_source_requires_exactly_one() {
        assert_eq!(
            ConfigSource::from_parts(Some("set system host-name a".to_string()), None).unwrap(),
            ConfigSource::Text("set system host-name a".to_string())
        );
        assert_eq!(
            ConfigSource::from_parts(None, Some("/var/tmp/a.cfg".to_string())).unwrap(),
            ConfigSource::Url("/var/tmp/a.cfg".to_string())
        );
        assert!(matches!(
            ConfigSource::from_parts(None, None),
            Err(CliConfError::MissingConfigSource)
        ));
        assert!(matches!(
            ConfigSource::from_parts(Some("a".to_string()), Some("b".to_string())),
            Err(CliConfError::AmbiguousConfigSource)
        ));
    }

    #[test]
    fn test_new_rpc_has_message_id() {
        let first = Rpc::new_with_operation(RpcOperation::Commit);
        let second = Rpc::new_with_operation(RpcOperation::Commit);
        assert_ne!(first.message_id(), second.message_id());
        assert!(first
            .to_xml()
            .unwrap()
            .starts_with(&format!(r#"<rpc message-id="{}""#, first.message_id())));
    }
}
