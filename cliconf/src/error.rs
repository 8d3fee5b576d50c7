use thiserror::Error;

pub type CliConfResult<T> = Result<T, CliConfError>;

#[derive(Debug, Error)]
pub enum CliConfError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to launch '{program}', are you on Junos? ({source})")]
    SessionLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write rpc to device cli: {0}")]
    RpcWrite(#[source] std::io::Error),
    #[error("session is already closed")]
    SessionClosed,
    #[error(transparent)]
    SerializingFailure(#[from] quick_xml::DeError),
    #[error(transparent)]
    Escape(#[from] quick_xml::escape::EscapeError),
    #[error("malformed xml configuration: {0}")]
    MalformedConfiguration(String),
    #[error("rpc payload contains the end-of-message marker ]]>]]>")]
    EmbeddedTerminator,
    #[error("unknown load action {}, (expected {:?})", unknown, expected)]
    InvalidAction {
        expected: Vec<String>,
        unknown: String,
    },
    #[error("unknown configuration format {}, (expected {:?})", unknown, expected)]
    InvalidFormat {
        expected: Vec<String>,
        unknown: String,
    },
    #[error("load_config needs either a configuration string or a url")]
    MissingConfigSource,
    #[error("load_config accepts a configuration string or a url, not both")]
    AmbiguousConfigSource,
    #[error("template render failed: {0}")]
    TemplateRender(String),
    #[error("no template engine available for this session")]
    TemplatingUnavailable,
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl CliConfError {
    pub fn new(msg: String) -> Self {
        CliConfError::Anyhow(anyhow::Error::msg(msg))
    }
}
