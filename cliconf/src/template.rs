use crate::error::CliConfResult;
use serde_json::Value;

/// Renders a configuration template against a set of variables.
///
/// Sessions only template when an engine has been handed to them with
/// [`DeviceSession::with_template_engine`](crate::session::DeviceSession::with_template_engine).
pub trait TemplateEngine: Send {
    fn render(&self, template: &str, vars: &Value) -> CliConfResult<String>;
}

#[cfg(feature = "jinja")]
pub use jinja::JinjaEngine;

#[cfg(feature = "jinja")]
mod jinja {
    use super::TemplateEngine;
    use crate::error::{CliConfError, CliConfResult};
    use minijinja::{Environment, UndefinedBehavior};
    use serde_json::Value;

    /// Jinja2 syntax through minijinja. Undefined variables are an error so a
    /// typo never renders as an empty string into the configuration.
    pub struct JinjaEngine {
        env: Environment<'static>,
    }

    impl JinjaEngine {
        pub fn new() -> JinjaEngine {
            let mut env = Environment::new();
            env.set_undefined_behavior(UndefinedBehavior::Strict);
            JinjaEngine { env }
        }
    }

    impl Default for JinjaEngine {
        fn default() -> Self {
            JinjaEngine::new()
        }
    }

    impl TemplateEngine for JinjaEngine {
        fn render(&self, template: &str, vars: &Value) -> CliConfResult<String> {
            self.env
                .render_str(template, vars)
                .map_err(|err| CliConfError::TemplateRender(err.to_string()))
        }
    }

}
