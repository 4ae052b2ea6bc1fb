//! View rendering
//!
//! The view router only decides *what* to render; producing the markup is
//! delegated to a [`ViewRenderer`]. The server uses [`HandlebarsRenderer`].

mod handlebars;

pub use self::handlebars::HandlebarsRenderer;

use std::future::Future;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::views::Locals;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template syntax error: {0}")]
    Template(#[from] ::handlebars::TemplateError),

    #[error("template render error: {0}")]
    Render(#[from] ::handlebars::RenderError),
}

/// Renders a named view with the request locals as template data
pub trait ViewRenderer {
    fn render(
        &self,
        view: &str,
        locals: &Locals,
    ) -> impl Future<Output = Result<String, RenderError>> + Send;
}
