//! Handlebars-backed renderer

use handlebars::Handlebars;
use std::path::{Path, PathBuf};

use super::{RenderError, ViewRenderer};
use crate::config::ViewsConfig;
use crate::logger;
use crate::views::Locals;

/// Directory below the views directory holding partial templates
const PARTIALS_DIR: &str = "partials";

/// Renders `{directory}/{view}.{extension}` with Handlebars
///
/// Templates are read from disk on every render so edits show up without a
/// restart. Partials are registered once at construction.
pub struct HandlebarsRenderer {
    handlebars: Handlebars<'static>,
    directory: PathBuf,
    extension: String,
}

impl HandlebarsRenderer {
    pub fn new(config: &ViewsConfig) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        let directory = PathBuf::from(&config.directory);
        let extension = config.extension.trim_start_matches('.').to_string();

        let partials = register_partials(&mut handlebars, &directory.join(PARTIALS_DIR), &extension)?;
        if partials > 0 {
            logger::log_info(&format!("[Views] Registered {partials} partial(s)"));
        }

        Ok(Self {
            handlebars,
            directory,
            extension,
        })
    }

    fn template_path(&self, view: &str) -> PathBuf {
        self.directory.join(format!("{view}.{}", self.extension))
    }
}

impl ViewRenderer for HandlebarsRenderer {
    async fn render(&self, view: &str, locals: &Locals) -> Result<String, RenderError> {
        let path = self.template_path(view);
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(s) => s,
            Err(source) => return Err(RenderError::Io { path, source }),
        };
        Ok(self.handlebars.render_template(&source, locals)?)
    }
}

/// Register every `*.{extension}` file in `dir` as a partial named after its stem
///
/// A missing partials directory is not an error.
fn register_partials(
    handlebars: &mut Handlebars<'static>,
    dir: &Path,
    extension: &str,
) -> Result<usize, RenderError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(RenderError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut count = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let source = std::fs::read_to_string(&path).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        handlebars.register_partial(name, source)?;
        count += 1;
    }
    Ok(count)
}
