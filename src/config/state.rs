// Application state module
// Everything a request handler needs, built once at startup

use super::types::Config;
use crate::render::{HandlebarsRenderer, RenderError};
use crate::views::ViewRouter;

/// Application state shared by all connections
pub struct AppState {
    pub config: Config,
    pub views: ViewRouter,
    pub renderer: HandlebarsRenderer,
    /// Override prefixes sorted longest first, so the first match is the most specific
    pub view_overrides: Vec<(String, String)>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        let mut view_overrides: Vec<(String, String)> = config
            .views
            .overrides
            .iter()
            .map(|(prefix, view)| (prefix.clone(), view.clone()))
            .collect();
        view_overrides.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Ok(Self {
            config: config.clone(),
            views: ViewRouter::new(&config.views),
            renderer: HandlebarsRenderer::new(&config.views)?,
            view_overrides,
        })
    }

    /// Override view configured for `path`, if any
    ///
    /// Prefixes match whole segments: `/admin` covers `/admin` and
    /// `/admin/users` but not `/administrator`.
    pub fn override_for(&self, path: &str) -> Option<&str> {
        self.view_overrides
            .iter()
            .find(|(prefix, _)| covers(prefix, path))
            .map(|(_, view)| view.as_str())
    }
}

fn covers(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix).is_some_and(|rest| {
        rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/')
    })
}
