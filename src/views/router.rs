//! View router stage
//!
//! Wires normalization, existence check and dispatch decision together and
//! exposes them as a pipeline stage.

use std::future::Future;
use std::path::PathBuf;

use super::dispatch::{decide, Dispatch};
use super::locals::Locals;
use super::lookup::ViewLookup;
use super::normalize::normalize;
use crate::config::ViewsConfig;
use crate::error::ViewError;
use crate::logger;
use crate::render::ViewRenderer;

/// Request as seen by the view router
#[derive(Debug, Clone, Copy)]
pub struct ViewRequest<'a> {
    pub path: &'a str,
    pub locals: &'a Locals,
}

impl<'a> ViewRequest<'a> {
    pub const fn new(path: &'a str, locals: &'a Locals) -> Self {
        Self { path, locals }
    }
}

/// Result of running the view stage
#[derive(Debug)]
pub enum Handled<T> {
    /// A view was rendered
    Rendered { view: String, body: String },
    /// The request was passed to the next handler, which produced `T`
    Passed(T),
}

/// Convention-based view router
///
/// Holds no per-request state; one instance serves all requests.
#[derive(Debug, Clone)]
pub struct ViewRouter {
    lookup: ViewLookup,
    override_key: String,
}

impl ViewRouter {
    pub fn new(config: &ViewsConfig) -> Self {
        Self {
            lookup: ViewLookup::new(PathBuf::from(&config.directory), &config.extension),
            override_key: config.override_key.clone(),
        }
    }

    pub const fn lookup(&self) -> &ViewLookup {
        &self.lookup
    }

    /// Locals key holding the override view
    pub fn override_key(&self) -> &str {
        &self.override_key
    }

    /// Decide what to do with a request without acting on it
    pub async fn resolve(&self, request: &ViewRequest<'_>) -> Result<Dispatch, ViewError> {
        let view = normalize(request.path);
        let outcome = self.lookup.check(view).await;
        let dispatch = decide(outcome, request.locals.override_view(&self.override_key))?;

        if let Dispatch::Discovered {
            view,
            ignored_override: Some(ignored),
        } = &dispatch
        {
            logger::log_view_conflict(view.as_str(), ignored);
        }

        Ok(dispatch)
    }

    /// Run the view stage for a request
    ///
    /// Exactly one of the following happens: `renderer` renders a view with
    /// the request locals, `next` is awaited, or the lookup error is returned
    /// for the pipeline's error path.
    pub async fn handle<R, F, Fut, T>(
        &self,
        request: &ViewRequest<'_>,
        renderer: &R,
        next: F,
    ) -> Result<Handled<T>, ViewError>
    where
        R: ViewRenderer,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let dispatch = self.resolve(request).await?;
        match dispatch.view() {
            Some(view) => {
                let body = renderer
                    .render(view, request.locals)
                    .await
                    .map_err(|source| ViewError::Render {
                        view: view.to_string(),
                        source,
                    })?;
                Ok(Handled::Rendered {
                    view: view.to_string(),
                    body,
                })
            }
            None => Ok(Handled::Passed(next().await)),
        }
    }
}
