//! Errors surfaced by the view stage to the pipeline's error path

use thiserror::Error;

use crate::render::RenderError;
use crate::views::LookupError;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("view lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("failed to render view '{view}': {source}")]
    Render {
        view: String,
        #[source]
        source: RenderError,
    },
}
