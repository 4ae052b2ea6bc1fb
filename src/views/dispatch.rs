//! Dispatch decision for a single request

use super::lookup::{LookupError, LookupOutcome};
use super::normalize::ViewId;

/// Terminal action chosen for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A view file matching the request path exists.
    /// `ignored_override` carries an override view that lost against it.
    Discovered {
        view: ViewId,
        ignored_override: Option<String>,
    },
    /// No matching file, but the locals named an override view
    Override { view: String },
    /// Nothing to render; the next handler takes the request
    Continue,
}

impl Dispatch {
    /// Name of the view to render, if any
    pub fn view(&self) -> Option<&str> {
        match self {
            Self::Discovered { view, .. } => Some(view.as_str()),
            Self::Override { view } => Some(view),
            Self::Continue => None,
        }
    }
}

/// Choose the action for a lookup outcome and an optional override view
///
/// A discovered view always wins over the override.
pub fn decide(outcome: LookupOutcome, override_view: Option<&str>) -> Result<Dispatch, LookupError> {
    match (outcome, override_view) {
        (LookupOutcome::Found(view), ignored) => Ok(Dispatch::Discovered {
            view,
            ignored_override: ignored.map(ToString::to_string),
        }),
        (LookupOutcome::NotFound, Some(view)) => Ok(Dispatch::Override {
            view: view.to_string(),
        }),
        (LookupOutcome::NotFound, None) => Ok(Dispatch::Continue),
        (LookupOutcome::Failed(e), _) => Err(e),
    }
}
