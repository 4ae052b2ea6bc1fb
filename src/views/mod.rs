//! Convention-based view resolution
//!
//! Maps a request path onto a template file under the views directory:
//! `/` resolves to `index`, `/about` to `about`, `/menu/group` to `menu/group`.
//! When the file `{directory}/{view}.{extension}` exists the view is rendered,
//! otherwise an override view from the request locals is rendered, otherwise
//! the request is passed on to the next stage of the pipeline.

mod dispatch;
mod locals;
mod lookup;
mod normalize;
mod router;

pub use dispatch::{decide, Dispatch};
pub use locals::Locals;
pub use lookup::{LookupError, LookupOutcome, ViewLookup};
pub use normalize::{normalize, ViewId, DEFAULT_VIEW};
pub use router::{Handled, ViewRequest, ViewRouter};
