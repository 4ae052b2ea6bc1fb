//! Request handler module
//!
//! The request pipeline: method and size checks, locals, the view stage, and
//! the static file fallback that runs when no view handles the request.

mod locals;
pub mod router;
pub mod static_files;

pub use locals::build_locals;
// Re-export main entry point
pub use router::{handle_request, RenderedView};
