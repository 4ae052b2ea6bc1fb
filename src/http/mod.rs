//! HTTP protocol layer module
//!
//! Response builders and cache validation shared by the view stage and the
//! static file fallback.

pub mod cache;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_html_response, build_options_response, body_len,
};
