//! Convention-based view resolution for a hyper/tokio request pipeline.
//!
//! A request for `/menu/group` renders `views/menu/group.hbs` when that file
//! exists. Otherwise an override view named in the request locals is
//! rendered, and failing that the request moves on to the next stage.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod render;
pub mod server;
pub mod views;

pub use error::ViewError;
pub use render::{HandlebarsRenderer, RenderError, ViewRenderer};
pub use views::{normalize, Dispatch, Handled, Locals, ViewRequest, ViewRouter};
