//! HTML rendering of a loaded document.
//!
//! [`PageContext`] turns an [`ApiDocument`](crate::openapi::ApiDocument) into
//! template-ready data; [`Renderer`] feeds it through tera.

mod context;
mod renderer;
mod theme;

pub use context::{
    BodyView, EndpointView, PageContext, PageOptions, ParameterView, ResponseView, TagGroupView,
    WebhookView,
};
pub use renderer::{Renderer, INDEX_TEMPLATE, SPEC_JSON_FILE};
pub use theme::Theme;
