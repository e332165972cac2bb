//! API documentation core library
//!
//! This library loads OpenAPI documents, resolves `$ref`s, materializes
//! schemas into examples and outlines, indexes endpoints by tag and renders
//! everything into a static HTML reference page.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod generate;
pub mod openapi;
pub mod reference;
pub mod render;
pub mod schema;
pub mod snippets;
pub mod utils;

pub use crate::{
    config::Config,
    endpoints::{Endpoint, HttpMethod, TagGroup, Webhook},
    error::{Error, Result},
    generate::generate,
    openapi::ApiDocument,
    render::{PageContext, PageOptions, Renderer, Theme},
    snippets::{SnippetGenerator, SnippetLanguage},
};
