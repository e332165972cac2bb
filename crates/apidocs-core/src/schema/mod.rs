//! Schema dereferencing, example synthesis and compact outlines.

mod example;
mod outline;
mod resolve;
mod types;

pub use example::{
    generate_example, generate_example_at, DATE_EXAMPLE, DATE_TIME_EXAMPLE, MAX_EXAMPLE_DEPTH,
    UUID_EXAMPLE,
};
pub use outline::outline;
pub use resolve::{resolve_schema, resolve_schema_with};
pub use types::{SchemaShape, SchemaType};
