//! remodel reflect - generic schema-reflection front end
//!
//! Builds `Introspector`s over live connections. Built-in dialect detection
//! runs first; dialects it does not recognize are resolved through an
//! explicit registry of predicate/constructor pairs that dialect drivers
//! hook into at initialization.

mod introspector;
mod metadata;
mod registry;


pub use introspector::Introspector;
pub use metadata::Metadata;
pub use registry::{MetadataResolver, register_resolver};
