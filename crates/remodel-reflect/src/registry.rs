//! Explicit metadata-resolver registry
//!
//! Dialect drivers register a predicate/constructor pair at initialization.
//! The introspector factory consults the registry only after built-in
//! detection fails with `UnrecognizedDialect`; resolvers run in
//! registration order and the first match wins.

use crate::metadata::Metadata;
use remodel_core::{Connection, Result};
use std::sync::{Arc, Mutex, OnceLock};

/// A dialect predicate plus the constructor it guards
#[derive(Clone, Copy)]
pub struct MetadataResolver {
    /// Name used in registration logs and for duplicate suppression
    pub name: &'static str,
    /// Returns true when this resolver's dialect owns the connection
    pub matches: fn(&dyn Connection) -> bool,
    /// Build the translator, bound to the provided schema or the dialect default
    pub build: fn(Arc<dyn Connection>, Option<&str>) -> Result<Arc<dyn Metadata>>,
}

impl std::fmt::Debug for MetadataResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataResolver")
            .field("name", &self.name)
            .finish()
    }
}

fn resolvers() -> &'static Mutex<Vec<MetadataResolver>> {
    static RESOLVERS: OnceLock<Mutex<Vec<MetadataResolver>>> = OnceLock::new();
    RESOLVERS.get_or_init(|| Mutex::new(Vec::new()))
}

/// Register a resolver, appended after existing ones. Process-wide;
/// registering the same name twice is a no-op.
pub fn register_resolver(resolver: MetadataResolver) {
    let mut guard = resolvers().lock().expect("resolver registry poisoned");
    if guard.iter().any(|r| r.name == resolver.name) {
        return;
    }
    tracing::info!(resolver = %resolver.name, "registering metadata resolver");
    guard.push(resolver);
}

/// Find the first resolver accepting `conn` and build its translator.
///
/// `Ok(None)` when nothing matches; constructor failures propagate.
pub(crate) fn resolve(
    conn: &Arc<dyn Connection>,
    schema: Option<&str>,
) -> Result<Option<Arc<dyn Metadata>>> {
    let candidate = {
        let guard = resolvers().lock().expect("resolver registry poisoned");
        guard.iter().copied().find(|r| (r.matches)(conn.as_ref()))
    };
    match candidate {
        Some(resolver) => {
            tracing::debug!(resolver = %resolver.name, "resolved metadata translator");
            (resolver.build)(conn.clone(), schema).map(Some)
        }
        None => Ok(None),
    }
}
