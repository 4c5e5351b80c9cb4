//! Default component registry.
//!
//! The registry maps component names to implementations. It is assembled
//! once at startup (builtin defaults plus whatever the host adds), installed
//! as the process-wide default, and only read afterwards. Per-subtree
//! changes go through [`Scope`](crate::scope::Scope), never through the
//! registry.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::component::ComponentRef;
use crate::error::RegistryError;

/// Key for the layout wrapper that encloses a whole page.
pub const WRAPPER: &str = "wrapper";

/// Key for inline code spans.
pub const INLINE_CODE: &str = "inlineCode";

/// Key for explicit provider elements.
pub const PROVIDER: &str = "MDXProvider";

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Mapping from component name to implementation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    entries: HashMap<String, ComponentRef>,
}

impl Registry {
    /// Creates a registry with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the MDX runtime defaults:
    /// `inlineCode` renders as `code`, `wrapper` and `MDXProvider` render
    /// only their children.
    #[must_use]
    pub fn builtin() -> Self {
        Self::empty()
            .with(INLINE_CODE, ComponentRef::primitive("code"))
            .with(WRAPPER, ComponentRef::fragment(WRAPPER))
            .with(PROVIDER, ComponentRef::fragment(PROVIDER))
    }

    /// Adds an entry, replacing any previous one under the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, component: ComponentRef) -> Self {
        self.insert(name, component);
        self
    }

    /// Adds an entry, returning the one it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        component: ComponentRef,
    ) -> Option<ComponentRef> {
        self.entries.insert(name.into(), component)
    }

    /// Merges `other` into this registry; entries from `other` win.
    #[must_use]
    pub fn extend(mut self, other: Self) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Looks up a component by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ComponentRef> {
        self.entries.get(name)
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Installs `registry` as the process-wide default.
///
/// # Errors
///
/// Returns `RegistryError::AlreadyInstalled` if a registry was installed
/// before, or if [`global`] already initialized the builtin defaults.
pub fn install(registry: Registry) -> Result<&'static Registry, RegistryError> {
    let count = registry.len();
    GLOBAL
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    tracing::debug!(components = count, "default component registry installed");
    Ok(global())
}

/// The process-wide default registry.
///
/// Falls back to [`Registry::builtin`] when nothing was installed; after the
/// first call the registry is fixed for the lifetime of the process.
#[must_use]
pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(Registry::builtin)
}
