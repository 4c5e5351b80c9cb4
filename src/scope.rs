//! Render scopes: per-subtree override layers on top of the registry.
//!
//! A scope is an immutable snapshot. Creating a child scope never touches
//! the parent; the merged entries live in a new shared map.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::component::ComponentRef;

/// Immutable mapping of overrides visible to a subtree.
///
/// Cloning is cheap: entries are shared.
#[derive(Clone, Default, PartialEq)]
pub struct Scope {
    entries: Arc<HashMap<String, ComponentRef>>,
}

impl Scope {
    /// The empty scope.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up an override by exact key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ComponentRef> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is overridden in this scope.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Overridden keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if both scopes share storage.
    #[must_use]
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Creates a child scope with `overrides` layered on top of this one.
    #[must_use]
    pub fn child(&self, overrides: &Overrides) -> Self {
        create_scope(self, overrides)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope").field("keys", &self.keys()).finish()
    }
}

impl FromIterator<(String, ComponentRef)> for Scope {
    fn from_iter<I: IntoIterator<Item = (String, ComponentRef)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

/// Function deriving a complete scope from the parent scope.
pub type DeriveFn = dyn Fn(&Scope) -> Scope + Send + Sync;

/// Overrides supplied by a scope provider.
#[derive(Clone)]
pub enum Overrides {
    /// Shallow merge: these keys replace the parent's, the rest are kept.
    Merge(HashMap<String, ComponentRef>),
    /// The function's result becomes the scope, parent entries are not
    /// merged in implicitly.
    Derive(Arc<DeriveFn>),
}

impl Overrides {
    /// No overrides.
    #[must_use]
    pub fn none() -> Self {
        Self::Merge(HashMap::new())
    }

    /// Overrides computed from the parent scope.
    pub fn derive<F>(f: F) -> Self
    where
        F: Fn(&Scope) -> Scope + Send + Sync + 'static,
    {
        Self::Derive(Arc::new(f))
    }

    /// Adds a merge entry. On a `Derive`, the entry is merged into the
    /// derived scope.
    #[must_use]
    pub fn with(self, key: impl Into<String>, component: ComponentRef) -> Self {
        match self {
            Self::Merge(mut map) => {
                map.insert(key.into(), component);
                Self::Merge(map)
            }
            Self::Derive(derive) => {
                let layer = Self::Merge(HashMap::from([(key.into(), component)]));
                Self::derive(move |parent| create_scope(&derive(parent), &layer))
            }
        }
    }
}

impl Default for Overrides {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort_unstable();
                f.debug_tuple("Merge").field(&keys).finish()
            }
            Self::Derive(_) => f.write_str("Derive(..)"),
        }
    }
}

impl FromIterator<(String, ComponentRef)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (String, ComponentRef)>>(iter: I) -> Self {
        Self::Merge(iter.into_iter().collect())
    }
}

/// Creates a new scope from `parent` and `overrides`.
///
/// Keys in a merge override replace same-named keys in `parent`; other
/// parent keys are retained. An empty merge returns a scope sharing the
/// parent's storage. `parent` is never modified.
#[must_use]
pub fn create_scope(parent: &Scope, overrides: &Overrides) -> Scope {
    match overrides {
        Overrides::Merge(map) if map.is_empty() => parent.clone(),
        Overrides::Merge(map) => {
            let mut entries = (*parent.entries).clone();
            entries.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
            tracing::debug!(
                parent = parent.len(),
                overrides = map.len(),
                "created merged component scope"
            );
            Scope {
                entries: Arc::new(entries),
            }
        }
        Overrides::Derive(f) => {
            let scope = f(parent);
            tracing::debug!(
                parent = parent.len(),
                derived = scope.len(),
                "created derived component scope"
            );
            scope
        }
    }
}
