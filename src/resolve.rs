//! Tag resolution.
//!
//! Precedence, highest first:
//! 1. the render scope (parent-qualified key, then plain key),
//! 2. the default registry (parent-qualified key, then plain key),
//! 3. pass-through markup with the tag's own name.
//!
//! Resolution is a pure function of the tag, the optional parent name, the
//! scope and the registry.

use std::fmt;

use crate::component::ComponentRef;
use crate::registry::Registry;
use crate::scope::Scope;

/// Where a registered component was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The render scope.
    Scope,
    /// The default registry.
    Registry,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scope => f.write_str("scope"),
            Self::Registry => f.write_str("registry"),
        }
    }
}

/// Outcome of resolving a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A registered implementation.
    Registered {
        /// Tier the component came from.
        source: Source,
        /// The key that matched (plain or `parent.tag`).
        key: String,
        /// The implementation.
        component: ComponentRef,
    },
    /// Nobody claims the tag; it renders as plain markup of the same name.
    PassThrough(String),
    /// The tag is not an identifier at all.
    Invalid {
        /// The offending tag
        tag: String,
        /// Why it was rejected
        reason: &'static str,
    },
}

impl Resolution {
    /// The resolved component, if registered.
    #[must_use]
    pub const fn component(&self) -> Option<&ComponentRef> {
        match self {
            Self::Registered { component, .. } => Some(component),
            Self::PassThrough(_) | Self::Invalid { .. } => None,
        }
    }

    /// Returns `true` for pass-through resolutions.
    #[must_use]
    pub const fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough(_))
    }
}

/// Characters that end or break out of a tag or attribute name in markup.
pub const MARKUP_DELIMITERS: [char; 7] = ['<', '>', '"', '\'', '=', '/', '&'];

/// Returns `true` if `name` can be written as an element or attribute name
/// without altering the surrounding markup.
#[must_use]
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || MARKUP_DELIMITERS.contains(&c))
}

/// Checks that `tag` can name a component or element.
///
/// # Errors
///
/// Returns a short reason when the tag is empty, contains whitespace, or
/// contains a reserved character.
pub fn validate_tag(tag: &str) -> Result<(), &'static str> {
    if tag.is_empty() {
        Err("missing tag")
    } else if tag.chars().any(char::is_whitespace) {
        Err("tag contains whitespace")
    } else if !is_safe_name(tag) {
        Err("tag contains a reserved character")
    } else {
        Ok(())
    }
}

/// Returns `true` if `tag` looks like plain structural markup: starts with a
/// lowercase ASCII letter, continues with lowercase letters, digits or `-`,
/// and has no namespace or member separator.
#[must_use]
pub fn is_markup_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// The `parent.tag` lookup key.
#[must_use]
pub fn qualified_key(parent: &str, tag: &str) -> String {
    format!("{parent}.{tag}")
}

/// Resolves `tag` with no parent information.
#[must_use]
pub fn resolve(registry: &Registry, tag: &str, scope: &Scope) -> Resolution {
    resolve_within(registry, tag, None, scope)
}

/// Resolves `tag` inside an element named `parent`.
#[must_use]
pub fn resolve_within(
    registry: &Registry,
    tag: &str,
    parent: Option<&str>,
    scope: &Scope,
) -> Resolution {
    if let Err(reason) = validate_tag(tag) {
        return Resolution::Invalid {
            tag: tag.to_string(),
            reason,
        };
    }

    let qualified = parent
        .filter(|p| !p.is_empty())
        .map(|p| qualified_key(p, tag));

    let keys: Vec<&str> = qualified
        .as_deref()
        .into_iter()
        .chain(std::iter::once(tag))
        .collect();

    let scoped = keys
        .iter()
        .find_map(|key| scope.get(key).map(|c| (Source::Scope, *key, c)));
    let found = scoped.or_else(|| {
        keys.iter()
            .find_map(|key| registry.get(key).map(|c| (Source::Registry, *key, c)))
    });

    if let Some((source, key, component)) = found {
        tracing::trace!(tag, key, %source, "resolved component");
        return Resolution::Registered {
            source,
            key: key.to_string(),
            component: component.clone(),
        };
    }

    if !is_markup_name(tag) {
        tracing::warn!(tag, "no component registered, rendering as plain markup");
    }
    Resolution::PassThrough(tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Overrides;

    #[test]
    fn markup_names() {
        assert!(is_markup_name("p"));
        assert!(is_markup_name("h1"));
        assert!(is_markup_name("unknown-x"));
        assert!(!is_markup_name("Callout"));
        assert!(!is_markup_name("svg:path"));
        assert!(!is_markup_name("ul.li"));
        assert!(!is_markup_name("1abc"));
        assert!(!is_markup_name(""));
    }

    #[test]
    fn invalid_tags() {
        let registry = Registry::builtin();
        let scope = Scope::empty();
        assert_eq!(
            resolve(&registry, "", &scope),
            Resolution::Invalid {
                tag: String::new(),
                reason: "missing tag"
            }
        );
        assert!(matches!(
            resolve(&registry, "two words", &scope),
            Resolution::Invalid { .. }
        ));
        for tag in ["x><script>alert(1)</script", "a\"b", "p/", "td=1", "a\u{0}b"] {
            assert!(
                matches!(
                    resolve(&registry, tag, &scope),
                    Resolution::Invalid { reason: "tag contains a reserved character", .. }
                ),
                "accepted {tag:?}"
            );
        }
    }

    #[test]
    fn safe_names() {
        for name in ["p", "ul.li", "svg:path", "data-id", "MDXProvider", "@click"] {
            assert!(is_safe_name(name), "rejected {name:?}");
        }
        for name in ["", "a b", "x>", "x\"", "x'", "x=", "x/", "a&b", "a\tb"] {
            assert!(!is_safe_name(name), "accepted {name:?}");
        }
    }

    #[test]
    fn scope_beats_registry() {
        let from_registry = ComponentRef::primitive("b");
        let from_scope = ComponentRef::primitive("strong");
        let registry = Registry::empty().with("bold", from_registry);
        let scope = Scope::empty().child(&Overrides::none().with("bold", from_scope.clone()));

        let resolution = resolve(&registry, "bold", &scope);
        assert_eq!(
            resolution,
            Resolution::Registered {
                source: Source::Scope,
                key: "bold".to_string(),
                component: from_scope,
            }
        );
    }

    #[test]
    fn registry_used_when_scope_misses() {
        let registry = Registry::builtin();
        let resolution = resolve(&registry, "inlineCode", &Scope::empty());
        assert_eq!(resolution.component(), registry.get("inlineCode"));
    }

    #[test]
    fn unknown_tags_pass_through() {
        let registry = Registry::builtin();
        assert_eq!(
            resolve(&registry, "unknown-x", &Scope::empty()),
            Resolution::PassThrough("unknown-x".to_string())
        );
        assert_eq!(
            resolve(&registry, "Callout", &Scope::empty()),
            Resolution::PassThrough("Callout".to_string())
        );
    }

    #[test]
    fn qualified_key_wins_within_tier() {
        let plain = ComponentRef::primitive("li");
        let in_list = ComponentRef::primitive("task");
        let scope = Scope::empty().child(
            &Overrides::none()
                .with("li", plain.clone())
                .with("ul.li", in_list.clone()),
        );
        let registry = Registry::empty();

        let inside = resolve_within(&registry, "li", Some("ul"), &scope);
        assert_eq!(inside.component(), Some(&in_list));

        let elsewhere = resolve_within(&registry, "li", Some("ol"), &scope);
        assert_eq!(elsewhere.component(), Some(&plain));
    }

    #[test]
    fn plain_scope_key_beats_qualified_registry_key() {
        let scoped = ComponentRef::primitive("li");
        let registered = ComponentRef::primitive("task");
        let scope = Scope::empty().child(&Overrides::none().with("li", scoped.clone()));
        let registry = Registry::empty().with("ul.li", registered);

        let resolution = resolve_within(&registry, "li", Some("ul"), &scope);
        assert_eq!(resolution.component(), Some(&scoped));
    }

    #[test]
    fn qualified_registry_key() {
        let registered = ComponentRef::primitive("task");
        let registry = Registry::empty().with("ul.li", registered.clone());
        let resolution = resolve_within(&registry, "li", Some("ul"), &Scope::empty());
        assert_eq!(
            resolution,
            Resolution::Registered {
                source: Source::Registry,
                key: "ul.li".to_string(),
                component: registered,
            }
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let registry = Registry::builtin();
        let overrides = Overrides::none().with("h1", ComponentRef::primitive("h2"));
        let scope = Scope::empty().child(&overrides);
        for tag in ["h1", "wrapper", "p", "Widget"] {
            assert_eq!(
                resolve(&registry, tag, &scope),
                resolve(&registry, tag, &scope)
            );
        }
    }
}
