//! Component library schema.
//!
//! ```yaml
//! components:
//!   bold:    { kind: alias, tag: strong }
//!   note:    { kind: decorate, tag: div, class: admonition, attributes: { role: note } }
//!   ul.li:   { kind: decorate, tag: li, class: task }
//!   Strong:  { kind: reference, target: bold }
//!   wrapper: { kind: fragment }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::node::Attributes;

/// A named set of component definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentLibrary {
    /// Definitions keyed by component name (or `parent.tag`).
    #[serde(default)]
    pub components: IndexMap<String, ComponentSpec>,
}

/// How a configured component renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentSpec {
    /// Render as another element.
    Alias {
        /// Element name to emit.
        tag: String,
    },

    /// Render children only.
    Fragment,

    /// Render as an element with default class and attributes.
    Decorate {
        /// Element name to emit.
        tag: String,
        /// Class added to every instance.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
        /// Default attributes; instance attributes win.
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        attributes: Attributes,
    },

    /// Share the implementation of another component.
    Reference {
        /// Name in this library or in the builtin registry.
        target: String,
    },
}

impl ComponentSpec {
    /// Short label for messages and listings.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Alias { .. } => "alias",
            Self::Fragment => "fragment",
            Self::Decorate { .. } => "decorate",
            Self::Reference { .. } => "reference",
        }
    }
}
