//! Content nodes: the input tree handed to the renderer.
//!
//! A node is either text or an element with a tag, an ordered attribute map
//! and children. Nodes deserialize from JSON or YAML: a string becomes text,
//! an object becomes an element.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute key carrying scoped component overrides.
pub const COMPONENTS_ATTR: &str = "components";

/// Attribute key naming the enclosing element for qualified lookup.
pub const PARENT_NAME_ATTR: &str = "parentName";

/// Attribute key written by MDX compilers with the requested component name.
pub const MDX_TYPE_ATTR: &str = "mdxType";

/// Attribute key written by MDX compilers with the original element type.
pub const ORIGINAL_TYPE_ATTR: &str = "originalType";

/// Attribute keys consumed by the renderer and never forwarded to components.
pub const RESERVED_ATTRS: [&str; 4] = [
    COMPONENTS_ATTR,
    PARENT_NAME_ATTR,
    MDX_TYPE_ATTR,
    ORIGINAL_TYPE_ATTR,
];

/// Ordered attribute map.
pub type Attributes = IndexMap<String, Value>;

/// One unit of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Literal text.
    Text(String),
    /// An element to be resolved against the component scope.
    Element(Element),
}

impl Node {
    /// Creates a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the element, if this node is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// An element node.
///
/// `tag` defaults to the empty string when absent so that a malformed node
/// survives deserialization and is reported with its location at render time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Tag or component name.
    #[serde(default)]
    pub tag: String,

    /// Attributes, in source order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: Attributes,

    /// Child nodes, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute, replacing any previous value under the same key.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Appends a child node.
    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Appends several child nodes.
    #[must_use]
    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Attaches scoped component overrides, making this node a scope provider.
    #[must_use]
    pub fn provide<I, K, V>(self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: serde_json::Map<String, Value> = overrides
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        self.attr(COMPONENTS_ATTR, Value::Object(map))
    }

    /// Returns `true` if this node introduces a nested component scope.
    #[must_use]
    pub fn is_scope_provider(&self) -> bool {
        self.attributes.contains_key(COMPONENTS_ATTR)
    }

    /// The explicit parent name hint, if present and a string.
    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.attributes.get(PARENT_NAME_ATTR).and_then(Value::as_str)
    }

    /// Attributes with reserved keys removed, as passed to components.
    #[must_use]
    pub fn props(&self) -> Attributes {
        self.attributes
            .iter()
            .filter(|(key, _)| !RESERVED_ATTRS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
