//! Page envelope for compiled MDX documents.
//!
//! A page carries front matter, a table of contents and a body. Rendering a
//! page wraps the body in a `wrapper` element tagged as the MDX layout, so a
//! host replaces the page layout by overriding `wrapper`.

use std::path::Path;

use chrono::DateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{MdxError, RenderError};
use crate::node::{Element, MDX_TYPE_ATTR, Node};
use crate::registry::WRAPPER;
use crate::render::{Rendered, Renderer};
use crate::scope::Scope;

/// `mdxType` value marking the layout wrapper.
pub const LAYOUT_TYPE: &str = "MDXLayout";

/// Page front matter. Unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Page identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Any other front matter keys.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading text.
    pub value: String,
    /// Anchor id.
    pub id: String,
    /// Heading level.
    pub level: u8,
    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    fn to_value(&self) -> Value {
        let children: Vec<Value> = self.children.iter().map(Self::to_value).collect();
        json!({
            "value": self.value,
            "id": self.id,
            "level": self.level,
            "children": children,
        })
    }
}

/// A compiled page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Front matter.
    #[serde(default, alias = "frontMatter")]
    pub front_matter: FrontMatter,

    /// Title taken from the first heading, if any.
    #[serde(default, alias = "contentTitle", skip_serializing_if = "Option::is_none")]
    pub content_title: Option<String>,

    /// Table of contents.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toc: Vec<TocEntry>,

    /// Last update as seconds since the Unix epoch.
    #[serde(default, alias = "lastUpdatedAt", skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<i64>,

    /// Page content.
    pub body: Vec<Node>,
}

impl Page {
    /// Display title: the content title, else the front matter title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.content_title
            .as_deref()
            .or(self.front_matter.title.as_deref())
    }

    /// Last update formatted as `M/D/YYYY` (UTC).
    #[must_use]
    pub fn formatted_last_updated(&self) -> Option<String> {
        let timestamp = self.last_updated_at?;
        DateTime::from_timestamp(timestamp, 0).map(|dt| dt.format("%-m/%-d/%Y").to_string())
    }

    /// The content tree: the body inside the layout wrapper.
    #[must_use]
    pub fn to_node(&self) -> Node {
        let toc: Vec<Value> = self.toc.iter().map(TocEntry::to_value).collect();
        Element::new(WRAPPER)
            .attr("toc", Value::Array(toc))
            .attr(MDX_TYPE_ATTR, LAYOUT_TYPE)
            .children(self.body.iter().cloned())
            .into()
    }

    /// Renders the page.
    ///
    /// # Errors
    ///
    /// See [`Renderer::render`].
    pub fn render(&self, renderer: &Renderer<'_>, scope: &Scope) -> Result<Rendered, RenderError> {
        tracing::debug!(
            id = self.front_matter.id.as_deref().unwrap_or("<none>"),
            nodes = self.body.len(),
            "rendering page"
        );
        renderer.render(&self.to_node(), scope)
    }
}

/// A renderable input document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Document {
    /// A full page with a `body`.
    Page(Page),
    /// Sibling nodes.
    Nodes(Vec<Node>),
    /// A single node.
    Node(Node),
}

impl Document {
    /// Parses a document, as YAML when `path` ends in `.yaml`/`.yml`,
    /// otherwise as JSON.
    ///
    /// # Errors
    ///
    /// Returns a JSON or YAML error if the content does not parse.
    pub fn parse(content: &str, path: &Path) -> Result<Self, MdxError> {
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        if is_yaml {
            Ok(serde_yaml::from_str(content)?)
        } else {
            Ok(serde_json::from_str(content)?)
        }
    }

    /// Reads and parses a document file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a parse error.
    pub fn load(path: &Path) -> Result<Self, MdxError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(content.strip_prefix('\u{feff}').unwrap_or(&content), path)
    }

    /// Renders the document.
    ///
    /// # Errors
    ///
    /// See [`Renderer::render`].
    pub fn render(&self, renderer: &Renderer<'_>, scope: &Scope) -> Result<Rendered, RenderError> {
        match self {
            Self::Page(page) => page.render(renderer, scope),
            Self::Nodes(nodes) => renderer.render_all(nodes, scope),
            Self::Node(node) => renderer.render(node, scope),
        }
    }
}
