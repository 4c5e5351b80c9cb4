//! Rendering: walk a content tree, resolve each element, invoke components.
//!
//! The scope is passed down the traversal explicitly. A node carrying a
//! `components` attribute renders itself and its subtree under a child
//! scope; siblings and ancestors are unaffected.

use serde::Serialize;
use serde_json::Value;

use crate::component::ComponentRef;
use crate::error::RenderError;
use crate::node::{Attributes, COMPONENTS_ATTR, Element, Node};
use crate::registry::{self, Registry};
use crate::resolve::{self, Resolution};
use crate::scope::{Overrides, Scope, create_scope};

/// Default maximum element nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

// ============================================================================
// Output tree
// ============================================================================

/// Rendered output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendered {
    /// A concrete element.
    Element {
        /// Element name.
        name: String,
        /// Attributes, in order.
        #[serde(skip_serializing_if = "Attributes::is_empty")]
        attributes: Attributes,
        /// Rendered children.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<Rendered>,
    },
    /// Literal text.
    Text {
        /// The text.
        value: String,
    },
    /// Children with no enclosing element.
    Fragment {
        /// Rendered children.
        children: Vec<Rendered>,
    },
}

impl Rendered {
    /// Creates an element.
    pub fn element(name: impl Into<String>, attributes: Attributes, children: Vec<Self>) -> Self {
        Self::Element {
            name: name.into(),
            attributes,
            children,
        }
    }

    /// Creates a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Concatenated text of this subtree.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { value } => out.push_str(value),
            Self::Element { children, .. } | Self::Fragment { children } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Render limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum element nesting depth.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: std::env::var("MDX_COMPONENTS_MAX_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Renders content trees against a default registry.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'r> {
    registry: &'r Registry,
    options: RenderOptions,
}

impl Renderer<'static> {
    /// A renderer using the process-wide registry.
    #[must_use]
    pub fn global() -> Self {
        Renderer::new(registry::global())
    }
}

impl<'r> Renderer<'r> {
    /// Creates a renderer over `registry` with default options.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            options: RenderOptions::default(),
        }
    }

    /// Replaces the render options.
    #[must_use]
    pub const fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// The registry this renderer resolves against.
    #[must_use]
    pub const fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Resolves `tag` against `scope` and the registry.
    #[must_use]
    pub fn resolve(&self, tag: &str, scope: &Scope) -> Resolution {
        resolve::resolve(self.registry, tag, scope)
    }

    /// Resolves `tag` inside an element named `parent`.
    #[must_use]
    pub fn resolve_within(&self, tag: &str, parent: Option<&str>, scope: &Scope) -> Resolution {
        resolve::resolve_within(self.registry, tag, parent, scope)
    }

    /// Renders one node.
    ///
    /// # Errors
    ///
    /// Aborts on the first malformed node, on excessive nesting, or when a
    /// component fails.
    pub fn render(&self, node: &Node, scope: &Scope) -> Result<Rendered, RenderError> {
        let mut path = NodePath::root();
        self.render_node(node, scope, None, &mut path, 0)
    }

    /// Renders a sequence of sibling nodes into a fragment.
    ///
    /// # Errors
    ///
    /// Same as [`Renderer::render`].
    pub fn render_all(&self, nodes: &[Node], scope: &Scope) -> Result<Rendered, RenderError> {
        let mut path = NodePath::root();
        let children = self.render_children(nodes, scope, None, &mut path, 0)?;
        Ok(Rendered::Fragment { children })
    }

    /// Builds the overrides a scope-provider element introduces.
    ///
    /// Each target name is resolved against `scope`, the scope enclosing the
    /// provider: a registered name yields that component, anything else a
    /// primitive with the target's name.
    ///
    /// # Errors
    ///
    /// Returns the reason the node is invalid if `components` is not an
    /// object of non-empty string targets.
    pub fn provider_overrides(
        &self,
        element: &Element,
        scope: &Scope,
    ) -> Result<Overrides, String> {
        let Some(value) = element.attributes.get(COMPONENTS_ATTR) else {
            return Ok(Overrides::none());
        };
        let Value::Object(map) = value else {
            return Err(format!("'{COMPONENTS_ATTR}' must be an object, got {value}"));
        };

        let mut overrides = Overrides::none();
        for (key, target) in map {
            if let Err(reason) = resolve::validate_tag(key) {
                return Err(format!("override key '{key}': {reason}"));
            }
            let Some(target) = target.as_str() else {
                return Err(format!("override '{key}' must name a component, got {target}"));
            };
            let component = match self.resolve(target, scope) {
                Resolution::Registered { component, .. } => component,
                Resolution::PassThrough(name) => ComponentRef::primitive(name),
                Resolution::Invalid { reason, .. } => {
                    return Err(format!("override '{key}': {reason}"));
                }
            };
            overrides = overrides.with(key.clone(), component);
        }
        Ok(overrides)
    }

    fn render_children(
        &self,
        nodes: &[Node],
        scope: &Scope,
        parent: Option<&str>,
        path: &mut NodePath,
        depth: usize,
    ) -> Result<Vec<Rendered>, RenderError> {
        let mut rendered = Vec::with_capacity(nodes.len());
        for (index, child) in nodes.iter().enumerate() {
            path.push(index);
            let result = self.render_node(child, scope, parent, path, depth);
            path.pop();
            rendered.push(result?);
        }
        Ok(rendered)
    }

    fn render_node(
        &self,
        node: &Node,
        scope: &Scope,
        enclosing: Option<&str>,
        path: &mut NodePath,
        depth: usize,
    ) -> Result<Rendered, RenderError> {
        let element = match node {
            Node::Text(value) => return Ok(Rendered::text(value.clone())),
            Node::Element(element) => element,
        };

        if depth >= self.options.max_depth {
            return Err(RenderError::DepthExceeded {
                path: path.to_string(),
                limit: self.options.max_depth,
            });
        }

        if let Err(reason) = resolve::validate_tag(&element.tag) {
            return Err(RenderError::invalid_node(path.to_string(), reason));
        }

        let nested;
        let scope = if element.is_scope_provider() {
            let overrides = self
                .provider_overrides(element, scope)
                .map_err(|reason| RenderError::invalid_node(path.to_string(), reason))?;
            nested = create_scope(scope, &overrides);
            &nested
        } else {
            scope
        };

        let parent = element.parent_name().or(enclosing);
        let resolution = self.resolve_within(&element.tag, parent, scope);
        let children =
            self.render_children(&element.children, scope, Some(&element.tag), path, depth + 1)?;
        let props = element.props();

        match resolution {
            Resolution::Registered { component, .. } => component.render(props, children),
            Resolution::PassThrough(name) => Ok(Rendered::element(name, props, children)),
            Resolution::Invalid { reason, .. } => {
                Err(RenderError::invalid_node(path.to_string(), reason))
            }
        }
    }
}

/// Resolves `tag` against `scope` and the process-wide registry.
#[must_use]
pub fn resolve(tag: &str, scope: &Scope) -> Resolution {
    Renderer::global().resolve(tag, scope)
}

/// Renders `node` against `scope` and the process-wide registry.
///
/// # Errors
///
/// See [`Renderer::render`].
pub fn render(node: &Node, scope: &Scope) -> Result<Rendered, RenderError> {
    Renderer::global().render(node, scope)
}

// ============================================================================
// Node paths
// ============================================================================

/// Location of a node in the tree, printed as `$.children[0].children[2]`.
#[derive(Debug, Default)]
struct NodePath {
    indices: Vec<usize>,
}

impl NodePath {
    const fn root() -> Self {
        Self {
            indices: Vec::new(),
        }
    }

    fn push(&mut self, index: usize) {
        self.indices.push(index);
    }

    fn pop(&mut self) {
        self.indices.pop();
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("$")?;
        for index in &self.indices {
            write!(f, ".children[{index}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PARENT_NAME_ATTR;
    use serde_json::json;

    fn bold_registry() -> (Registry, ComponentRef) {
        let bold = ComponentRef::from_fn("B", |props, children| {
            Ok(Rendered::element("b", props, children))
        });
        (Registry::builtin().with("bold", bold.clone()), bold)
    }

    #[test]
    fn registered_component_receives_rendered_children() {
        let (registry, _) = bold_registry();
        let node = Node::from(Element::new("bold").child("hi"));
        let rendered = Renderer::new(&registry).render(&node, &Scope::empty()).unwrap();
        assert_eq!(
            rendered,
            Rendered::element("b", Attributes::new(), vec![Rendered::text("hi")])
        );
    }

    #[test]
    fn unknown_tag_passes_through() {
        let (registry, _) = bold_registry();
        let node = Node::from(Element::new("unknown-x"));
        let rendered = Renderer::new(&registry).render(&node, &Scope::empty()).unwrap();
        assert_eq!(rendered, Rendered::element("unknown-x", Attributes::new(), Vec::new()));
    }

    #[test]
    fn missing_tag_is_invalid_with_path() {
        let registry = Registry::builtin();
        let node = Node::from(
            Element::new("div")
                .child("ok")
                .child(Element::new("p").child(Element::default())),
        );
        let err = Renderer::new(&registry)
            .render(&node, &Scope::empty())
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::InvalidNode {
                path: "$.children[1].children[0]".to_string(),
                reason: "missing tag".to_string(),
            }
        );
    }

    #[test]
    fn provider_scopes_its_subtree_only() {
        let registry = Registry::builtin();
        let node = Node::from(
            Element::new("div")
                .child(
                    Element::new("section")
                        .provide([("h1", "h2")])
                        .child(Element::new("h1").child("inner")),
                )
                .child(Element::new("h1").child("outer")),
        );

        let rendered = Renderer::new(&registry).render(&node, &Scope::empty()).unwrap();
        let Rendered::Element { children, .. } = rendered else {
            panic!("expected element");
        };
        let Rendered::Element { children: section, .. } = &children[0] else {
            panic!("expected section");
        };
        assert!(matches!(&section[0], Rendered::Element { name, .. } if name == "h2"));
        assert!(matches!(&children[1], Rendered::Element { name, .. } if name == "h1"));
    }

    #[test]
    fn provider_targets_resolve_against_enclosing_scope() {
        let (registry, _) = bold_registry();
        let node = Node::from(
            Element::new("MDXProvider")
                .provide([("strong", "bold")])
                .child(Element::new("strong").child("x")),
        );
        let rendered = Renderer::new(&registry).render(&node, &Scope::empty()).unwrap();
        assert_eq!(
            rendered,
            Rendered::Fragment {
                children: vec![Rendered::element(
                    "b",
                    Attributes::new(),
                    vec![Rendered::text("x")]
                )]
            }
        );
    }

    #[test]
    fn provider_own_tag_uses_new_scope() {
        let registry = Registry::builtin();
        let node = Node::from(Element::new("aside").provide([("aside", "section")]));
        let rendered = Renderer::new(&registry).render(&node, &Scope::empty()).unwrap();
        assert!(matches!(rendered, Rendered::Element { ref name, .. } if name == "section"));
    }

    #[test]
    fn provider_component_receives_scope_not_components_prop() {
        let card = ComponentRef::from_fn("Card", |props, children| {
            Ok(Rendered::element("section", props, children))
        });
        let registry = Registry::builtin().with("Card", card);
        let node = Node::from(
            Element::new("Card")
                .attr("id", "intro")
                .provide([("h1", "h3")])
                .child(Element::new("h1").child("t")),
        );
        let rendered = Renderer::new(&registry).render(&node, &Scope::empty()).unwrap();
        let Rendered::Element { attributes, children, .. } = rendered else {
            panic!("expected element");
        };
        assert!(!attributes.contains_key(COMPONENTS_ATTR));
        assert_eq!(attributes["id"], json!("intro"));
        assert!(matches!(&children[0], Rendered::Element { name, .. } if name == "h3"));
    }

    #[test]
    fn malformed_components_attribute_is_invalid() {
        let registry = Registry::builtin();
        for bad in [json!("h2"), json!({ "h1": 2 }), json!({ "h1": "" })] {
            let node = Node::from(Element::new("div").attr(COMPONENTS_ATTR, bad));
            let err = Renderer::new(&registry)
                .render(&node, &Scope::empty())
                .unwrap_err();
            assert!(matches!(err, RenderError::InvalidNode { ref path, .. } if path == "$"));
        }
    }

    #[test]
    fn parent_name_attribute_drives_qualified_lookup() {
        let registry = Registry::builtin().with("pre.code", ComponentRef::primitive("codeblock"));
        let node = Node::from(
            Element::new("pre").child(
                Element::new("code")
                    .attr(PARENT_NAME_ATTR, "pre")
                    .attr("className", "language-shell")
                    .child("ls\n"),
            ),
        );
        let rendered = Renderer::new(&registry).render(&node, &Scope::empty()).unwrap();
        let Rendered::Element { children, .. } = rendered else {
            panic!("expected element");
        };
        let Rendered::Element { name, attributes, .. } = &children[0] else {
            panic!("expected element");
        };
        assert_eq!(name, "codeblock");
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes["className"], json!("language-shell"));
    }

    #[test]
    fn enclosing_tag_is_default_parent() {
        let registry = Registry::builtin().with("ul.li", ComponentRef::primitive("task"));
        let node = Node::from(
            Element::new("div")
                .child(Element::new("ul").child(Element::new("li")))
                .child(Element::new("ol").child(Element::new("li"))),
        );
        let rendered = Renderer::new(&registry).render(&node, &Scope::empty()).unwrap();
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["children"][0]["children"][0]["name"], json!("task"));
        assert_eq!(json["children"][1]["children"][0]["name"], json!("li"));
    }

    #[test]
    fn inline_code_renders_as_code() {
        let registry = Registry::builtin();
        let node = Node::from(Element::new("inlineCode").child("dsn"));
        let rendered = Renderer::new(&registry).render(&node, &Scope::empty()).unwrap();
        assert_eq!(
            rendered,
            Rendered::element("code", Attributes::new(), vec![Rendered::text("dsn")])
        );
    }

    #[test]
    fn depth_limit_aborts() {
        let registry = Registry::builtin();
        let mut node = Element::new("span");
        for _ in 0..10 {
            node = Element::new("span").child(node);
        }
        let renderer = Renderer::new(&registry).with_options(RenderOptions { max_depth: 5 });
        let err = renderer.render(&Node::from(node), &Scope::empty()).unwrap_err();
        assert!(matches!(err, RenderError::DepthExceeded { limit: 5, .. }));
    }

    #[test]
    fn component_errors_propagate() {
        let failing = ComponentRef::from_fn("Broken", |_, _| {
            Err(RenderError::component("Broken", "no"))
        });
        let registry = Registry::builtin().with("Broken", failing);
        let node = Node::from(Element::new("div").child(Element::new("Broken")));
        let err = Renderer::new(&registry)
            .render(&node, &Scope::empty())
            .unwrap_err();
        assert_eq!(err, RenderError::component("Broken", "no"));
    }

    #[test]
    fn render_all_wraps_siblings() {
        let registry = Registry::builtin();
        let nodes = vec![Node::text("a"), Node::from(Element::new("hr"))];
        let rendered = Renderer::new(&registry)
            .render_all(&nodes, &Scope::empty())
            .unwrap();
        assert_eq!(
            rendered,
            Rendered::Fragment {
                children: vec![
                    Rendered::text("a"),
                    Rendered::element("hr", Attributes::new(), Vec::new())
                ]
            }
        );
    }

    #[test]
    fn global_functions_use_builtin_registry() {
        let resolution = resolve("inlineCode", &Scope::empty());
        assert_eq!(resolution.component(), registry::global().get("inlineCode"));
        assert!(resolve("article", &Scope::empty()).is_pass_through());

        let overrides = Overrides::none().with("h1", ComponentRef::primitive("h2"));
        let scope = Scope::empty().child(&overrides);
        let node = Node::from(
            Element::new("div")
                .child(Element::new("inlineCode").child("dsn"))
                .child(Element::new("h1").child("title")),
        );
        let rendered = render(&node, &scope).unwrap();
        assert_eq!(
            rendered,
            Rendered::element(
                "div",
                Attributes::new(),
                vec![
                    Rendered::element("code", Attributes::new(), vec![Rendered::text("dsn")]),
                    Rendered::element("h2", Attributes::new(), vec![Rendered::text("title")]),
                ]
            )
        );
        assert!(matches!(
            render(&Node::from(Element::default()), &Scope::empty()),
            Err(RenderError::InvalidNode { .. })
        ));
    }

    #[test]
    fn rendered_serializes_with_kind() {
        let value = serde_json::to_value(Rendered::element(
            "p",
            Attributes::new(),
            vec![Rendered::text("x")],
        ))
        .unwrap();
        assert_eq!(
            value,
            json!({ "kind": "element", "name": "p", "children": [{ "kind": "text", "value": "x" }] })
        );
    }

    #[test]
    fn text_content_concatenates() {
        let tree = Rendered::Fragment {
            children: vec![
                Rendered::text("a"),
                Rendered::element("b", Attributes::new(), vec![Rendered::text("c")]),
            ],
        };
        assert_eq!(tree.text_content(), "ac");
    }
}
