//! HTML serialization of rendered trees.

use serde_json::Value;

use crate::node::Attributes;
use crate::render::Rendered;
use crate::resolve::is_safe_name;

/// HTML output options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Write void elements as `<br />` instead of `<br>`.
    pub xhtml_style: bool,
}

/// Serializes a rendered tree to HTML.
///
/// Element names and attribute keys that would break out of the markup are
/// never written: such an element contributes only its children, such an
/// attribute is dropped.
#[must_use]
pub fn to_html(tree: &Rendered, options: &HtmlOptions) -> String {
    let mut writer = HtmlWriter::new(*options);
    writer.write(tree);
    writer.into_output()
}

/// Returns `true` for elements that never have a closing tag.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Maps React-style attribute names to their HTML spelling.
#[must_use]
pub fn html_attribute_name(name: &str) -> &str {
    match name {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

/// Escapes text content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
    out
}

/// Escapes an attribute value for use inside double quotes.
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '\n' => out.push_str("&#10;"),
            c => out.push(c),
        }
    }
    out
}

struct HtmlWriter {
    buffer: String,
    options: HtmlOptions,
}

impl HtmlWriter {
    const fn new(options: HtmlOptions) -> Self {
        Self {
            buffer: String::new(),
            options,
        }
    }

    fn write(&mut self, node: &Rendered) {
        match node {
            Rendered::Text { value } => self.buffer.push_str(&escape_text(value)),
            Rendered::Fragment { children } => {
                for child in children {
                    self.write(child);
                }
            }
            Rendered::Element {
                name,
                attributes,
                children,
            } => {
                if !is_safe_name(name) {
                    tracing::warn!(name = %name, "dropping element with unsafe name");
                    for child in children {
                        self.write(child);
                    }
                    return;
                }

                self.buffer.push('<');
                self.buffer.push_str(name);
                self.write_attributes(attributes);

                if is_void_element(name) && children.is_empty() {
                    self.buffer
                        .push_str(if self.options.xhtml_style { " />" } else { ">" });
                    return;
                }

                self.buffer.push('>');
                for child in children {
                    self.write(child);
                }
                self.buffer.push_str("</");
                self.buffer.push_str(name);
                self.buffer.push('>');
            }
        }
    }

    fn write_attributes(&mut self, attributes: &Attributes) {
        for (key, value) in attributes {
            if !is_safe_name(key) {
                tracing::warn!(key = %key, "dropping attribute with unsafe name");
                continue;
            }
            let rendered = match value {
                Value::Null | Value::Bool(false) => continue,
                Value::Bool(true) => None,
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                other @ (Value::Array(_) | Value::Object(_)) => Some(other.to_string()),
            };

            self.buffer.push(' ');
            self.buffer.push_str(html_attribute_name(key));
            if let Some(value) = rendered {
                self.buffer.push_str("=\"");
                self.buffer.push_str(&escape_attribute(&value));
                self.buffer.push('"');
            }
        }
    }

    fn into_output(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(pairs: &[(&str, Value)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn element_with_text() {
        let tree = Rendered::element("p", Attributes::new(), vec![Rendered::text("a < b & c")]);
        assert_eq!(to_html(&tree, &HtmlOptions::default()), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn class_name_maps_to_class() {
        let tree = Rendered::element(
            "code",
            attrs(&[("className", json!("language-yaml"))]),
            vec![Rendered::text("version: 1\n")],
        );
        assert_eq!(
            to_html(&tree, &HtmlOptions::default()),
            "<code class=\"language-yaml\">version: 1\n</code>"
        );
    }

    #[test]
    fn void_elements() {
        let tree = Rendered::element("br", Attributes::new(), Vec::new());
        assert_eq!(to_html(&tree, &HtmlOptions::default()), "<br>");
        assert_eq!(to_html(&tree, &HtmlOptions { xhtml_style: true }), "<br />");
    }

    #[test]
    fn fragment_writes_children_only() {
        let tree = Rendered::Fragment {
            children: vec![
                Rendered::element("hr", Attributes::new(), Vec::new()),
                Rendered::text("x"),
            ],
        };
        assert_eq!(to_html(&tree, &HtmlOptions::default()), "<hr>x");
    }

    #[test]
    fn attribute_value_kinds() {
        let tree = Rendered::element(
            "input",
            attrs(&[
                ("disabled", json!(true)),
                ("hidden", json!(false)),
                ("title", json!(null)),
                ("tabindex", json!(2)),
                ("data-list", json!([1, 2])),
                ("value", json!("say \"hi\"")),
            ]),
            Vec::new(),
        );
        assert_eq!(
            to_html(&tree, &HtmlOptions::default()),
            "<input disabled tabindex=\"2\" data-list=\"[1,2]\" value=\"say &quot;hi&quot;\">"
        );
    }

    #[test]
    fn unsafe_element_name_is_not_written() {
        let tree = Rendered::element(
            "x><script>alert(1)</script",
            Attributes::new(),
            vec![Rendered::text("hi")],
        );
        let html = to_html(&tree, &HtmlOptions::default());
        assert_eq!(html, "hi");
        assert!(!html.contains("<script"));
    }

    #[test]
    fn unsafe_attribute_key_is_dropped() {
        let tree = Rendered::element(
            "p",
            attrs(&[
                ("x\"><img src=x onerror=alert(1)", json!("1")),
                ("id", json!("intro")),
            ]),
            vec![Rendered::text("hi")],
        );
        let html = to_html(&tree, &HtmlOptions::default());
        assert_eq!(html, "<p id=\"intro\">hi</p>");
        assert!(!html.contains("<img"));
    }

    #[test]
    fn unsafe_tag_never_reaches_output() {
        use crate::error::RenderError;
        use crate::node::{Element, Node};
        use crate::registry::Registry;
        use crate::render::Renderer;
        use crate::scope::Scope;

        let registry = Registry::builtin();
        let node = Node::from(Element::new("x><script>alert(1)</script").child("hi"));
        let err = Renderer::new(&registry)
            .render(&node, &Scope::empty())
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidNode { ref path, .. } if path == "$"));
    }

    #[test]
    fn html_for_maps_to_for() {
        assert_eq!(html_attribute_name("htmlFor"), "for");
        assert_eq!(html_attribute_name("id"), "id");
    }
}
