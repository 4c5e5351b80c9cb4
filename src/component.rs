//! Renderable components and the built-in implementations.
//!
//! A component receives an element's props (attributes without reserved
//! keys) and its already-rendered children, and produces a rendered tree.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::RenderError;
use crate::node::Attributes;
use crate::render::Rendered;

/// A renderable implementation.
pub trait Component: fmt::Debug + Send + Sync {
    /// Renders the component with the given props and rendered children.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Component` if the implementation cannot render
    /// with the given input.
    fn render(&self, props: Attributes, children: Vec<Rendered>) -> Result<Rendered, RenderError>;
}

// ============================================================================
// ComponentRef
// ============================================================================

/// Shared reference to a component implementation.
///
/// Two references are equal when they point at the same implementation,
/// regardless of the name they are registered under.
#[derive(Clone)]
pub struct ComponentRef {
    name: Arc<str>,
    inner: Arc<dyn Component>,
}

impl ComponentRef {
    /// Wraps a component implementation.
    pub fn new(name: impl AsRef<str>, component: impl Component + 'static) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            inner: Arc::new(component),
        }
    }

    /// Wraps a closure as a component.
    pub fn from_fn<F>(name: impl AsRef<str>, f: F) -> Self
    where
        F: Fn(Attributes, Vec<Rendered>) -> Result<Rendered, RenderError> + Send + Sync + 'static,
    {
        Self::new(name, FnComponent(f))
    }

    /// A pass-through component emitting an element named `tag`.
    pub fn primitive(tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref();
        Self::new(tag, Primitive::new(tag))
    }

    /// A component emitting only its children.
    pub fn fragment(name: impl AsRef<str>) -> Self {
        Self::new(name, Fragment)
    }

    /// The name this reference was created with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if both references share one implementation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Invokes the component.
    ///
    /// # Errors
    ///
    /// Propagates the component's own error.
    pub fn render(
        &self,
        props: Attributes,
        children: Vec<Rendered>,
    ) -> Result<Rendered, RenderError> {
        self.inner.render(props, children)
    }
}

impl PartialEq for ComponentRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ComponentRef {}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("name", &self.name)
            .field("component", &self.inner)
            .finish()
    }
}

// ============================================================================
// Built-in components
// ============================================================================

/// Emits an element with a fixed name, forwarding props and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primitive {
    tag: String,
}

impl Primitive {
    /// Creates a primitive emitting `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// The emitted element name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Component for Primitive {
    fn render(&self, props: Attributes, children: Vec<Rendered>) -> Result<Rendered, RenderError> {
        Ok(Rendered::element(self.tag.clone(), props, children))
    }
}

/// Emits its children with no enclosing element. Props are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment;

impl Component for Fragment {
    fn render(&self, _props: Attributes, children: Vec<Rendered>) -> Result<Rendered, RenderError> {
        Ok(Rendered::Fragment { children })
    }
}

/// Emits an element with default attributes.
///
/// Instance props override the defaults, except `class`/`className`, whose
/// values are appended to the configured class.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorate {
    tag: String,
    class: Option<String>,
    attributes: Attributes,
}

impl Decorate {
    /// Creates a decorating component emitting `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
            attributes: Attributes::new(),
        }
    }

    /// Sets the class added to every emitted element.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Adds a default attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl Component for Decorate {
    fn render(&self, props: Attributes, children: Vec<Rendered>) -> Result<Rendered, RenderError> {
        let mut attributes = self.attributes.clone();
        let mut classes: Vec<String> = self.class.iter().cloned().collect();

        for (key, value) in props {
            if key == "class" || key == "className" {
                match value {
                    Value::String(class) if !class.is_empty() => classes.push(class),
                    Value::String(_) | Value::Null => {}
                    other => {
                        return Err(RenderError::component(
                            &self.tag,
                            format!("{key} must be a string, got {other}"),
                        ));
                    }
                }
            } else {
                attributes.insert(key, value);
            }
        }

        if !classes.is_empty() {
            attributes.insert("className".to_string(), Value::String(classes.join(" ")));
        }

        Ok(Rendered::element(self.tag.clone(), attributes, children))
    }
}

/// Adapter turning a closure into a component.
pub struct FnComponent<F>(pub F);

impl<F> fmt::Debug for FnComponent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnComponent")
    }
}

impl<F> Component for FnComponent<F>
where
    F: Fn(Attributes, Vec<Rendered>) -> Result<Rendered, RenderError> + Send + Sync,
{
    fn render(&self, props: Attributes, children: Vec<Rendered>) -> Result<Rendered, RenderError> {
        (self.0)(props, children)
    }
}
