//! `mdx-components` - component resolution for MDX content trees
//!
//! Renders MDX-style content trees by mapping each element's tag to a
//! renderable component. Tags resolve against the current render scope,
//! then the default registry, and otherwise pass through as plain markup.
//! Subtrees override components through scopes without touching the
//! registry.
//!
//! ```
//! use mdx_components::{ComponentRef, Element, Node, Overrides, Registry, Renderer, Scope};
//!
//! let registry = Registry::builtin().with("bold", ComponentRef::primitive("strong"));
//! let renderer = Renderer::new(&registry);
//! let node: Node = Element::new("bold").child("hi").into();
//!
//! let out = renderer.render(&node, &Scope::empty()).unwrap();
//! assert_eq!(mdx_components::to_html(&out, &Default::default()), "<strong>hi</strong>");
//!
//! let scope = Scope::empty().child(&Overrides::none().with("bold", ComponentRef::primitive("b")));
//! let out = renderer.render(&node, &scope).unwrap();
//! assert_eq!(mdx_components::to_html(&out, &Default::default()), "<b>hi</b>");
//! ```

pub mod cli;
pub mod component;
pub mod config;
pub mod error;
pub mod html;
pub mod node;
pub mod observability;
pub mod page;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod scope;

pub use component::{Component, ComponentRef};
pub use error::{ConfigError, MdxError, RegistryError, RenderError};
pub use html::{HtmlOptions, to_html};
pub use node::{Attributes, Element, Node};
pub use page::{Document, Page};
pub use registry::Registry;
pub use render::{RenderOptions, Rendered, Renderer, render, resolve};
pub use resolve::{Resolution, Source};
pub use scope::{Overrides, Scope, create_scope};
