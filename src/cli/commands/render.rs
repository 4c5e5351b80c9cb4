//! `render` command
//!
//! Loads a document, renders it against the installed registry and prints
//! HTML or the rendered tree as JSON.

use crate::cli::args::{RenderArgs, RenderFormat};
use crate::cli::commands::{load_registry, scope_from_args};
use crate::error::MdxError;
use crate::html::{HtmlOptions, to_html};
use crate::page::Document;
use crate::registry;
use crate::render::Renderer;

/// Render a document to stdout.
///
/// # Errors
///
/// Returns an error if the library or document fails to load, a scope
/// override is malformed, or rendering fails.
pub fn run(args: &RenderArgs) -> Result<(), MdxError> {
    registry::install(load_registry(args.components.as_deref())?)?;
    let renderer = Renderer::global();
    let scope = scope_from_args(&args.scope, &renderer)?;

    tracing::info!(document = %args.document.display(), "rendering document");
    let document = Document::load(&args.document)?;
    let tree = document.render(&renderer, &scope)?;

    match args.format {
        RenderFormat::Html => {
            let options = HtmlOptions {
                xhtml_style: args.xhtml,
            };
            println!("{}", to_html(&tree, &options));
        }
        RenderFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
    }
    Ok(())
}
