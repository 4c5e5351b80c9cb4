//! `resolve` command
//!
//! Reports which tier a tag resolves from and what it renders as.

use serde_json::json;

use crate::cli::args::{OutputFormat, ResolveArgs};
use crate::cli::commands::{load_registry, scope_from_args};
use crate::error::MdxError;
use crate::render::Renderer;
use crate::resolve::Resolution;

/// Resolve a single tag and print the outcome.
///
/// # Errors
///
/// Returns an error if the library fails to load, a scope override is
/// malformed, or the tag is not a valid identifier.
pub fn run(args: &ResolveArgs) -> Result<(), MdxError> {
    let registry = load_registry(args.components.as_deref())?;
    let renderer = Renderer::new(&registry);
    let scope = scope_from_args(&args.scope, &renderer)?;

    let resolution = renderer.resolve_within(&args.tag, args.parent.as_deref(), &scope);
    if let Resolution::Invalid { tag, reason } = &resolution {
        return Err(MdxError::Usage(format!("cannot resolve '{tag}': {reason}")));
    }

    match args.format {
        OutputFormat::Human => println!("{}", describe(&args.tag, &resolution)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&to_json(&args.tag, &resolution))?);
        }
    }
    Ok(())
}

/// One-line description of a resolution.
#[must_use]
pub fn describe(tag: &str, resolution: &Resolution) -> String {
    match resolution {
        Resolution::Registered {
            source,
            key,
            component,
        } => format!("{tag} -> {} ({source}: {key})", component.name()),
        Resolution::PassThrough(name) => format!("{tag} -> <{name}> (pass-through)"),
        Resolution::Invalid { reason, .. } => format!("{tag}: invalid ({reason})"),
    }
}

fn to_json(tag: &str, resolution: &Resolution) -> serde_json::Value {
    match resolution {
        Resolution::Registered {
            source,
            key,
            component,
        } => json!({
            "tag": tag,
            "resolution": "registered",
            "source": source.to_string(),
            "key": key,
            "component": component.name(),
        }),
        Resolution::PassThrough(name) => json!({
            "tag": tag,
            "resolution": "pass_through",
            "component": name,
        }),
        Resolution::Invalid { reason, .. } => json!({
            "tag": tag,
            "resolution": "invalid",
            "reason": reason,
        }),
    }
}
