//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod render;
pub mod resolve;
pub mod validate;
pub mod version;

use std::path::Path;

use crate::cli::args::{Cli, Commands};
use crate::config::ConfigLoader;
use crate::error::{ConfigError, MdxError};
use crate::node::Element;
use crate::registry::{PROVIDER, Registry};
use crate::render::Renderer;
use crate::scope::{Scope, create_scope};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), MdxError> {
    match cli.command {
        Commands::Render(args) => render::run(&args),
        Commands::Resolve(args) => resolve::run(&args),
        Commands::Validate(args) => validate::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Builds the default registry: builtins, extended by `library` if given.
///
/// # Errors
///
/// Returns a config error if the library fails to load.
pub fn load_registry(library: Option<&Path>) -> Result<Registry, MdxError> {
    let Some(path) = library else {
        return Ok(Registry::builtin());
    };

    tracing::info!(file = %path.display(), "loading component library");
    let result = ConfigLoader::with_defaults().load(path).inspect_err(|err| {
        if let ConfigError::ValidationError { errors, .. } = err {
            for issue in errors {
                tracing::error!(path = %issue.path, "{}", issue.message);
            }
        }
    })?;
    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    Ok(result.registry)
}

/// Splits a `NAME=TARGET` scope override.
///
/// # Errors
///
/// Returns a usage error when `=` is missing or either side is empty.
pub fn parse_scope_arg(spec: &str) -> Result<(&str, &str), MdxError> {
    match spec.split_once('=') {
        Some((name, target)) if !name.trim().is_empty() && !target.trim().is_empty() => {
            Ok((name.trim(), target.trim()))
        }
        _ => Err(MdxError::Usage(format!(
            "invalid scope override '{spec}', expected NAME=TARGET"
        ))),
    }
}

/// Builds the initial render scope from `--scope` overrides.
///
/// Targets resolve against the renderer's registry the same way a provider
/// element's `components` attribute does.
///
/// # Errors
///
/// Returns a usage error for malformed overrides.
pub fn scope_from_args(specs: &[String], renderer: &Renderer<'_>) -> Result<Scope, MdxError> {
    if specs.is_empty() {
        return Ok(Scope::empty());
    }

    let pairs = specs
        .iter()
        .map(|spec| parse_scope_arg(spec))
        .collect::<Result<Vec<_>, _>>()?;
    let provider = Element::new(PROVIDER).provide(pairs);
    let overrides = renderer
        .provider_overrides(&provider, &Scope::empty())
        .map_err(MdxError::Usage)?;
    Ok(create_scope(&Scope::empty(), &overrides))
}
