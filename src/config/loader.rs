//! Component library loader.
//!
//! Loading runs in stages:
//! 1. Size check and read (UTF-8 BOM stripped)
//! 2. Environment variable expansion on the raw text
//! 3. YAML parsing and typed deserialization
//! 4. Validation
//! 5. Registry construction, resolving `reference` entries

use std::collections::HashMap;
use std::path::Path;

use serde_yaml::Value;

use crate::component::{ComponentRef, Decorate, Primitive};
use crate::config::schema::{ComponentLibrary, ComponentSpec};
use crate::config::validation::Validator;
use crate::error::ConfigError;
use crate::registry::Registry;

// ============================================================================
// Public API
// ============================================================================

/// Options for the library loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Registry the configured components are layered onto.
    pub base: Registry,

    /// Size limits.
    pub config_limits: ConfigLimits,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            base: Registry::builtin(),
            config_limits: ConfigLimits::default(),
        }
    }
}

/// Limits on library size.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of component definitions.
    pub max_components: usize,

    /// Maximum library file size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_components: env_or("MDX_COMPONENTS_MAX_COMPONENTS", 1000),
            max_config_size: env_or("MDX_COMPONENTS_MAX_CONFIG_SIZE", 10 * 1024 * 1024),
        }
    }
}

/// Result of loading a component library.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed library.
    pub library: ComponentLibrary,

    /// Base registry extended with the library's components.
    pub registry: Registry,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during library loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Component library loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a loader over the builtin registry with default limits.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a library file and builds its registry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is missing or larger than the size limit
    /// - A required environment variable is unset
    /// - YAML parsing fails
    /// - Validation fails
    /// - `reference` entries form a cycle
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let max_size = self.options.config_limits.max_config_size;
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > max_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {max_size} bytes"),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        self.load_str(raw.strip_prefix('\u{feff}').unwrap_or(&raw), path)
    }

    /// Loads a library from text; `path` is used for error messages.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load`], minus file access.
    pub fn load_str(&self, content: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let expanded = expand_env(content, path, &mut warnings)?;

        let root: Value = serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;
        if root.is_null() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "component library is empty".to_string(),
            });
        }

        let library: ComponentLibrary =
            serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: format!("failed to deserialize component library: {e}"),
            })?;

        let result = Validator::new(&self.options.base)
            .validate(&library, &self.options.config_limits);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: result.errors,
            });
        }
        warnings.extend(result.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        let registry = build_registry(&library, &self.options.base)?;
        tracing::debug!(
            path = %path.display(),
            components = library.components.len(),
            warnings = warnings.len(),
            "loaded component library"
        );

        Ok(LoadResult {
            library,
            registry,
            warnings,
        })
    }
}

// ============================================================================
// Registry Construction
// ============================================================================

/// Builds `base` extended with every component in `library`.
///
/// A `reference` entry shares the target's implementation, so both names
/// resolve to the same [`ComponentRef`]. Targets are looked up in the
/// library first, then in `base`.
///
/// # Errors
///
/// Returns `CircularReference` if references form a cycle, or
/// `InvalidValue` if a target exists nowhere.
pub fn build_registry(
    library: &ComponentLibrary,
    base: &Registry,
) -> Result<Registry, ConfigError> {
    let mut builder = RegistryBuilder {
        library,
        base,
        built: HashMap::new(),
        chain: Vec::new(),
    };
    for name in library.components.keys() {
        builder.build(name)?;
    }

    let mut registry = base.clone();
    for (name, component) in builder.built {
        registry.insert(name, component);
    }
    Ok(registry)
}

struct RegistryBuilder<'l> {
    library: &'l ComponentLibrary,
    base: &'l Registry,
    built: HashMap<&'l str, ComponentRef>,
    chain: Vec<&'l str>,
}

impl<'l> RegistryBuilder<'l> {
    fn build(&mut self, name: &'l str) -> Result<ComponentRef, ConfigError> {
        if let Some(component) = self.built.get(name) {
            return Ok(component.clone());
        }

        if let Some(start) = self.chain.iter().position(|n| *n == name) {
            let mut cycle: Vec<String> = self.chain[start..]
                .iter()
                .map(|n| (*n).to_string())
                .collect();
            cycle.push(name.to_string());
            return Err(ConfigError::CircularReference { cycle });
        }

        let Some((key, spec)) = self.library.components.get_key_value(name) else {
            return self
                .base
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::InvalidValue {
                    field: "target".to_string(),
                    value: name.to_string(),
                    expected: "a defined component".to_string(),
                });
        };

        let component = match spec {
            ComponentSpec::Alias { tag } => ComponentRef::new(key, Primitive::new(tag.as_str())),
            ComponentSpec::Fragment => ComponentRef::fragment(key),
            ComponentSpec::Decorate {
                tag,
                class,
                attributes,
            } => {
                let mut decorate = Decorate::new(tag.as_str());
                if let Some(class) = class {
                    decorate = decorate.with_class(class.as_str());
                }
                for (attr, value) in attributes {
                    decorate = decorate.with_attribute(attr.as_str(), value.clone());
                }
                ComponentRef::new(key, decorate)
            }
            ComponentSpec::Reference { target } => {
                self.chain.push(key);
                let target = self.build(target);
                self.chain.pop();
                target?
            }
        };

        self.built.insert(key, component.clone());
        Ok(component)
    }
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expands environment references in raw YAML text before parsing.
///
/// Supports:
/// - `${VAR}` - value, or empty string with a warning if unset
/// - `${VAR:-default}` - default if unset
/// - `${VAR:?message}` - error if unset
/// - `$$` - literal `$`
fn expand_env(
    raw: &str,
    path: &Path,
    warnings: &mut Vec<LoadWarning>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(body) = after.strip_prefix('{') {
            let offset = raw.len() - rest.len() + pos;
            let end = closing_brace(body).ok_or_else(|| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: Some(line_at(raw, offset)),
                message: "unclosed environment variable reference".to_string(),
            })?;
            out.push_str(&expand_var(&body[..end], path, line_at(raw, offset), warnings)?);
            rest = &body[end + 1..];
        } else {
            out.push('$');
            rest = after;
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn expand_var(
    expr: &str,
    path: &Path,
    line: usize,
    warnings: &mut Vec<LoadWarning>,
) -> Result<String, ConfigError> {
    let operator = [expr.find(":-"), expr.find(":?")].into_iter().flatten().min();
    let (name, operator) = match operator {
        Some(i) => (&expr[..i], Some((&expr[i + 1..i + 2], &expr[i + 2..]))),
        None => (expr, None),
    };

    if name.is_empty() {
        return Err(ConfigError::ParseError {
            path: path.to_path_buf(),
            line: Some(line),
            message: format!("empty environment variable name in '${{{expr}}}'"),
        });
    }

    if let Ok(value) = std::env::var(name) {
        return Ok(value);
    }

    match operator {
        Some(("-", default)) => Ok(default.to_string()),
        Some((_, message)) => Err(ConfigError::EnvVarNotSet {
            var: name.to_string(),
            message: message.to_string(),
        }),
        None => {
            warnings.push(LoadWarning {
                message: format!("environment variable '{name}' is not set, using empty string"),
                location: Some(format!("{}:{line}", path.display())),
            });
            Ok(String::new())
        }
    }
}

/// Byte index of the `}` closing an already-opened `${`, allowing nested braces.
fn closing_brace(body: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn line_at(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// Reads an environment variable, falling back to `default` if unset or unparsable.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
