//! Component library validation.
//!
//! Collects every issue instead of stopping at the first, so one run of
//! `validate` reports everything wrong with a library.

use crate::config::loader::ConfigLimits;
use crate::config::schema::{ComponentLibrary, ComponentSpec};
use crate::error::{Severity, ValidationIssue};
use crate::node::{Attributes, RESERVED_ATTRS};
use crate::registry::Registry;
use crate::resolve::{is_markup_name, is_safe_name, validate_tag};

/// Result of library validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Library validator.
///
/// `base` is the registry configured components are layered onto; reference
/// targets may name entries of either.
#[derive(Debug)]
pub struct Validator<'a> {
    base: &'a Registry,
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl<'a> Validator<'a> {
    /// Creates a validator checking against `base`.
    #[must_use]
    pub const fn new(base: &'a Registry) -> Self {
        Self {
            base,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Validates `library`, consuming the validator.
    #[must_use]
    pub fn validate(
        mut self,
        library: &ComponentLibrary,
        limits: &ConfigLimits,
    ) -> ValidationResult {
        if library.components.len() > limits.max_components {
            self.error(
                "components",
                format!(
                    "{} components defined, at most {} allowed",
                    library.components.len(),
                    limits.max_components
                ),
            );
        }

        if library.components.is_empty() {
            self.warning("components", "library defines no components".to_string());
        }

        for (name, spec) in &library.components {
            let path = format!("components.{name}");
            self.validate_name(&path, name);

            if self.base.contains(name) {
                self.warning(&path, format!("overrides builtin component '{name}'"));
            }

            match spec {
                ComponentSpec::Alias { tag } => self.validate_emitted_tag(&path, tag),
                ComponentSpec::Fragment => {}
                ComponentSpec::Decorate {
                    tag,
                    class,
                    attributes,
                } => {
                    self.validate_emitted_tag(&path, tag);
                    self.validate_decoration(&path, class.as_deref(), attributes);
                }
                ComponentSpec::Reference { target } => {
                    self.validate_reference(&path, name, target, library);
                }
            }
        }

        ValidationResult {
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    fn validate_name(&mut self, path: &str, name: &str) {
        if let Err(reason) = validate_tag(name) {
            self.error(path, format!("invalid component name: {reason}"));
            return;
        }
        if let Some((parent, tag)) = name.split_once('.') {
            if parent.is_empty() || tag.is_empty() || tag.contains('.') {
                self.error(
                    path,
                    format!("qualified name '{name}' must have the form parent.tag"),
                );
            }
        }
    }

    fn validate_emitted_tag(&mut self, path: &str, tag: &str) {
        let tag_path = format!("{path}.tag");
        if let Err(reason) = validate_tag(tag) {
            self.error(&tag_path, format!("invalid element name: {reason}"));
        } else if !is_markup_name(tag) {
            self.warning(
                &tag_path,
                format!("'{tag}' does not look like a markup element name"),
            );
        }
    }

    fn validate_decoration(&mut self, path: &str, class: Option<&str>, attributes: &Attributes) {
        if class.is_none_or(str::is_empty) && attributes.is_empty() {
            self.warning(
                path,
                "decorate without class or attributes behaves like alias".to_string(),
            );
        }
        for key in attributes.keys() {
            if RESERVED_ATTRS.contains(&key.as_str()) {
                self.error(
                    &format!("{path}.attributes.{key}"),
                    format!("'{key}' is reserved and cannot be a default attribute"),
                );
            } else if !is_safe_name(key) {
                self.error(
                    &format!("{path}.attributes"),
                    format!("invalid attribute name {key:?}"),
                );
            }
        }
    }

    fn validate_reference(
        &mut self,
        path: &str,
        name: &str,
        target: &str,
        library: &ComponentLibrary,
    ) {
        let target_path = format!("{path}.target");
        if target == name {
            self.error(&target_path, format!("'{name}' references itself"));
            return;
        }
        if library.components.contains_key(target) || self.base.contains(target) {
            return;
        }

        let candidates = library
            .components
            .keys()
            .map(String::as_str)
            .chain(self.base.names());
        let message = suggest_name(target, candidates).map_or_else(
            || format!("unknown component '{target}'"),
            |suggestion| format!("unknown component '{target}' (did you mean '{suggestion}'?)"),
        );
        self.error(&target_path, message);
    }

    fn error(&mut self, path: &str, message: String) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message,
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, path: &str, message: String) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message,
            severity: Severity::Warning,
        });
    }
}

/// Suggests the closest candidate for a misspelled component name.
///
/// Returns the nearest match if its Damerau-Levenshtein distance is at most 3.
#[must_use]
pub fn suggest_name<'c>(
    input: &str,
    candidates: impl IntoIterator<Item = &'c str>,
) -> Option<String> {
    candidates
        .into_iter()
        .filter(|c| *c != input)
        .map(|c| (c, strsim::damerau_levenshtein(input, c)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}
