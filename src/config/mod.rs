//! Component library configuration.
//!
//! Loads YAML component libraries, validates them and builds the registry
//! they describe.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions, build_registry,
};
pub use schema::*;
pub use validation::{ValidationResult, Validator, suggest_name};
