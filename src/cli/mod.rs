//! Command-line interface
//!
//! Argument definitions and command handlers for the `mdx-components` binary.

pub mod args;
pub mod commands;
