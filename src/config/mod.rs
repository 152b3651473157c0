//! Configuration module for ferrite-decor
//!
//! This module defines the data-driven decorator table, its built-in
//! markdown defaults, and persistence to the editor's platform-specific
//! configuration directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
