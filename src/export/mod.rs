//! Markup export for ferrite-decor
//!
//! Converts rendered decoration trees into nested markup for web views,
//! clipboard HTML and standalone documents.

pub mod html;

pub use html::{generate_html_document, to_html};
