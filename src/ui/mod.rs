//! egui integration for ferrite-decor
//!
//! Maps decoration tags to text formats and builds `LayoutJob`s that an
//! editor widget can use as its layouter.

mod layout;
mod styles;

pub use layout::{layout_job, layout_job_wrapped};
pub use styles::{DecorationStyle, DecorationStyles};
