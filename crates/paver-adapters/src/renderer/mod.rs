//! Template rendering adapters.

mod jinja;

pub use jinja::MiniJinjaRenderer;
