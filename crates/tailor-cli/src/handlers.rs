//! Command handlers for CLI subcommands
//!
//! Each subcommand lives in its own module; this module only re-exports the
//! entry points used by `main`.

mod completions;
mod config;
mod render;

pub use completions::handle_completions;
pub use config::handle_config;
pub use render::handle_render;
