//! Scaffold a new project directory from a template tree.
//!
//! The [`generator::Generator`] walks a template root and mirrors it under the
//! output path: directories are created, `*.j2` templates are rendered through
//! [`tera`] with the suffix stripped, everything else is copied verbatim.
//! [`cli`] wraps it into the `generate-boilerplate` command.

pub mod log;

pub mod args;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod renderer;
pub mod template;

pub use config::{FailurePolicy, GeneratorConfig};
pub use context::{ContextOption, RenderContext};
pub use error::GenerateError;
pub use generator::{Generator, Summary};
