//! Error kinds raised while scaffolding a project.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum GenerateError {
    /// The computed `output_dir/project_name` is already on disk.
    #[error("directory '{}' already exists, choose a different name or location", .path.display())]
    TargetExists { path: PathBuf },

    #[error("invalid project name '{0}': must be a single, non-empty path component")]
    InvalidProjectName(String),

    #[error("invalid option '{0}': expected KEY=VALUE with KEY matching [A-Za-z_][A-Za-z0-9_]*")]
    InvalidOption(String),

    #[error("invalid generator configuration: {0}")]
    InvalidConfig(String),

    #[error("template root '{}' does not exist or is not a directory", .path.display())]
    TemplateRootMissing { path: PathBuf },

    /// A template entry, or a template it references, could not be located.
    #[error("template '{name}' not found")]
    TemplateNotFound { name: String },

    #[error("failed to render template '{name}': {message}")]
    Render { name: String, message: String },

    #[error("failed to {action} '{}'", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub(crate) fn fs(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Failures scoped to a single template entry. Under the lenient policy
    /// these are recorded and traversal moves on to the next entry.
    #[must_use]
    pub fn is_template_failure(&self) -> bool {
        matches!(self, Self::TemplateNotFound { .. } | Self::Render { .. })
    }
}

impl From<derive_builder::UninitializedFieldError> for GenerateError {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
