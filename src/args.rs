pub use clap::Parser;
use std::path::PathBuf;

use crate::{
    config::{FailurePolicy, GeneratorConfig},
    context::ContextOption,
    error::GenerateError,
};

/// Generate boilerplate code for PydanticAI, FastAPI, and PostgreSQL projects.
#[derive(Parser, Debug)]
#[clap(name = "generate-boilerplate", version)]
pub struct Args {
    /// The name of the project to generate
    pub project_name: String,

    /// The directory where the project structure will be created
    #[clap(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Use this template root instead of the bundled one
    #[clap(long)]
    pub template_dir: Option<PathBuf>,

    /// Extra value for the templates, repeatable (e.g. --set db_name=app_db)
    #[clap(long = "set", value_name = "KEY=VALUE")]
    pub options: Vec<ContextOption>,

    /// Abort on the first template that fails to render [default: skip it and go on]
    #[clap(long)]
    pub strict: bool,

    /// Disable colored output
    #[clap(long)]
    pub no_color: bool,
}

impl Args {
    /// `output_dir/project_name`
    #[must_use]
    pub fn project_path(&self) -> PathBuf {
        self.output_dir.join(&self.project_name)
    }

    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidConfig`] if the builder rejects the values.
    pub fn generator_config(&self) -> Result<GeneratorConfig, GenerateError> {
        let mut builder = GeneratorConfig::builder().failure_policy(if self.strict {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        });

        if let Some(ref dir) = self.template_dir {
            builder = builder.template_root(dir.clone());
        }

        builder.build()
    }
}
