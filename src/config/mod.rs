use derive_builder::Builder;
use std::path::{Path, PathBuf};

use crate::error::GenerateError;

/// Template tree shipped with the crate.
pub const BUNDLED_TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");

pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".j2";

pub const DEFAULT_AUTOESCAPE: &[&str] = &[".html.j2", ".xml.j2"];

/// What to do when a single template fails to load or render.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure in the summary and move on to the next entry.
    #[default]
    Continue,
    /// Stop the whole generation with the first template failure.
    Abort,
}

/// Everything a [`Generator`](crate::generator::Generator) needs to know about
/// the template tree and the templating engine.
#[derive(Builder, Debug, Clone)]
#[builder(
    build_fn(validate = "Self::validate", error = "GenerateError"),
    pattern = "owned"
)]
pub struct GeneratorConfig {
    #[builder(setter(into), default = "PathBuf::from(BUNDLED_TEMPLATES)")]
    template_root: PathBuf,

    #[builder(setter(into), default = "DEFAULT_TEMPLATE_SUFFIX.to_string()")]
    template_suffix: String,

    /// Template names ending with any of these get HTML autoescaping.
    #[builder(default = "DEFAULT_AUTOESCAPE.to_vec()")]
    autoescape: Vec<&'static str>,

    #[builder(default)]
    failure_policy: FailurePolicy,
}

impl GeneratorConfigBuilder {
    fn validate(&self) -> Result<(), GenerateError> {
        match self.template_suffix.as_deref() {
            Some("") => Err(GenerateError::InvalidConfig(
                "template suffix must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_root: PathBuf::from(BUNDLED_TEMPLATES),
            template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
            autoescape: DEFAULT_AUTOESCAPE.to_vec(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new [`GeneratorConfig`] builder
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    #[must_use]
    pub fn template_root(&self) -> &Path {
        self.template_root.as_path()
    }

    #[must_use]
    pub fn template_suffix(&self) -> &str {
        &self.template_suffix
    }

    #[must_use]
    pub fn autoescape(&self) -> &[&'static str] {
        &self.autoescape
    }

    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = GeneratorConfig::builder().build().unwrap();
        let default = GeneratorConfig::default();

        assert_eq!(built.template_root(), default.template_root());
        assert_eq!(built.template_suffix(), ".j2");
        assert_eq!(built.autoescape(), default.autoescape());
        assert_eq!(built.failure_policy(), FailurePolicy::Continue);
    }

    #[test]
    fn builder_overrides() {
        let config = GeneratorConfig::builder()
            .template_root("/tmp/skeleton")
            .template_suffix(".tera")
            .failure_policy(FailurePolicy::Abort)
            .build()
            .unwrap();

        assert_eq!(config.template_root(), Path::new("/tmp/skeleton"));
        assert_eq!(config.template_suffix(), ".tera");
        assert_eq!(config.failure_policy(), FailurePolicy::Abort);
    }

    #[test]
    fn empty_suffix_is_rejected() {
        let err = GeneratorConfig::builder()
            .template_suffix("")
            .build()
            .unwrap_err();

        assert!(matches!(err, GenerateError::InvalidConfig(_)));
    }

    #[test]
    fn bundled_templates_are_shipped() {
        assert!(Path::new(BUNDLED_TEMPLATES).is_dir());
    }
}
