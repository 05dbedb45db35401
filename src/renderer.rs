//! Thin wrapper over [`tera`], configured once per generator.
//!
//! Every template under the template root is loaded up front under its
//! root-relative `/` name, so `{% include "partials/header.j2" %}` and
//! `{% extends "base.html.j2" %}` resolve against the root. A template that
//! fails to load is left out without keeping the others from loading; its
//! error surfaces when that template itself is rendered.
//!
//! Tera has no `trim_blocks`/`lstrip_blocks`. Templates control whitespace
//! around tags with `{%-` and `-%}`.

use heck::{ToKebabCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use std::{
    collections::{HashMap, HashSet},
    error::Error as StdError,
    fs,
    path::Path,
};
use tera::{ErrorKind, Tera, Value};
use walkdir::WalkDir;

use crate::{
    config::GeneratorConfig,
    context::RenderContext,
    error::{GenerateError, Result},
    template::{strip_template_suffix, template_name},
    trace,
};

pub struct Renderer {
    engine: Tera,
    loaded: HashSet<String>,
}

impl Renderer {
    #[must_use]
    pub fn new(config: &GeneratorConfig) -> Self {
        let mut engine = Tera::default();
        engine.autoescape_on(config.autoescape().to_vec());

        engine.register_filter("snake_case", case_filter("snake_case", |s| s.to_snake_case()));
        engine.register_filter("kebab_case", case_filter("kebab_case", |s| s.to_kebab_case()));
        engine.register_filter(
            "pascal_case",
            case_filter("pascal_case", |s| s.to_upper_camel_case()),
        );
        engine.register_filter(
            "shouty_snake_case",
            case_filter("shouty_snake_case", |s| s.to_shouty_snake_case()),
        );

        let sources = collect_sources(config.template_root(), config.template_suffix());
        let (engine, loaded) = load(engine, sources);

        Renderer { engine, loaded }
    }

    /// Whether `name` was loaded from the template root.
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    /// Render the template `name` against `context`.
    ///
    /// Templates loaded from the root render as loaded. Anything else, including
    /// a root template that failed to load, is registered from `source` on a
    /// copy of the engine, which reports the actual parse or inheritance error.
    ///
    /// # Errors
    ///
    /// [`GenerateError::TemplateNotFound`] if the template references another
    /// template that is not available, [`GenerateError::Render`] for any other
    /// parse or render failure.
    pub fn render(&self, name: &str, source: &str, context: &RenderContext) -> Result<String> {
        let context = context.to_tera();

        if self.is_loaded(name) {
            return self
                .engine
                .render(name, &context)
                .map_err(|err| classify(name, &err));
        }

        let mut engine = self.engine.clone();

        engine
            .add_raw_template(name, source)
            .map_err(|err| classify(name, &err))?;

        engine
            .render(name, &context)
            .map_err(|err| classify(name, &err))
    }
}

/// Every readable, UTF-8 template file under `root`, keyed by template name.
fn collect_sources(root: &Path, suffix: &str) -> Vec<(String, String)> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| strip_template_suffix(entry.path(), suffix).is_some())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            let source = fs::read_to_string(entry.path()).ok()?;
            Some((template_name(relative), source))
        })
        .collect()
}

/// Load everything at once, or, if any template is broken, one at a time on
/// trial copies until no more templates can be added. Repeated passes let a
/// child load once its parent has.
fn load(engine: Tera, sources: Vec<(String, String)>) -> (Tera, HashSet<String>) {
    let mut all = engine.clone();
    if all.add_raw_templates(sources.iter().map(|(n, s)| (n.as_str(), s.as_str()))).is_ok() {
        let loaded = sources.into_iter().map(|(name, _)| name).collect();
        return (all, loaded);
    }

    let mut engine = engine;
    let mut loaded = HashSet::new();
    let mut pending = sources;

    loop {
        let before = pending.len();

        pending.retain(|(name, source)| {
            let mut trial = engine.clone();
            match trial.add_raw_template(name, source) {
                Ok(()) => {
                    engine = trial;
                    loaded.insert(name.clone());
                    false
                }
                Err(_) => true,
            }
        });

        if pending.is_empty() || pending.len() == before {
            break;
        }
    }

    for (name, _) in &pending {
        trace!("Template '{name}' could not be loaded up front");
    }

    (engine, loaded)
}

fn case_filter(
    filter: &'static str,
    convert: fn(&str) -> String,
) -> impl Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync {
    move |value: &Value, _: &HashMap<String, Value>| -> tera::Result<Value> {
        let text = value.as_str().ok_or_else(|| {
            tera::Error::msg(format!("Filter `{filter}` received a non-string value: {value}"))
        })?;

        Ok(Value::String(convert(text)))
    }
}

/// Tera nests the interesting error behind "Failed to render ..." wrappers,
/// walk the chain for a missing template and flatten the rest into a message.
fn classify(name: &str, err: &tera::Error) -> GenerateError {
    let mut messages = Vec::new();
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);

    while let Some(e) = current {
        if let Some(tera_err) = e.downcast_ref::<tera::Error>() {
            match &tera_err.kind {
                // Includes report their candidate list as `[a, b]`.
                ErrorKind::TemplateNotFound(missing) => {
                    return GenerateError::TemplateNotFound {
                        name: missing
                            .trim_start_matches('[')
                            .trim_end_matches(']')
                            .to_string(),
                    }
                }
                ErrorKind::MissingParent { parent, .. } => {
                    return GenerateError::TemplateNotFound {
                        name: parent.clone(),
                    }
                }
                _ => {}
            }
        }

        messages.push(e.to_string());
        current = e.source();
    }

    GenerateError::Render {
        name: name.to_string(),
        message: messages.join(": "),
    }
}
