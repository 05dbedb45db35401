//! Walks the template root and mirrors it under the output path.
//!
//! Entries are visited depth-first, parents before children, siblings in
//! lexicographic file-name order. Each entry is resolved once into an
//! [`EntryKind`] and then created, rendered or copied.
//!
//! Template failures ([`GenerateError::is_template_failure`]) follow the
//! configured [`FailurePolicy`]. Filesystem errors always abort, and whatever
//! was written before the error is left in place.

use std::{
    fs::{self, File, FileTimes},
    io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

use crate::{
    config::{FailurePolicy, GeneratorConfig},
    context::{ContextOption, RenderContext},
    error::{GenerateError, Result},
    info,
    renderer::Renderer,
    step,
    template::{Entry, EntryKind},
    trace,
};

/// A template entry that was not written, and why.
#[derive(Debug)]
pub struct Skipped {
    pub source: PathBuf,
    pub error: GenerateError,
}

/// What a generation pass did.
#[derive(Debug, Default)]
pub struct Summary {
    pub directories: usize,
    pub rendered: usize,
    pub copied: usize,
    pub skipped: Vec<Skipped>,
}

impl Summary {
    /// True when every template entry made it into the output.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    #[must_use]
    pub fn files(&self) -> usize {
        self.rendered + self.copied
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} directories, {} rendered, {} copied, {} skipped",
            self.directories,
            self.rendered,
            self.copied,
            self.skipped.len()
        )
    }
}

enum Outcome {
    Directory,
    Rendered,
    Copied,
}

pub struct Generator {
    config: GeneratorConfig,
    renderer: Renderer,
}

impl Generator {
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let renderer = Renderer::new(&config);
        Generator { config, renderer }
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// # Errors
    ///
    /// [`GenerateError::TemplateRootMissing`] unless the template root is a directory.
    pub fn check_template_root(&self) -> Result<()> {
        let root = self.config.template_root();

        if root.is_dir() {
            Ok(())
        } else {
            Err(GenerateError::TemplateRootMissing {
                path: root.to_path_buf(),
            })
        }
    }

    /// Mirror the template root into `output_path`, which must already exist.
    ///
    /// The render context is `{ project_name } ∪ options`, built once and
    /// shared by every template.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::TemplateRootMissing`] if the template root is not a directory.
    /// - [`GenerateError::Filesystem`] on any I/O failure, including a missing `output_path`.
    /// - The first template failure when the policy is [`FailurePolicy::Abort`].
    pub fn generate(
        &self,
        project_name: &str,
        output_path: &Path,
        options: impl IntoIterator<Item = ContextOption>,
    ) -> Result<Summary> {
        self.check_template_root()?;
        let root = self.config.template_root();

        if !output_path.is_dir() {
            return Err(GenerateError::fs(
                "use output directory",
                output_path,
                io::Error::from(io::ErrorKind::NotFound),
            ));
        }

        let context = RenderContext::new(project_name, options);

        trace!("Render context: {context}");
        info!("Processing templates from '{}'", root.display());

        let mut summary = Summary::default();

        for walked in WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let walked = walked.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                GenerateError::Filesystem {
                    action: "read template entry",
                    path,
                    source: io::Error::from(err),
                }
            })?;

            let relative = walked.path().strip_prefix(root).map_err(|_| {
                GenerateError::fs(
                    "resolve template entry",
                    walked.path(),
                    io::Error::other("entry is outside the template root"),
                )
            })?;

            let entry = Entry::resolve(
                walked.path().to_path_buf(),
                relative,
                walked.file_type().is_dir(),
                output_path,
                self.config.template_suffix(),
            );

            match self.process(&entry, &context) {
                Ok(Outcome::Directory) => summary.directories += 1,
                Ok(Outcome::Rendered) => summary.rendered += 1,
                Ok(Outcome::Copied) => summary.copied += 1,
                Err(err)
                    if err.is_template_failure()
                        && self.config.failure_policy() == FailurePolicy::Continue =>
                {
                    crate::error!("{err}, skipping '{}'", entry.source.display());
                    summary.skipped.push(Skipped {
                        source: entry.source,
                        error: err,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        Ok(summary)
    }

    fn process(&self, entry: &Entry, context: &RenderContext) -> Result<Outcome> {
        match &entry.kind {
            EntryKind::Directory => {
                // Idempotent: a directory may already exist from an earlier entry.
                fs::create_dir_all(&entry.target)
                    .map_err(|e| GenerateError::fs("create directory", &entry.target, e))?;
                step!("created", "'{}'", entry.target.display());
                Ok(Outcome::Directory)
            }
            EntryKind::Template { name } => {
                let source = read_template(name, &entry.source)?;
                let rendered = self.renderer.render(name, &source, context)?;

                ensure_parent(&entry.target)?;
                fs::write(&entry.target, rendered)
                    .map_err(|e| GenerateError::fs("write", &entry.target, e))?;
                step!("rendered", "'{name}' to '{}'", entry.target.display());
                Ok(Outcome::Rendered)
            }
            EntryKind::Static => {
                ensure_parent(&entry.target)?;
                copy_preserving(&entry.source, &entry.target)?;
                step!(
                    "copied",
                    "'{}' to '{}'",
                    entry.source.display(),
                    entry.target.display()
                );
                Ok(Outcome::Copied)
            }
        }
    }
}

fn read_template(name: &str, path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => GenerateError::TemplateNotFound {
            name: name.to_string(),
        },
        _ => GenerateError::fs("read template", path, e),
    })?;

    String::from_utf8(bytes).map_err(|e| GenerateError::Render {
        name: name.to_string(),
        message: format!("template is not valid UTF-8: {e}"),
    })
}

fn ensure_parent(target: &Path) -> Result<()> {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| GenerateError::fs("create directory", parent, e)),
        _ => Ok(()),
    }
}

/// Copy bytes and permissions, then carry over access and modification times.
///
/// Setting times needs write access on some platforms, so a read-only copy is
/// made writable for the call and read-only again afterwards.
fn copy_preserving(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target).map_err(|e| GenerateError::fs("copy", source, e))?;

    let metadata = fs::metadata(source).map_err(|e| GenerateError::fs("stat", source, e))?;

    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    let permissions = metadata.permissions();
    if permissions.readonly() {
        let mut writable = permissions.clone();
        #[allow(clippy::permissions_set_readonly_false)]
        writable.set_readonly(false);
        fs::set_permissions(target, writable)
            .map_err(|e| GenerateError::fs("set permissions on", target, e))?;
    }

    let stamped = File::options()
        .write(true)
        .open(target)
        .and_then(|file| file.set_times(times))
        .map_err(|e| GenerateError::fs("set timestamps on", target, e));

    if permissions.readonly() {
        fs::set_permissions(target, permissions)
            .map_err(|e| GenerateError::fs("set permissions on", target, e))?;
    }

    stamped
}
