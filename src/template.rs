use std::path::{Path, PathBuf};

/// How a template-root entry maps onto the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    /// Rendered through the engine, written with the suffix stripped.
    Template { name: String },
    /// Copied byte for byte.
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub source: PathBuf,
    /// Where this entry lands under the output root.
    pub target: PathBuf,
    pub kind: EntryKind,
}

impl Entry {
    /// Resolve the render/copy decision for `source` once. `relative` is
    /// `source` relative to the template root.
    #[must_use]
    pub fn resolve(
        source: PathBuf,
        relative: &Path,
        is_dir: bool,
        output_root: &Path,
        suffix: &str,
    ) -> Entry {
        let target = output_root.join(relative);

        if is_dir {
            return Entry {
                source,
                target,
                kind: EntryKind::Directory,
            };
        }

        match strip_template_suffix(&target, suffix) {
            Some(stripped) => Entry {
                source,
                target: stripped,
                kind: EntryKind::Template {
                    name: template_name(relative),
                },
            },
            None => Entry {
                source,
                target,
                kind: EntryKind::Static,
            },
        }
    }
}

/// `app/config.py.j2` -> `app/config.py`. Only the final suffix goes; a file
/// named exactly like the suffix is not a template.
#[must_use]
pub fn strip_template_suffix(path: &Path, suffix: &str) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(suffix).filter(|stem| !stem.is_empty())?;

    Some(path.with_file_name(stem))
}

/// Engine-facing name: the root-relative path with `/` separators.
pub(crate) fn template_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
