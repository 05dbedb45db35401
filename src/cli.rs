//! Command-line front-end: validate, create the project directory, hand off
//! to the [`Generator`] and turn its [`Summary`] into an exit code.
//!
//! Nothing is cleaned up when generation fails part way; the partial project
//! directory is left for the user to inspect or remove.

use anyhow::{Context, Result};
use std::{ffi::OsString, fs, path::Component, path::Path, process::ExitCode};

use crate::{
    args::{Args, Parser},
    error::GenerateError,
    generator::{Generator, Summary},
    info, trace, warn,
};

/// Parse `args` (including the binary name) and run to completion.
pub fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1));
        }
    };

    if args.no_color {
        owo_colors::set_override(false);
    }

    ExitCode::from(exit_code(&app(&args)))
}

/// 0 for any completed generation, lenient skips included. 1 otherwise, with
/// the error reported on stderr.
#[must_use]
pub fn exit_code(result: &Result<Summary>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(e) => {
            crate::error!("{e:#}");
            1
        }
    }
}

/// # Errors
///
/// Fails with [`GenerateError::TargetExists`] before touching the filesystem
/// if `output_dir/project_name` is already there, and with any error the
/// [`Generator`] returns.
pub fn app(args: &Args) -> Result<Summary> {
    validate_project_name(&args.project_name)?;

    let project_path = args.project_path();

    info!(
        "Generating project '{}' in '{}'...",
        args.project_name,
        project_path.display()
    );

    // Dangling symlinks count as existing too.
    if fs::symlink_metadata(&project_path).is_ok() {
        return Err(GenerateError::TargetExists { path: project_path }.into());
    }

    let generator = Generator::new(args.generator_config()?);
    generator.check_template_root()?;

    trace!("Options received: {:?}", args.options);

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory '{}'",
            args.output_dir.display()
        )
    })?;
    fs::create_dir(&project_path).with_context(|| {
        format!(
            "Failed to create project directory '{}'",
            project_path.display()
        )
    })?;

    let summary = generator.generate(&args.project_name, &project_path, args.options.clone())?;

    for skipped in &summary.skipped {
        warn!(
            "'{}' was not generated: {}",
            skipped.source.display(),
            skipped.error
        );
    }

    info!("{summary}");
    info!(
        "Project '{}' generated successfully at '{}'",
        args.project_name,
        project_path.display()
    );

    Ok(summary)
}

fn validate_project_name(name: &str) -> Result<(), GenerateError> {
    let mut components = Path::new(name).components();

    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == name && !name.contains(['/', '\\']) => Ok(()),
        _ => Err(GenerateError::InvalidProjectName(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// `README.md` and `app/main.py.j2`.
    fn template_root() -> TempDir {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("README.md"), "# Static readme\n").unwrap();
        fs::create_dir(root.path().join("app")).unwrap();
        fs::write(root.path().join("app/main.py.j2"), "# {{ project_name }}").unwrap();
        root
    }

    fn args(root: &Path, out: &Path, name: &str, extra: &[&str]) -> Args {
        let mut argv = vec![
            "generate-boilerplate".to_string(),
            name.to_string(),
            "--output-dir".to_string(),
            out.display().to_string(),
            "--template-dir".to_string(),
            root.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).unwrap()
    }

    fn target_exists(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<GenerateError>(),
            Some(GenerateError::TargetExists { .. })
        )
    }

    #[test]
    fn generates_project() {
        let root = template_root();
        let out = TempDir::new().unwrap();

        let result = app(&args(root.path(), out.path(), "demo", &[]));
        assert_eq!(exit_code(&result), 0);

        let project = out.path().join("demo");
        assert!(project.is_dir());
        assert_eq!(fs::read_to_string(project.join("README.md")).unwrap(), "# Static readme\n");
        assert_eq!(fs::read_to_string(project.join("app/main.py")).unwrap(), "# demo");
    }

    #[test]
    fn creates_missing_output_dir() {
        let root = template_root();
        let out = TempDir::new().unwrap();
        let nested = out.path().join("a/b");

        app(&args(root.path(), &nested, "demo", &[])).unwrap();

        assert!(nested.join("demo/app/main.py").is_file());
    }

    #[test]
    fn existing_target_is_left_untouched() {
        let root = template_root();
        let out = TempDir::new().unwrap();
        let project = out.path().join("demo");
        fs::create_dir(&project).unwrap();

        let result = app(&args(root.path(), out.path(), "demo", &[]));

        assert!(target_exists(result.as_ref().unwrap_err()));
        assert_eq!(exit_code(&result), 1);
        assert_eq!(fs::read_dir(&project).unwrap().count(), 0);
    }

    #[test]
    fn second_run_fails_and_keeps_first_output() {
        let root = template_root();
        let out = TempDir::new().unwrap();
        let main_py = out.path().join("demo/app/main.py");

        app(&args(root.path(), out.path(), "demo", &[])).unwrap();
        fs::write(root.path().join("app/main.py.j2"), "changed {{ project_name }}").unwrap();

        let second = app(&args(root.path(), out.path(), "demo", &[]));

        assert!(target_exists(second.as_ref().unwrap_err()));
        assert_eq!(fs::read_to_string(main_py).unwrap(), "# demo");
    }

    #[test]
    fn lenient_run_with_broken_template_exits_zero() {
        let root = template_root();
        fs::write(root.path().join("app/broken.py.j2"), "{{ missing }}").unwrap();
        let out = TempDir::new().unwrap();

        let result = app(&args(root.path(), out.path(), "demo", &[]));

        let summary = result.as_ref().unwrap();
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.files(), 2);
        assert_eq!(exit_code(&result), 0);
        assert!(out.path().join("demo/app/main.py").is_file());
        assert!(!out.path().join("demo/app/broken.py").exists());
    }

    #[test]
    fn strict_run_with_broken_template_exits_one() {
        let root = template_root();
        fs::write(root.path().join("app/broken.py.j2"), "{{ missing }}").unwrap();
        let out = TempDir::new().unwrap();

        let result = app(&args(root.path(), out.path(), "demo", &["--strict"]));

        assert_eq!(exit_code(&result), 1);
        // The project directory and anything written before the failure stay.
        assert!(out.path().join("demo/README.md").is_file());
    }

    #[test]
    fn options_are_rendered() {
        let root = template_root();
        fs::write(root.path().join(".env.j2"), "POSTGRES_DB={{ db_name }}").unwrap();
        let out = TempDir::new().unwrap();

        app(&args(root.path(), out.path(), "demo", &["--set", "db_name=app_db"])).unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("demo/.env")).unwrap(),
            "POSTGRES_DB=app_db"
        );
    }

    #[test]
    fn missing_template_root_creates_nothing() {
        let out = TempDir::new().unwrap();
        let missing = out.path().join("no-templates");

        let result = app(&args(&missing, out.path(), "demo", &[]));

        assert_eq!(exit_code(&result), 1);
        assert!(!out.path().join("demo").exists());
    }

    #[test]
    fn rejects_bad_project_names() {
        let root = template_root();
        let out = TempDir::new().unwrap();

        for name in ["", ".", "..", "a/b", "../escape"] {
            let err = app(&args(root.path(), out.path(), name, &[])).unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<GenerateError>(),
                    Some(GenerateError::InvalidProjectName(_))
                ),
                "{name:?}"
            );
        }
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn accepts_plain_names() {
        for name in ["demo", "my-app", "my_app", "app.v2"] {
            assert!(validate_project_name(name).is_ok(), "{name}");
        }
        assert_eq!(
            Args::try_parse_from(["generate-boilerplate", "demo", "--output-dir", "x"])
                .unwrap()
                .project_path(),
            PathBuf::from("x/demo")
        );
    }
}
