//! Loading page templates from disk.

use std::path::{Path, PathBuf};

use tera::Tera;
use walkdir::WalkDir;

use super::error::InfraError;

/// Load every `*.html` template under `dir`, keyed by its path relative to
/// `dir` (for example `index.html` or `partials/nav.html`).
///
/// Syntax errors and broken inheritance fail the whole load. Templates that
/// are merely absent are not an error here; callers decide whether the
/// catalog must be complete.
pub fn load_templates(dir: &Path) -> Result<Tera, InfraError> {
    let glob_pattern = dir.join("**").join("*.html").to_string_lossy().to_string();

    Tera::new(&glob_pattern).map_err(|source| InfraError::Templates {
        dir: dir.to_path_buf(),
        source,
    })
}

/// Load the `*.html` templates under `dir` except the ones named in `skip`.
///
/// The export uses this for layouts and partials, then adds each page on its
/// own so one broken page cannot take the others down with it.
pub fn load_shared_templates(dir: &Path, skip: &[&str]) -> Result<Tera, InfraError> {
    let mut files: Vec<(PathBuf, Option<String>)> = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| InfraError::Io(err.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "html") {
            continue;
        }

        let name = template_name(dir, path);
        if skip.contains(&name.as_str()) {
            continue;
        }
        files.push((path.to_path_buf(), Some(name)));
    }

    let mut tera = Tera::default();
    tera.add_template_files(files)
        .map_err(|source| InfraError::Templates {
            dir: dir.to_path_buf(),
            source,
        })?;
    Ok(tera)
}

fn template_name(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn loads_nested_templates_by_relative_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("base.html"), "{% block body %}{% endblock %}")
            .expect("write base");
        fs::write(
            dir.path().join("index.html"),
            r#"{% extends "base.html" %}{% block body %}hi{% endblock %}"#,
        )
        .expect("write index");
        fs::create_dir_all(dir.path().join("partials")).expect("mkdir");
        fs::write(dir.path().join("partials/nav.html"), "<nav></nav>").expect("write nav");

        let tera = load_templates(dir.path()).expect("templates load");
        let mut names: Vec<_> = tera.get_template_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["base.html", "index.html", "partials/nav.html"]);
    }

    #[test]
    fn syntax_errors_fail_the_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("index.html"), "{% if %}").expect("write");

        let err = load_templates(dir.path()).expect_err("invalid syntax");
        assert!(matches!(err, InfraError::Templates { .. }));
    }

    #[test]
    fn shared_load_skips_listed_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("base.html"), "{% block body %}{% endblock %}")
            .expect("write base");
        fs::write(dir.path().join("terms.html"), "{% if %}").expect("write terms");
        fs::create_dir_all(dir.path().join("partials")).expect("mkdir");
        fs::write(dir.path().join("partials/nav.html"), "<nav></nav>").expect("write nav");

        let tera = load_shared_templates(dir.path(), &["terms.html"]).expect("layouts load");
        let mut names: Vec<_> = tera.get_template_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["base.html", "partials/nav.html"]);
    }

    #[test]
    fn broken_layout_fails_the_shared_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("base.html"), "{% block body %}").expect("write base");

        let err = load_shared_templates(dir.path(), &["index.html"]).expect_err("broken base");
        assert!(matches!(err, InfraError::Templates { .. }));
    }
}
