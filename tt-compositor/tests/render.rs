use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};
use tt_compositor::{render, CompositorError, RenderError, SpineError};
use tt_config::{load_defaults, Loader, TtConfig};

const BASE: &str = "#file-opening <html>\n#file-ending </html>\n#tag para\n##text <p>\n##content\n##text </p>\n#tag sign\n##from-var author\n";

fn write(root: &Path, name: &str, source: &str) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, source).unwrap();
    path
}

fn site(spine: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    write(dir.path(), "templates/base.tt", BASE);
    write(dir.path(), "intro.tt", "#para Hello\n#sign\n");
    write(dir.path(), "outro.tt", "#para Bye\n");
    let spine = write(dir.path(), "spine.tt", spine);
    (dir, spine)
}

const SPINE: &str = "#template-path templates\n#publication-path pub\n#var author\n##text Ada\n#publish index.html\n##content intro\n##template base\n";

#[test]
fn renders_publication_and_reuses_cache() {
    let (dir, spine) = site(SPINE);
    let config = load_defaults().unwrap();

    let first = render(&spine, &config).unwrap();
    let published = dir.path().join("pub").join("index.html");
    assert_eq!(first.written, vec![published.clone()]);
    assert_eq!(first.parsed().len(), 2);
    assert!(first.cached().is_empty());
    let output = fs::read_to_string(&published).unwrap();
    assert_eq!(output, "<html><p>Hello</p>Ada</html>");
    assert!(dir.path().join("json").join("intro.json").exists());
    assert!(dir.path().join("json").join("base.json").exists());

    let second = render(&spine, &config).unwrap();
    assert!(second.parsed().is_empty());
    assert_eq!(
        second.cached(),
        vec![
            dir.path().join("templates").join("base.tt").as_path(),
            dir.path().join("intro.tt").as_path(),
        ]
    );
    assert_eq!(fs::read_to_string(&published).unwrap(), output);
}

#[test]
fn disabled_cache_always_parses() {
    let (dir, spine) = site(SPINE);
    let config: TtConfig = Loader::new()
        .set_override("cache.enabled", false)
        .unwrap()
        .build()
        .unwrap();

    render(&spine, &config).unwrap();
    let second = render(&spine, &config).unwrap();
    assert_eq!(second.parsed().len(), 2);
    assert!(!dir.path().join("json").exists());
}

#[test]
fn one_unit_per_publication_name() {
    let (dir, spine) = site(
        "#template-path templates\n#var author\n##text Ada\n#publish a b\n##format htm\n##content intro outro\n##template base\n",
    );
    let report = render(&spine, &load_defaults().unwrap()).unwrap();
    assert_eq!(report.written.len(), 2);
    assert_eq!(
        fs::read_to_string(dir.path().join("b.htm")).unwrap(),
        "<html><p>Bye</p></html>"
    );
}

#[test]
fn single_publication_joins_contents() {
    let (dir, spine) = site(
        "#template-path templates\n#var author\n##text Ada\n#file-list all\n##list intro outro\n#publish book\n##content all\n##template base\n",
    );
    render(&spine, &load_defaults().unwrap()).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("book.txt")).unwrap(),
        "<html><p>Hello</p>Ada<p>Bye</p></html>"
    );
}

#[test]
fn spine_errors_stop_before_composition() {
    let (dir, spine) = site(
        "#template-path templates\n#publication-path pub\n#publish a b\n##content intro\n##template base\n",
    );
    let err = render(&spine, &load_defaults().unwrap()).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Spine(SpineError::PublicationCountMismatch {
            publications: 2,
            contents: 1
        })
    ));
    assert!(!dir.path().join("pub").exists());
    assert!(!dir.path().join("json").exists());
}

#[test]
fn failing_unit_leaves_nothing_written() {
    // no author variable: the second unit fails after the first composed fine
    let (dir, spine) = site(
        "#template-path templates\n#publication-path pub\n#publish a b\n##content outro intro\n##template base\n",
    );
    let err = render(&spine, &load_defaults().unwrap()).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Compositor(CompositorError::UnknownVariable { .. })
    ));
    assert!(!dir.path().join("pub").exists());
}

#[test]
fn missing_content_file_names_the_path() {
    let (dir, spine) = site("#template-path templates\n#publish a\n##content nowhere\n##template base\n");
    let err = render(&spine, &load_defaults().unwrap()).unwrap_err();
    match err {
        RenderError::Load { path, .. } => assert_eq!(path, dir.path().join("nowhere.tt")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn syntax_errors_are_reported() {
    let (dir, spine) = site(SPINE);
    write(dir.path(), "intro.tt", "#para Hello\n###too deep\n");
    let err = render(&spine, &load_defaults().unwrap()).unwrap_err();
    assert!(matches!(err, RenderError::Parse(_)));
    assert!(err.to_string().contains("intro.tt"));
}
