//! The render pipeline
//!
//!     render(spine) runs, strictly in order:
//!
//!     1. parse and interpret the spine (never cached)
//!     2. load every template, then every content file, from the cache when it is fresh
//!        and by parsing otherwise
//!     3. declare the template counters
//!     4. compose every publication unit
//!     5. write the publications
//!
//!     Nothing is written before every unit has been composed, so a failing unit leaves the
//!     publication folder untouched.

use std::path::{Path, PathBuf};

use log::{info, warn};
use tt_config::TtConfig;
use tt_parser::tt::{DocumentLoader, NodeArray};

use crate::cache::{CacheOutcome, ParseCache};
use crate::compositor::Compositor;
use crate::counters::Counters;
use crate::error::RenderError;
use crate::paths::Paths;
use crate::publish::{publish, PublishSpec};
use crate::registry::{Registry, Template};
use crate::spine::Spine;

/// A source file used by the render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Reused from the parse cache instead of parsed.
    pub from_cache: bool,
}

/// What a render did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Templates first, then content files, in spine order.
    pub sources: Vec<SourceFile>,
    pub written: Vec<PathBuf>,
}

impl RenderReport {
    pub fn parsed(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|source| !source.from_cache)
            .map(|source| source.path.as_path())
            .collect()
    }

    pub fn cached(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|source| source.from_cache)
            .map(|source| source.path.as_path())
            .collect()
    }
}

/// Render every publication declared by the spine file at `spine_path`.
pub fn render(spine_path: impl AsRef<Path>, config: &TtConfig) -> Result<RenderReport, RenderError> {
    let spine_path = spine_path.as_ref();
    let spine_array = load(spine_path)?.parse()?;
    let spine = Spine::interpret(&spine_array, config)?;
    info!(
        "spine {} declares {} publication(s)",
        spine_path.display(),
        spine.units.len()
    );

    let paths = Paths::new(spine_path, &spine, config);
    let cache = ParseCache::new(
        paths.cache_folder(),
        &config.files.cache_extension,
        config.cache.enabled,
    );
    let mut report = RenderReport::default();
    let mut registry = Registry::new();

    for name in spine.template_names() {
        let path = paths.template_file(name);
        let sources = vec![path.clone()];
        let array = load_source(&cache, name, &path, &sources, &mut report)?;
        registry.register_template(Template::new(name, array));
    }
    for name in spine.content_names() {
        let path = paths.content_file(name);
        let mut sources = vec![path.clone()];
        sources.extend(
            spine
                .templates_for_content(name)
                .into_iter()
                .map(|template| paths.template_file(template)),
        );
        let array = load_source(&cache, name, &path, &sources, &mut report)?;
        registry.register_content(name, array);
    }

    let mut counters = Counters::new();
    registry.declare_counters(&mut counters)?;
    let mut compositor = Compositor::new(
        &registry,
        &spine.variables,
        paths.template_folder(),
        counters,
    );
    let mut outputs = Vec::with_capacity(spine.units.len());
    for unit in &spine.units {
        let output = compositor.compose(unit)?;
        outputs.push((paths.publication_file(&unit.file_name()), output));
    }

    for (path, output) in &outputs {
        let result = publish(
            PublishSpec::new(output, path).with_create_folders(config.output.create_folders),
        )?;
        report.written.push(result.path);
    }
    info!(
        "rendered {} publication(s), {} source(s) parsed, {} reused from cache",
        report.written.len(),
        report.parsed().len(),
        report.cached().len()
    );
    Ok(report)
}

fn load(path: &Path) -> Result<DocumentLoader, RenderError> {
    DocumentLoader::from_path(path).map_err(|source| RenderError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// The node array of `name`, from the cache when fresh against `sources`.
fn load_source(
    cache: &ParseCache,
    name: &str,
    path: &Path,
    sources: &[PathBuf],
    report: &mut RenderReport,
) -> Result<NodeArray, RenderError> {
    if let CacheOutcome::Fresh(array) = cache.lookup(name, sources) {
        info!("reusing cached {}", path.display());
        report.sources.push(SourceFile {
            path: path.to_path_buf(),
            from_cache: true,
        });
        return Ok(array);
    }
    let array = load(path)?.parse()?;
    info!("parsed {} ({} nodes)", path.display(), array.len());
    if let Err(err) = cache.store(name, &array) {
        warn!("cannot cache {}: {}", path.display(), err);
    }
    report.sources.push(SourceFile {
        path: path.to_path_buf(),
        from_cache: false,
    });
    Ok(array)
}
