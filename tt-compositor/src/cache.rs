//! Persisted node arrays reused across renders
//!
//!     A parsed source is written as `<cache folder>/<name>.<cache extension>`. On the next
//!     render the cached array is reused when it is not older than any of its sources: the
//!     source file itself and, for content files, every template of every unit using it.
//!     A missing, older or unreadable cache is simply [CacheOutcome::Stale]; the caller
//!     re-parses and stores again.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, warn};
use tt_parser::tt::formats::to_persisted_string;
use tt_parser::tt::{DocumentLoader, LoaderError, NodeArray};

use crate::paths::put_file_ext;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheOutcome {
    Fresh(NodeArray),
    Stale,
}

#[derive(Debug, Clone)]
pub struct ParseCache {
    folder: PathBuf,
    extension: String,
    enabled: bool,
}

impl ParseCache {
    pub fn new(folder: impl Into<PathBuf>, extension: impl Into<String>, enabled: bool) -> Self {
        ParseCache {
            folder: folder.into(),
            extension: extension.into(),
            enabled,
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.folder.join(put_file_ext(name, &self.extension))
    }

    /// The cached array for `name`, if it is at least as recent as every one of `sources`.
    pub fn lookup(&self, name: &str, sources: &[PathBuf]) -> CacheOutcome {
        if !self.enabled {
            return CacheOutcome::Stale;
        }
        let path = self.path_for(name);
        let Some(cached_at) = modified(&path) else {
            return CacheOutcome::Stale;
        };
        for source in sources {
            match modified(source) {
                Some(changed_at) if changed_at <= cached_at => {}
                _ => {
                    debug!("cache for '{}' is older than {}", name, source.display());
                    return CacheOutcome::Stale;
                }
            }
        }
        match DocumentLoader::load_persisted(&path) {
            Ok(array) => CacheOutcome::Fresh(array),
            Err(err) => {
                warn!("ignoring unreadable cache {}: {}", path.display(), err);
                CacheOutcome::Stale
            }
        }
    }

    /// Persist `array` for `name`. Returns the written path, or `None` when disabled.
    pub fn store(&self, name: &str, array: &NodeArray) -> Result<Option<PathBuf>, LoaderError> {
        if !self.enabled {
            return Ok(None);
        }
        fs::create_dir_all(&self.folder)?;
        let path = self.path_for(name);
        fs::write(&path, to_persisted_string(array)?)?;
        Ok(Some(path))
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::tempdir;

    fn sample() -> NodeArray {
        DocumentLoader::from_string("#para Hello\n").parse().unwrap()
    }

    fn touch(path: &Path, at: SystemTime) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(at).unwrap();
    }

    #[test]
    fn test_store_then_reuse() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("doc.tt");
        fs::write(&source, "#para Hello\n").unwrap();
        let now = SystemTime::now();
        touch(&source, now);

        let cache = ParseCache::new(dir.path().join("json"), "json", true);
        assert_eq!(cache.lookup("doc", &[source.clone()]), CacheOutcome::Stale);

        let written = cache.store("doc", &sample()).unwrap().unwrap();
        assert_eq!(written, dir.path().join("json").join("doc.json"));
        touch(&written, now + Duration::from_secs(60));
        assert_eq!(
            cache.lookup("doc", &[source.clone()]),
            CacheOutcome::Fresh(sample())
        );
    }

    #[test]
    fn test_newer_source_makes_cache_stale() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("doc.tt");
        let template = dir.path().join("base.tt");
        fs::write(&source, "#para Hello\n").unwrap();
        fs::write(&template, "#tag para\n##content\n").unwrap();

        let cache = ParseCache::new(dir.path(), "json", true);
        let written = cache.store("doc", &sample()).unwrap().unwrap();
        let now = SystemTime::now();
        touch(&written, now);
        touch(&source, now - Duration::from_secs(60));
        touch(&template, now + Duration::from_secs(120));

        assert_eq!(cache.lookup("doc", &[source.clone()]), CacheOutcome::Fresh(sample()));
        assert_eq!(cache.lookup("doc", &[source, template]), CacheOutcome::Stale);
    }

    #[test]
    fn test_missing_source_or_bad_cache_is_stale() {
        let dir = tempdir().unwrap();
        let cache = ParseCache::new(dir.path(), "json", true);
        fs::write(cache.path_for("doc"), "not json").unwrap();
        assert_eq!(cache.lookup("doc", &[]), CacheOutcome::Stale);

        let written = cache.store("doc", &sample()).unwrap().unwrap();
        assert_eq!(
            cache.lookup("doc", &[written.with_file_name("gone.tt")]),
            CacheOutcome::Stale
        );
    }

    #[test]
    fn test_disabled_cache() {
        let dir = tempdir().unwrap();
        let cache = ParseCache::new(dir.path(), "json", false);
        assert_eq!(cache.store("doc", &sample()).unwrap(), None);
        assert!(!cache.path_for("doc").exists());
        assert_eq!(cache.lookup("doc", &[]), CacheOutcome::Stale);
    }
}
