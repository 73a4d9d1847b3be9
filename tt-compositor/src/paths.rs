//! Folders and file names of a render
//!
//!     Every folder named in the spine is relative to the folder of the spine file. Parsed
//!     node arrays are cached in one shared folder, which is why content and template names
//!     must not collide.

use std::path::{Path, PathBuf};

use tt_config::TtConfig;

use crate::spine::Spine;

/// Give `file_name` the extension `extension` unless it already has it.
///
/// A different extension is replaced, a missing one is appended.
pub fn put_file_ext(file_name: &str, extension: &str) -> String {
    match file_name.rfind('.') {
        None => format!("{}.{}", file_name, extension),
        Some(dot) if &file_name[dot + 1..] == extension => file_name.to_string(),
        Some(dot) => format!("{}.{}", &file_name[..dot], extension),
    }
}

/// Drop `extension` from the end of `file_name`, if it is there.
pub fn strip_file_ext<'a>(file_name: &'a str, extension: &str) -> &'a str {
    file_name
        .strip_suffix(extension)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    spine_folder: PathBuf,
    content_folder: PathBuf,
    template_folder: PathBuf,
    publication_folder: PathBuf,
    cache_folder: PathBuf,
    source_extension: String,
}

impl Paths {
    pub fn new(spine_path: &Path, spine: &Spine, config: &TtConfig) -> Self {
        let spine_folder = spine_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Paths {
            content_folder: spine_folder.join(&spine.content_folder),
            template_folder: spine_folder.join(&spine.template_folder),
            publication_folder: spine_folder.join(&spine.publication_folder),
            cache_folder: spine_folder.join(&config.cache.folder),
            source_extension: config.files.source_extension.clone(),
            spine_folder,
        }
    }

    pub fn spine_folder(&self) -> &Path {
        &self.spine_folder
    }

    pub fn template_folder(&self) -> &Path {
        &self.template_folder
    }

    pub fn publication_folder(&self) -> &Path {
        &self.publication_folder
    }

    pub fn cache_folder(&self) -> &Path {
        &self.cache_folder
    }

    pub fn content_file(&self, name: &str) -> PathBuf {
        self.content_folder
            .join(put_file_ext(name, &self.source_extension))
    }

    pub fn template_file(&self, name: &str) -> PathBuf {
        self.template_folder
            .join(put_file_ext(name, &self.source_extension))
    }

    pub fn publication_file(&self, file_name: &str) -> PathBuf {
        self.publication_folder.join(file_name)
    }
}
