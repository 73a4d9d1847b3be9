use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::RenderError;
use crate::output::OutputTree;

#[derive(Debug)]
pub struct PublishSpec<'a> {
    pub output: &'a OutputTree,
    pub path: PathBuf,
    pub create_folders: bool,
}

impl<'a> PublishSpec<'a> {
    pub fn new(output: &'a OutputTree, path: impl AsRef<Path>) -> Self {
        Self {
            output,
            path: path.as_ref().to_path_buf(),
            create_folders: true,
        }
    }

    pub fn with_create_folders(mut self, create_folders: bool) -> Self {
        self.create_folders = create_folders;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Write the flattened output tree to its publication file.
pub fn publish(spec: PublishSpec<'_>) -> Result<PublishResult, RenderError> {
    let text = spec.output.text();
    if spec.create_folders {
        if let Some(folder) = spec.path.parent().filter(|folder| !folder.as_os_str().is_empty()) {
            fs::create_dir_all(folder).map_err(|source| RenderError::Write {
                path: folder.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(&spec.path, &text).map_err(|source| RenderError::Write {
        path: spec.path.clone(),
        source,
    })?;
    info!("written {}", spec.path.display());
    Ok(PublishResult {
        path: spec.path,
        bytes: text.len(),
    })
}
