//! Spine interpretation
//!
//!     The spine is an ordinary tagged text file whose first level tags declare a render:
//!
//!         #template-path templates
//!         #publication-path pub
//!         #var author
//!         ##text Ada Lovelace
//!         #file-list chapters
//!         ##list one two three
//!         #publish book.html
//!         ##content chapters
//!         ##template base book
//!
//!     Every `publish` tag yields one or more [PublicationUnit]s. Names listed by a
//!     `file-list` expand wherever names are accepted. Unknown tags are logged and skipped.

use std::collections::HashMap;

use log::{debug, warn};
use tt_config::TtConfig;
use tt_parser::tt::{NodeArray, NodeIndex};

use crate::error::SpineError;
use crate::paths::{put_file_ext, strip_file_ext};
use crate::variables::Variables;

/// One output file: its content files rendered through its templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationUnit {
    pub name: String,
    pub format: String,
    /// Content names, joined in this order.
    pub contents: Vec<String>,
    /// Template names, later ones taking precedence.
    pub templates: Vec<String>,
}

impl PublicationUnit {
    pub fn new(
        name: impl Into<String>,
        format: impl Into<String>,
        contents: Vec<String>,
        templates: Vec<String>,
    ) -> Self {
        PublicationUnit {
            name: name.into(),
            format: format.into(),
            contents,
            templates,
        }
    }

    /// The publication file name, carrying the unit's format as extension.
    pub fn file_name(&self) -> String {
        put_file_ext(&self.name, &self.format)
    }

    /// The first content file of the unit.
    pub fn content_head(&self) -> Option<&str> {
        self.contents.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spine {
    pub template_folder: String,
    pub publication_folder: String,
    pub content_folder: String,
    pub variables: Variables,
    pub file_lists: HashMap<String, Vec<String>>,
    pub units: Vec<PublicationUnit>,
}

impl Spine {
    /// Read the declarations of a parsed spine file.
    pub fn interpret(array: &NodeArray, config: &TtConfig) -> Result<Spine, SpineError> {
        let mut spine = Spine::default();
        for root in array.roots() {
            let tag = array[root].tag.as_str();
            match tag {
                "" => {}
                "template-path" => spine.template_folder = array.first_value(root).to_string(),
                "publication-path" => {
                    spine.publication_folder = array.first_value(root).to_string()
                }
                "content-path" => spine.content_folder = array.first_value(root).to_string(),
                "var" => {
                    let value = array
                        .subtag_value(root, "text")
                        .ok_or_else(|| missing("var", "text"))?;
                    spine.variables.set(array.first_value(root), value);
                }
                "file-list" => {
                    let names = split_names(
                        array
                            .subtag_value(root, "list")
                            .ok_or_else(|| missing("file-list", "list"))?,
                    );
                    spine
                        .file_lists
                        .insert(array.first_value(root).to_string(), names);
                }
                "publish" => {
                    let units = spine.publish(array, root, config)?;
                    spine.units.extend(units);
                }
                other => warn!("ignoring unknown spine tag '{}'", other),
            }
        }
        spine.check_collisions()?;
        debug!(
            "spine declares {} publication unit(s) and {} variable(s)",
            spine.units.len(),
            spine.variables.len()
        );
        Ok(spine)
    }

    fn publish(
        &self,
        array: &NodeArray,
        root: NodeIndex,
        config: &TtConfig,
    ) -> Result<Vec<PublicationUnit>, SpineError> {
        let publications = self.expand(split_names(array.first_value(root)));
        if publications.is_empty() {
            return Err(SpineError::EmptyPublish);
        }
        let source_extension = &config.files.source_extension;
        let contents: Vec<String> = self
            .expand(split_names(
                array
                    .subtag_value(root, "content")
                    .ok_or_else(|| missing("publish", "content"))?,
            ))
            .iter()
            .map(|name| strip_file_ext(name, source_extension).to_string())
            .collect();
        let templates: Vec<String> = self
            .expand(split_names(
                array
                    .subtag_value(root, "template")
                    .ok_or_else(|| missing("publish", "template"))?,
            ))
            .iter()
            .map(|name| strip_file_ext(name, source_extension).to_string())
            .collect();
        let format = array
            .subtag_value(root, "format")
            .map(str::trim)
            .filter(|format| !format.is_empty())
            .map(str::to_string)
            .or_else(|| publications.iter().find_map(|name| extension_of(name)))
            .unwrap_or_else(|| config.output.default_format.clone());

        if publications.len() == 1 {
            return Ok(vec![PublicationUnit::new(
                publications[0].clone(),
                format,
                contents,
                templates,
            )]);
        }
        if publications.len() != contents.len() {
            return Err(SpineError::PublicationCountMismatch {
                publications: publications.len(),
                contents: contents.len(),
            });
        }
        Ok(publications
            .into_iter()
            .zip(contents)
            .map(|(publication, content)| {
                PublicationUnit::new(publication, format.clone(), vec![content], templates.clone())
            })
            .collect())
    }

    /// Replace every file-list name by its entries.
    fn expand(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .flat_map(|name| match self.file_lists.get(&name) {
                Some(list) => list.clone(),
                None => vec![name],
            })
            .collect()
    }

    fn check_collisions(&self) -> Result<(), SpineError> {
        let contents = self.content_names();
        match self
            .template_names()
            .into_iter()
            .find(|template| contents.contains(template))
        {
            Some(name) => Err(SpineError::TemplateNameCollision {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Every content name used by a unit, first use order, without repeats.
    pub fn content_names(&self) -> Vec<&str> {
        unique(self.units.iter().flat_map(|unit| unit.contents.iter()))
    }

    /// Every template name used by a unit, first use order, without repeats.
    pub fn template_names(&self) -> Vec<&str> {
        unique(self.units.iter().flat_map(|unit| unit.templates.iter()))
    }

    /// The templates of every unit that renders `content`.
    pub fn templates_for_content(&self, content: &str) -> Vec<&str> {
        unique(
            self.units
                .iter()
                .filter(|unit| unit.contents.iter().any(|name| name == content))
                .flat_map(|unit| unit.templates.iter()),
        )
    }
}

fn missing(tag: &str, subtag: &str) -> SpineError {
    SpineError::MissingSubtag {
        tag: tag.to_string(),
        subtag: subtag.to_string(),
    }
}

fn split_names(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

fn extension_of(name: &str) -> Option<String> {
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => Some(name[dot + 1..].to_string()),
        _ => None,
    }
}

fn unique<'a>(names: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for name in names {
        if !seen.contains(&name.as_str()) {
            seen.push(name);
        }
    }
    seen
}
