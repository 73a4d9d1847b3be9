//! Rule vocabulary
//!
//!     A template is read as a list of rules. The tag of a top level template node says what
//!     kind of rule it is ([RuleKind]); the tags of its children say what to emit
//!     ([SubPiece]). Untagged children are ignored: the first one is the rule's own value,
//!     for example the trigger tag of a `tag` rule.
//!
//!     `tag-list` rules have their own structure (`list`, `item-separator`, `item`), which is
//!     compiled once per application into a [ListRule].

use tt_parser::tt::{NodeIndex, NodeValue, ID_NAME_TAG};

use crate::error::CompositorError;
use crate::registry::Template;

/// Prefix of the trigger keys registered by `tag-list` rules.
pub const LIST_TRIGGER_PREFIX: &str = "_list_";

/// The trigger key of a tag-list rule for `tag`.
pub fn list_trigger(tag: &str) -> String {
    format!("{}{}", LIST_TRIGGER_PREFIX, tag)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    FileOpening,
    FileEnding,
    Tag,
    CatchingTag,
    TagList,
    Counter,
}

impl RuleKind {
    pub fn from_tag(tag: &str) -> Option<RuleKind> {
        match tag {
            "file-opening" => Some(RuleKind::FileOpening),
            "file-ending" => Some(RuleKind::FileEnding),
            "tag" => Some(RuleKind::Tag),
            "catching-tag" => Some(RuleKind::CatchingTag),
            "tag-list" => Some(RuleKind::TagList),
            "counter" => Some(RuleKind::Counter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::FileOpening => "file-opening",
            RuleKind::FileEnding => "file-ending",
            RuleKind::Tag => "tag",
            RuleKind::CatchingTag => "catching-tag",
            RuleKind::TagList => "tag-list",
            RuleKind::Counter => "counter",
        }
    }
}

/// What a child of a rule emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubPiece {
    Text,
    Space,
    NewLine,
    FromSubtag,
    FromNextTag,
    FromVar,
    FromCounter,
    FromFile,
    Content,
}

impl SubPiece {
    pub fn from_tag(tag: &str) -> Option<SubPiece> {
        match tag {
            "text" => Some(SubPiece::Text),
            "space" => Some(SubPiece::Space),
            "new-line" => Some(SubPiece::NewLine),
            "from-subtag" => Some(SubPiece::FromSubtag),
            "from-next-tag" => Some(SubPiece::FromNextTag),
            "from-var" => Some(SubPiece::FromVar),
            "from-counter" => Some(SubPiece::FromCounter),
            "from-file" => Some(SubPiece::FromFile),
            "content" => Some(SubPiece::Content),
            _ => None,
        }
    }
}

/// Children that carry no instruction: the rule's own value and id names.
pub fn is_passive(tag: &str) -> bool {
    tag.is_empty() || tag == ID_NAME_TAG
}

/// The three zones of one `item` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemTemplate {
    /// Pieces before the `content` placeholder.
    pub opening: Vec<NodeIndex>,
    /// Pieces after it.
    pub closing: Vec<NodeIndex>,
}

/// A `tag-list` rule, read out of its template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRule {
    pub triggers: Vec<String>,
    pub opening: Vec<NodeIndex>,
    pub closing: Vec<NodeIndex>,
    pub separator: String,
    pub items: Vec<ItemTemplate>,
}

impl ListRule {
    pub fn compile(template: &Template, index: NodeIndex) -> Result<ListRule, CompositorError> {
        let rules = template.rules();
        let mut list = ListRule {
            triggers: rules
                .first_value(index)
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            ..ListRule::default()
        };

        for &child in rules.children(index) {
            let Some(node) = rules.get(child) else {
                continue;
            };
            match node.tag.as_str() {
                "list" => {
                    let (opening, closing) = split_on_content(template, child, false)?;
                    list.opening = opening;
                    list.closing = closing;
                }
                "item-separator" => list.separator = separator_text(template, child),
                "item" => {
                    let (opening, closing) = split_on_content(template, child, true)?;
                    list.items.push(ItemTemplate { opening, closing });
                }
                tag if is_passive(tag) => {}
                other => {
                    return Err(CompositorError::UnsupportedSubtag {
                        template: template.name().to_string(),
                        subtag: other.to_string(),
                    })
                }
            }
        }
        Ok(list)
    }

    /// The item template for the `k`-th rendered item; the last one is reused.
    pub fn item(&self, k: usize) -> Option<&ItemTemplate> {
        self.items.get(k).or_else(|| self.items.last())
    }

    pub fn triggers_on(&self, tag: &str) -> bool {
        self.triggers.iter().any(|trigger| trigger == tag)
    }
}

/// Split the children of a `list` or `item` block around its single `content` child.
///
/// A `list` block may omit the placeholder, then every piece opens the list.
fn split_on_content(
    template: &Template,
    block: NodeIndex,
    require_content: bool,
) -> Result<(Vec<NodeIndex>, Vec<NodeIndex>), CompositorError> {
    let rules = template.rules();
    let mut opening = Vec::new();
    let mut closing = Vec::new();
    let mut content_seen = false;

    for &child in rules.children(block) {
        let tag = rules.get(child).map(|node| node.tag.as_str()).unwrap_or("");
        if tag == "content" {
            if content_seen {
                return Err(CompositorError::RepeatedContentSubtag {
                    template: template.name().to_string(),
                });
            }
            content_seen = true;
        } else if content_seen {
            closing.push(child);
        } else {
            opening.push(child);
        }
    }

    if require_content && !content_seen {
        return Err(CompositorError::MissingExpectedTag {
            tag: rules.get(block).map(|node| node.tag.clone()).unwrap_or_default(),
            subtag: "content".to_string(),
        });
    }
    Ok((opening, closing))
}

/// The literal put between two items.
fn separator_text(template: &Template, block: NodeIndex) -> String {
    let rules = template.rules();
    let mut separator = String::new();
    for &child in rules.children(block) {
        let Some(node) = rules.get(child) else {
            continue;
        };
        match (node.tag.as_str(), &node.value) {
            ("space", _) => separator.push(' '),
            ("new-line", _) => separator.push('\n'),
            ("text", _) => separator.push_str(rules.first_text(child)),
            ("", NodeValue::Text(text)) => separator.push_str(text),
            _ => {}
        }
    }
    separator
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_parser::tt::DocumentLoader;

    fn template(source: &str) -> Template {
        Template::new("t", DocumentLoader::from_string(source).parse().unwrap())
    }

    #[test]
    fn test_rule_kinds_round_trip() {
        for tag in [
            "file-opening",
            "file-ending",
            "tag",
            "catching-tag",
            "tag-list",
            "counter",
        ] {
            assert_eq!(RuleKind::from_tag(tag).unwrap().as_str(), tag);
        }
        assert_eq!(RuleKind::from_tag("text"), None);
    }

    #[test]
    fn test_sub_pieces() {
        assert_eq!(SubPiece::from_tag("from-counter"), Some(SubPiece::FromCounter));
        assert_eq!(SubPiece::from_tag("list"), None);
        assert!(is_passive(""));
        assert!(is_passive(ID_NAME_TAG));
    }

    #[test]
    fn test_compile_list_rule() {
        let template = template(
            "#tag-list item entry\n##list\n###text <ul>\n###content\n###text </ul>\n##item-separator\n###space\n##item\n###text <li>\n###content\n###text </li>\n",
        );
        let list = ListRule::compile(&template, 0).unwrap();
        assert_eq!(list.triggers, vec!["item", "entry"]);
        assert_eq!(list.opening.len(), 1);
        assert_eq!(list.closing.len(), 1);
        assert_eq!(list.separator, " ");
        assert_eq!(list.items.len(), 1);
        assert!(list.triggers_on("entry"));
        assert!(!list.triggers_on("para"));
    }

    #[test]
    fn test_item_template_is_reused() {
        let template = template(
            "#tag-list item\n##item\n###text odd\n###content\n##item\n###text even\n###content\n",
        );
        let list = ListRule::compile(&template, 0).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.item(0), list.items.first());
        assert_eq!(list.item(5), list.items.last());
    }

    #[test]
    fn test_item_needs_exactly_one_content() {
        let missing = template("#tag-list item\n##item\n###text <li>\n");
        assert!(matches!(
            ListRule::compile(&missing, 0),
            Err(CompositorError::MissingExpectedTag { ref tag, ref subtag }) if tag == "item" && subtag == "content"
        ));

        let repeated = template("#tag-list item\n##item\n###content\n###content\n");
        assert!(matches!(
            ListRule::compile(&repeated, 0),
            Err(CompositorError::RepeatedContentSubtag { .. })
        ));
    }

    #[test]
    fn test_unknown_block_is_rejected() {
        let template = template("#tag-list item\n##items\n");
        assert!(matches!(
            ListRule::compile(&template, 0),
            Err(CompositorError::UnsupportedSubtag { ref subtag, .. }) if subtag == "items"
        ));
    }
}
