//! Rule application
//!
//!     The compositor walks the content of a publication unit and writes into an
//!     [OutputTree]. For every tagged node it builds a [ContentPiece]:
//!
//!     - a tag-list rule wins: it consumes the run of siblings whose tags it lists and
//!       renders them as one decorated list
//!     - otherwise an ordinary `tag` rule applies its sub pieces to the node
//!     - a tagged node without any rule emits nothing
//!
//!     Untagged nodes are transparent: their text is emitted as is, their children are
//!     resolved in turn.
//!
//!     Before the body, the `file-opening` and `file-ending` rules are applied around the
//!     output boundary. Their sub pieces read from the template itself, and `from-next-tag`
//!     searches the first level of the unit's first content file.
//!
//!     Recursion follows the content tree, so its depth is bounded by the nesting of the
//!     source files. Child lists are only followed forward, which keeps malformed persisted
//!     arrays from looping.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use tt_parser::tt::escaping::unescape_line_breaks;
use tt_parser::tt::{NodeArray, NodeIndex, NodeValue};

use crate::content_piece::ContentPiece;
use crate::counters::Counters;
use crate::error::CompositorError;
use crate::output::OutputTree;
use crate::registry::{Registry, RuleRef, Template};
use crate::rules::{is_passive, ListRule, RuleKind, SubPiece};
use crate::spine::PublicationUnit;
use crate::variables::Variables;

/// Composes publication units against a registry.
///
/// Counters live here because `publication` scoped counters run across units.
pub struct Compositor<'a> {
    registry: &'a Registry,
    variables: &'a Variables,
    template_folder: PathBuf,
    counters: Counters,
}

impl<'a> Compositor<'a> {
    pub fn new(
        registry: &'a Registry,
        variables: &'a Variables,
        template_folder: impl Into<PathBuf>,
        counters: Counters,
    ) -> Self {
        Compositor {
            registry,
            variables,
            template_folder: template_folder.into(),
            counters,
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Apply the unit's templates to its content files, joined in order.
    pub fn compose(&mut self, unit: &PublicationUnit) -> Result<OutputTree, CompositorError> {
        for name in &unit.templates {
            self.registry.template(name)?;
        }
        let head_name = unit
            .content_head()
            .ok_or_else(|| CompositorError::MissingExpectedTag {
                tag: "publish".to_string(),
                subtag: "content".to_string(),
            })?;
        let head = self.registry.content(head_name)?;
        let arrays = unit
            .contents
            .iter()
            .map(|name| self.registry.content(name))
            .collect::<Result<Vec<_>, _>>()?;
        let content = NodeArray::join(arrays);

        self.counters.reset_file_scope();
        debug!(
            "composing {} from {} content nodes with templates {:?}",
            unit.file_name(),
            content.len(),
            unit.templates
        );

        let mut context = CompositionContext {
            registry: self.registry,
            variables: self.variables,
            template_folder: &self.template_folder,
            counters: &mut self.counters,
            active: &unit.templates,
            head,
            output: OutputTree::new(),
        };
        context.compose_unit(&content)?;
        Ok(context.output)
    }
}

/// Everything one publication unit needs while its rules are applied.
struct CompositionContext<'c> {
    registry: &'c Registry,
    variables: &'c Variables,
    template_folder: &'c Path,
    counters: &'c mut Counters,
    /// Template names, lowest priority first.
    active: &'c [String],
    /// The first content file of the unit.
    head: &'c NodeArray,
    output: OutputTree,
}

/// What fills one tag-list item.
#[derive(Clone, Copy)]
enum ItemBody<'c> {
    /// The sibling's own `tag` rule.
    Rule(RuleRef<'c>),
    /// The sibling has no rule: its children, each through its own rule.
    Children,
}

/// Children of `index` that come after it in the array.
fn forward_children(data: &NodeArray, index: NodeIndex) -> Vec<NodeIndex> {
    data.children(index)
        .iter()
        .copied()
        .filter(|&child| child > index)
        .collect()
}

impl<'c> CompositionContext<'c> {
    fn compose_unit(&mut self, content: &NodeArray) -> Result<(), CompositorError> {
        self.apply_frame(RuleKind::FileOpening)?;
        self.output.insert_boundary();
        self.apply_frame(RuleKind::FileEnding)?;
        self.output.enter_boundary();
        self.resolve_nodes(content, &content.roots())
    }

    /// Apply `file-opening` or `file-ending`: the rule's own value, then its sub pieces.
    fn apply_frame(&mut self, kind: RuleKind) -> Result<(), CompositorError> {
        let registry = self.registry;
        let Some(rule) = registry.lookup(self.active, kind.as_str()) else {
            return Ok(());
        };
        debug!("{}: applying {}", rule.template.name(), kind.as_str());
        self.emit_value(rule.first_value());
        self.apply_pieces(rule.template, rule.sub_pieces(), true, rule.rules(), rule.index)
    }

    fn emit_value(&mut self, value: &str) {
        self.output.push_text(&unescape_line_breaks(value));
    }

    /// Emit a node: leaf text as is, containers through the rule pipeline.
    fn emit_node(&mut self, data: &NodeArray, index: NodeIndex) -> Result<(), CompositorError> {
        match data.get(index).map(|node| &node.value) {
            Some(NodeValue::Text(text)) => self.emit_value(text),
            Some(NodeValue::Children(_)) => {
                self.resolve_nodes(data, &forward_children(data, index))?;
            }
            None => {}
        }
        Ok(())
    }

    /// Resolve a list of sibling indices, in order.
    fn resolve_nodes(
        &mut self,
        data: &NodeArray,
        siblings: &[NodeIndex],
    ) -> Result<(), CompositorError> {
        let mut position = 0;
        while position < siblings.len() {
            let index = siblings[position];
            let Some(node) = data.get(index) else {
                position += 1;
                continue;
            };
            if !node.is_tagged() {
                self.emit_node(data, index)?;
                position += 1;
                continue;
            }

            let piece = ContentPiece::new(self.registry, self.active, data, index);
            if let Some(list_rule) = piece.list_rule {
                let consumed = self.apply_tag_list(list_rule, data, &siblings[position..])?;
                position += consumed.max(1);
                continue;
            }
            match piece.tag_rule {
                Some(rule) => self.apply_tag_rule(rule, data, piece.index)?,
                None => debug!("no rule for tag '{}'", node.tag),
            }
            position += 1;
        }
        Ok(())
    }

    fn apply_tag_rule(
        &mut self,
        rule: RuleRef<'c>,
        data: &NodeArray,
        index: NodeIndex,
    ) -> Result<(), CompositorError> {
        match rule.kind() {
            Some(RuleKind::Tag) => {
                self.apply_pieces(rule.template, rule.sub_pieces(), false, data, index)
            }
            Some(RuleKind::CatchingTag) => Err(CompositorError::CatchingTagNotImplemented {
                template: rule.template.name().to_string(),
                tag: data
                    .get(index)
                    .map(|node| node.tag.clone())
                    .unwrap_or_default(),
            }),
            _ => Err(rule.unsupported()),
        }
    }

    /// Apply sub pieces of `template` with `current` as the content node in `data`.
    ///
    /// `frame` marks `file-opening`/`file-ending`, which changes where `from-next-tag`
    /// looks.
    fn apply_pieces(
        &mut self,
        template: &'c Template,
        pieces: &[NodeIndex],
        frame: bool,
        data: &NodeArray,
        current: NodeIndex,
    ) -> Result<(), CompositorError> {
        let rules = template.rules();
        let mut content_seen = false;

        for &piece in pieces {
            let Some(node) = rules.get(piece) else {
                continue;
            };
            if is_passive(&node.tag) {
                continue;
            }
            let kind =
                SubPiece::from_tag(&node.tag).ok_or_else(|| CompositorError::UnsupportedSubtag {
                    template: template.name().to_string(),
                    subtag: node.tag.clone(),
                })?;

            match kind {
                SubPiece::Text => self.emit_first_child(rules, piece)?,
                SubPiece::Space => self.output.push_text(" "),
                SubPiece::NewLine => self.output.push_text("\n"),
                SubPiece::FromSubtag => {
                    if let Some(found) = data.child_with_tag(current, rules.first_value(piece)) {
                        self.emit_node(data, found)?;
                    }
                }
                SubPiece::FromNextTag => {
                    let tag = rules.first_text(piece);
                    let value = if frame {
                        let head = self.head;
                        head.root_with_tag(tag).map(|found| head.first_value(found))
                    } else {
                        data.next_sibling_with_tag(current, tag)
                            .map(|found| data.first_value(found))
                    };
                    self.emit_value(value.unwrap_or(""));
                }
                SubPiece::FromVar => {
                    let variables = self.variables;
                    self.emit_value(variables.get(rules.first_value(piece))?);
                }
                SubPiece::FromCounter => {
                    let value = self.counters.take(rules.first_value(piece))?;
                    self.output.push_text(&value.to_string());
                }
                SubPiece::FromFile => {
                    let path = self.template_folder.join(rules.first_text(piece));
                    let text = fs::read_to_string(&path)
                        .map_err(|source| CompositorError::FileRead { path, source })?;
                    self.output.push_text(&text);
                }
                SubPiece::Content => {
                    if content_seen {
                        return Err(CompositorError::RepeatedContentSubtag {
                            template: template.name().to_string(),
                        });
                    }
                    content_seen = true;
                    self.emit_node(data, current)?;
                }
            }
        }
        Ok(())
    }

    /// `text`: a literal first child, or mixed content resolved against the template.
    fn emit_first_child(
        &mut self,
        rules: &NodeArray,
        piece: NodeIndex,
    ) -> Result<(), CompositorError> {
        match forward_children(rules, piece).first() {
            Some(&first) => self.emit_node(rules, first),
            None => Ok(()),
        }
    }

    /// Render the run of siblings starting at `run[0]` through a tag-list rule.
    ///
    /// Returns the number of siblings consumed.
    fn apply_tag_list(
        &mut self,
        list_rule: RuleRef<'c>,
        data: &NodeArray,
        run: &[NodeIndex],
    ) -> Result<usize, CompositorError> {
        let Some(&start) = run.first() else {
            return Ok(0);
        };
        let template = list_rule.template;
        let list = ListRule::compile(template, list_rule.index)?;
        debug!(
            "{}: tag-list over {:?} starting at node {}",
            template.name(),
            list.triggers,
            start
        );

        self.apply_pieces(template, &list.opening, false, data, start)?;

        let mut consumed = 0;
        let mut rendered = 0;
        for &sibling in run {
            let Some(node) = data.get(sibling) else {
                break;
            };
            if !list.triggers_on(&node.tag) {
                break;
            }
            consumed += 1;

            let piece = ContentPiece::new(self.registry, self.active, data, sibling);
            if let Some(other) = piece.list_rule {
                if !other.same_rule(&list_rule) {
                    return Err(CompositorError::OverlappedListRule {
                        template: other.template.name().to_string(),
                        rule_tag: other.rule_tag().to_string(),
                    });
                }
            }

            match piece.tag_rule {
                Some(rule) => match rule.kind() {
                    Some(RuleKind::Tag) => {
                        self.render_item(
                            &list,
                            template,
                            ItemBody::Rule(rule),
                            data,
                            sibling,
                            rendered,
                        )?;
                        rendered += 1;
                    }
                    Some(RuleKind::CatchingTag | RuleKind::TagList) => {
                        return Err(CompositorError::OverlappedListRule {
                            template: rule.template.name().to_string(),
                            rule_tag: rule.rule_tag().to_string(),
                        })
                    }
                    _ => return Err(rule.unsupported()),
                },
                // no rule of its own: one item around its children, resolved in turn
                None => {
                    self.render_item(&list, template, ItemBody::Children, data, sibling, rendered)?;
                    rendered += 1;
                }
            }
        }

        self.apply_pieces(template, &list.closing, false, data, start)?;
        Ok(consumed)
    }

    /// Separator, item opening, the node's body, item closing.
    fn render_item(
        &mut self,
        list: &ListRule,
        template: &'c Template,
        body: ItemBody<'c>,
        data: &NodeArray,
        index: NodeIndex,
        rendered: usize,
    ) -> Result<(), CompositorError> {
        let item = list
            .item(rendered)
            .ok_or_else(|| CompositorError::MissingExpectedTag {
                tag: "tag-list".to_string(),
                subtag: "item".to_string(),
            })?;
        if rendered > 0 {
            self.emit_value(&list.separator);
        }
        self.apply_pieces(template, &item.opening, false, data, index)?;
        match body {
            ItemBody::Rule(rule) => self.apply_tag_rule(rule, data, index)?,
            ItemBody::Children => self.resolve_nodes(data, &forward_children(data, index))?,
        }
        self.apply_pieces(template, &item.closing, false, data, index)
    }
}
