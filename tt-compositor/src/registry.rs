//! Template and content registry
//!
//!     Every parsed template keeps its node array (the rules) and a trigger map from tag
//!     names to rule indices. `tag-list` rules register under `_list_<tag>`, so the same tag
//!     can have an ordinary rule and a list rule at the same time.
//!
//!     Lookup always runs over the active template list of a publication unit, from the last
//!     template to the first: later templates override earlier ones.

use std::collections::HashMap;

use log::debug;
use tt_parser::tt::{NodeArray, NodeIndex};

use crate::counters::{CounterScope, Counters};
use crate::error::CompositorError;
use crate::rules::{list_trigger, RuleKind};

/// A parsed template: its rules and the tags that trigger them.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    rules: NodeArray,
    triggers: HashMap<String, NodeIndex>,
}

impl Template {
    /// Scan every node of `rules` and register the triggers it declares.
    pub fn new(name: impl Into<String>, rules: NodeArray) -> Self {
        let mut triggers = HashMap::new();
        for (index, node) in rules.iter().enumerate() {
            match RuleKind::from_tag(&node.tag) {
                Some(kind @ (RuleKind::FileOpening | RuleKind::FileEnding)) => {
                    triggers.insert(kind.as_str().to_string(), index);
                }
                Some(RuleKind::Tag | RuleKind::CatchingTag) => {
                    triggers.insert(rules.first_value(index).to_string(), index);
                }
                Some(RuleKind::TagList) => {
                    for tag in rules.first_value(index).split_whitespace() {
                        triggers.insert(list_trigger(tag), index);
                    }
                }
                Some(RuleKind::Counter) | None => {}
            }
        }
        Template {
            name: name.into(),
            rules,
            triggers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &NodeArray {
        &self.rules
    }

    /// The rule index registered for a trigger key.
    pub fn trigger(&self, key: &str) -> Option<NodeIndex> {
        self.triggers.get(key).copied()
    }

    /// Trigger keys, sorted.
    pub fn trigger_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.triggers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Declare the counters of this template's `counter` rules.
    ///
    /// `start` and `step` default to 1, `scope` to `file`.
    pub fn declare_counters(&self, counters: &mut Counters) -> Result<(), CompositorError> {
        for (index, node) in self.rules.iter().enumerate() {
            if RuleKind::from_tag(&node.tag) != Some(RuleKind::Counter) {
                continue;
            }
            let name = self.rules.first_value(index);
            let start = self.counter_field(index, name, "start")?;
            let step = self.counter_field(index, name, "step")?;
            let scope = match self.rules.subtag_value(index, "scope") {
                None | Some("") => CounterScope::File,
                Some(value) => value
                    .parse()
                    .map_err(|_| CompositorError::InvalidCounter {
                        name: name.to_string(),
                        field: "scope".to_string(),
                        value: value.to_string(),
                    })?,
            };
            debug!(
                "{}: counter {} (start {}, step {}, {:?} scope)",
                self.name, name, start, step, scope
            );
            counters.declare(name, scope, start, step);
        }
        Ok(())
    }

    fn counter_field(
        &self,
        index: NodeIndex,
        name: &str,
        field: &str,
    ) -> Result<i64, CompositorError> {
        match self.rules.subtag_value(index, field) {
            None | Some("") => Ok(1),
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| CompositorError::InvalidCounter {
                    name: name.to_string(),
                    field: field.to_string(),
                    value: value.to_string(),
                }),
        }
    }
}

/// A rule found by lookup: the template it lives in and its index there.
#[derive(Debug, Clone, Copy)]
pub struct RuleRef<'r> {
    pub template: &'r Template,
    pub index: NodeIndex,
}

impl<'r> RuleRef<'r> {
    pub fn rules(&self) -> &'r NodeArray {
        self.template.rules()
    }

    /// The rule tag, as found in the template.
    pub fn rule_tag(&self) -> &'r str {
        self.rules()
            .get(self.index)
            .map(|node| node.tag.as_str())
            .unwrap_or("")
    }

    pub fn kind(&self) -> Option<RuleKind> {
        RuleKind::from_tag(self.rule_tag())
    }

    pub fn sub_pieces(&self) -> &'r [NodeIndex] {
        self.rules().children(self.index)
    }

    pub fn first_value(&self) -> &'r str {
        self.rules().first_value(self.index)
    }

    /// Same template, same index.
    pub fn same_rule(&self, other: &RuleRef<'_>) -> bool {
        self.template.name() == other.template.name() && self.index == other.index
    }

    pub fn unsupported(&self) -> CompositorError {
        CompositorError::UnsupportedRule {
            template: self.template.name().to_string(),
            rule_tag: self.rule_tag().to_string(),
        }
    }
}

/// Every parsed template and content file of a render.
#[derive(Debug, Default)]
pub struct Registry {
    templates: HashMap<String, Template>,
    contents: HashMap<String, NodeArray>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template; one with the same name is replaced.
    pub fn register_template(&mut self, template: Template) {
        self.templates.insert(template.name().to_string(), template);
    }

    pub fn register_content(&mut self, name: impl Into<String>, array: NodeArray) {
        self.contents.insert(name.into(), array);
    }

    pub fn template(&self, name: &str) -> Result<&Template, CompositorError> {
        self.templates
            .get(name)
            .ok_or_else(|| CompositorError::UnknownTemplate {
                name: name.to_string(),
            })
    }

    pub fn content(&self, name: &str) -> Result<&NodeArray, CompositorError> {
        self.contents
            .get(name)
            .ok_or_else(|| CompositorError::UnknownContent {
                name: name.to_string(),
            })
    }

    /// Template names, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The rule registered under `key` in the highest priority active template.
    pub fn lookup<'r>(&'r self, active: &[String], key: &str) -> Option<RuleRef<'r>> {
        active.iter().rev().find_map(|name| {
            let template = self.templates.get(name)?;
            template
                .trigger(key)
                .map(|index| RuleRef { template, index })
        })
    }

    /// Find the rules for `tag`: the ordinary rule and, with `prefer_list`, the tag-list
    /// rule. Each tier is searched on its own, so both may be found.
    pub fn resolve<'r>(
        &'r self,
        active: &[String],
        tag: &str,
        prefer_list: bool,
    ) -> (Option<RuleRef<'r>>, Option<RuleRef<'r>>) {
        let list_rule = if prefer_list {
            self.lookup(active, &list_trigger(tag))
        } else {
            None
        };
        (self.lookup(active, tag), list_rule)
    }

    /// Declare the counters of every template, in name order.
    pub fn declare_counters(&self, counters: &mut Counters) -> Result<(), CompositorError> {
        for name in self.template_names() {
            self.templates[name].declare_counters(counters)?;
        }
        Ok(())
    }
}
