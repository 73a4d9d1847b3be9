//! Treeviz formatter for node arrays
//!
//! Treeviz is a one line per node view of a node array. Nesting is drawn with box
//! connectors, which makes it quick to check where the parser attached each tag.
//!
//! The format is:
//!     <prefix><connector> <icon> <label> (label truncated to 30 characters)
//!
//! Example, for `#toc#` followed by `#ref|anchor /*b*/this*/ now`:
//!
//!     ⧉ inline.tt
//!     ├─ # toc
//!     └─ § ref: this nowanchor
//!       ├─ ¶ this now
//!       │ ├─ # b: this
//!       │ └─ ◦  now
//!       └─ ⌗ _id_name: anchor
//!
//! Icons
//!     Tagged container: §
//!     Untagged container: ¶
//!     Text: ◦
//!     Tagged text: #
//!     Id name: ⌗

use crate::tt::ast::{Node, NodeArray, NodeIndex, NodeValue, ID_NAME_TAG};

const LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn icon(node: &Node) -> &'static str {
    match (&node.value, node.tag.as_str()) {
        (NodeValue::Text(_), ID_NAME_TAG) => "⌗",
        (NodeValue::Text(_), "") => "◦",
        (NodeValue::Text(_), _) => "#",
        (NodeValue::Children(_), "") => "¶",
        (NodeValue::Children(_), _) => "§",
    }
}

fn label(array: &NodeArray, index: NodeIndex) -> String {
    let node = &array[index];
    let value = match &node.value {
        NodeValue::Text(text) => text.clone(),
        NodeValue::Children(_) => array.raw_value(index),
    };
    if node.is_tagged() && value.is_empty() {
        node.tag.clone()
    } else if node.is_tagged() {
        truncate(&format!("{}: {}", node.tag, value), LABEL_WIDTH)
    } else {
        truncate(&value, LABEL_WIDTH)
    }
}

/// Child indices that can be drawn: in range and strictly after their parent.
fn drawable_children(array: &NodeArray, index: NodeIndex) -> Vec<NodeIndex> {
    array
        .children(index)
        .iter()
        .copied()
        .filter(|&child| child > index && child < array.len())
        .collect()
}

fn format_node(
    array: &NodeArray,
    index: NodeIndex,
    prefix: &str,
    is_last: bool,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        icon(&array[index]),
        label(array, index)
    ));

    let children = drawable_children(array, index);
    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    for (i, &child) in children.iter().enumerate() {
        format_node(array, child, &child_prefix, i == children.len() - 1, output);
    }
}

/// Render a node array, headed by the name of the file it came from.
pub fn to_treeviz_str(array: &NodeArray, name: &str) -> String {
    let mut output = format!("⧉ {}\n", name);
    let roots = array.roots();
    for (i, &root) in roots.iter().enumerate() {
        format_node(array, root, "", i == roots.len() - 1, &mut output);
    }
    output
}
