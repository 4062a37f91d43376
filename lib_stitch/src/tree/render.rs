use std::fmt::Display;

use super::{NodeKind, Subtree, Tree};

impl<Value: Display> Tree<Value> {
    /// Draws the tree with box drawing characters, one leaf per line.
    ///
    /// Leaves are shown as `> value (index)`.
    /// Branch values and the lengths of the edges below each branch are shown if requested.
    pub fn render(&self, show_value: bool, show_length: bool) -> String {
        let mut lines = Vec::new();
        render_node(self.as_subtree(), "", "", show_value, show_length, &mut lines);
        lines.join("\n")
    }
}

/// `own` is the prefix of the line the subtree starts on, `other` the prefix of all further lines.
fn render_node<Value: Display>(
    subtree: Subtree<'_, Value>,
    own: &str,
    other: &str,
    show_value: bool,
    show_length: bool,
    lines: &mut Vec<String>,
) {
    let NodeKind::Branch { left, right } = subtree.node().kind else {
        lines.push(format!(
            "{own}> {} ({})",
            subtree.value(),
            subtree.leaf_index().unwrap_or_default()
        ));
        return;
    };

    let value = if show_value {
        subtree.value().to_string()
    } else {
        String::new()
    };
    let spacing = " ".repeat(value.chars().count());

    let (mut left_length, mut right_length) = if show_length {
        (format_length(left.length), format_length(right.length))
    } else {
        (String::new(), String::new())
    };
    let width = left_length.chars().count().max(right_length.chars().count());
    for length in [&mut left_length, &mut right_length] {
        let padding = width - length.chars().count();
        length.extend(std::iter::repeat_n('─', padding));
    }
    let length_spacing = " ".repeat(width);

    let tree = subtree.tree();
    render_node(
        tree.subtree(left.child),
        &format!("{own}{value}┬{left_length}"),
        &format!("{other}{spacing}│{length_spacing}"),
        show_value,
        show_length,
        lines,
    );
    render_node(
        tree.subtree(right.child),
        &format!("{other}{spacing}└{right_length}"),
        &format!("{other}{spacing} {length_spacing}"),
        show_value,
        show_length,
        lines,
    );
}

fn format_length(length: f64) -> String {
    format!("{length:.2}─")
}

impl<Value: Display> Display for Tree<Value> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(false, false))
    }
}
