//! Line-oriented text rendering of a diff tree.
//!
//! Each line starts with a marker column (`' '`, `'-'` or `'+'`) followed by
//! two spaces of indentation per depth. Unchanged mapping entries are left
//! out, unchanged list elements collapse to `...`, and the root mapping is
//! wrapped in ` {` / ` }`.

use serde_json::Value;

use super::{ArrayEntry, DiffNode};

const KEEP: char = ' ';
const REMOVE: char = '-';
const ADD: char = '+';

/// Renders a diff tree as text.
///
/// A tree without changes renders as the empty string.
///
/// # Examples
///
/// ```
/// use config_reconcile::diff::{DiffNode, render};
/// use serde_json::json;
///
/// let tree = DiffNode::Object(vec![(
///     "vars".to_owned(),
///     DiffNode::Object(vec![(
///         "MY_VAR".to_owned(),
///         DiffNode::Changed { old: json!("a"), new: json!("b") },
///     )]),
/// )]);
/// assert_eq!(
///     render(&tree),
///     " {\n   vars: {\n-    MY_VAR: \"a\"\n+    MY_VAR: \"b\"\n   }\n }\n"
/// );
/// ```
#[must_use]
pub fn render(node: &DiffNode) -> String {
    if !node.has_changes() {
        return String::new();
    }
    let mut renderer = Renderer::default();
    renderer.node(None, node, 0);
    renderer.out
}

#[derive(Default)]
struct Renderer {
    out: String,
}

impl Renderer {
    fn line(&mut self, marker: char, depth: usize, text: &str) {
        self.out.push(marker);
        for _ in 0..depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn node(&mut self, key: Option<&str>, node: &DiffNode, depth: usize) {
        match node {
            DiffNode::Unchanged(_) => {}
            DiffNode::Added(value) => self.value(ADD, key, value, depth),
            DiffNode::Removed(value) => self.value(REMOVE, key, value, depth),
            DiffNode::Changed { old, new } => {
                self.value(REMOVE, key, old, depth);
                self.value(ADD, key, new, depth);
            }
            DiffNode::Object(entries) => {
                self.line(KEEP, depth, &format!("{}{{", prefix(key)));
                for (child_key, child) in entries {
                    self.node(Some(child_key), child, depth + 1);
                }
                self.line(KEEP, depth, "}");
            }
            DiffNode::Array(items) => {
                self.line(KEEP, depth, &format!("{}[", prefix(key)));
                for item in items {
                    self.item(item, depth + 1);
                }
                self.line(KEEP, depth, "]");
            }
        }
    }

    fn item(&mut self, item: &ArrayEntry, depth: usize) {
        match item {
            ArrayEntry::Unchanged(_)
            | ArrayEntry::Elided
            | ArrayEntry::Modified(DiffNode::Unchanged(_)) => self.line(KEEP, depth, "..."),
            ArrayEntry::Added(value) => self.value(ADD, None, value, depth),
            ArrayEntry::Removed(value) => self.value(REMOVE, None, value, depth),
            ArrayEntry::Modified(node) => self.node(None, node, depth),
        }
    }

    /// Renders a whole value under one marker.
    fn value(&mut self, marker: char, key: Option<&str>, value: &Value, depth: usize) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                self.line(marker, depth, &format!("{}{{", prefix(key)));
                for (child_key, child) in map {
                    self.value(marker, Some(child_key), child, depth + 1);
                }
                self.line(marker, depth, "}");
            }
            Value::Array(items) if !items.is_empty() => {
                self.line(marker, depth, &format!("{}[", prefix(key)));
                for child in items {
                    self.value(marker, None, child, depth + 1);
                }
                self.line(marker, depth, "]");
            }
            scalar => {
                let text = format!("{}{scalar}", prefix(key));
                self.line(marker, depth, &text);
            }
        }
    }
}

fn prefix(key: Option<&str>) -> String {
    key.map(|name| format!("{name}: ")).unwrap_or_default()
}
