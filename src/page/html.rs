use std::fmt::Write;

use super::dom::{Document, NodeId, Tag};

/// Serialize the subtree at `root` to HTML.
pub fn render(doc: &Document, root: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, root, 0, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let node = doc.node(id);
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}<{}", node.tag.name());
    if let Some(dom_id) = &node.id {
        let _ = write!(out, " id=\"{}\"", escape(dom_id));
    }
    if !node.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape(&node.classes.join(" ")));
    }
    for (name, value) in &node.attrs {
        if value.is_empty() {
            let _ = write!(out, " {name}");
        } else {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
    }
    match node.tag {
        Tag::Input => {
            let _ = write!(out, " value=\"{}\"", escape(&node.value));
        }
        Tag::OptionItem => {
            let _ = write!(out, " value=\"{}\"", escape(&node.value));
            let selected = node
                .parent()
                .map(|parent| doc.node(parent).value == node.value)
                .unwrap_or(false);
            if selected {
                out.push_str(" selected");
            }
        }
        _ => {}
    }
    if node.hidden {
        out.push_str(" hidden");
    }
    out.push('>');
    if node.tag == Tag::Input {
        out.push('\n');
        return;
    }
    let body = if node.tag == Tag::Textarea {
        &node.value
    } else {
        &node.text
    };
    out.push_str(&escape(body));
    if node.children().is_empty() {
        let _ = writeln!(out, "</{}>", node.tag.name());
        return;
    }
    out.push('\n');
    for child in node.children() {
        write_node(doc, *child, depth + 1, out);
    }
    let _ = writeln!(out, "{indent}</{}>", node.tag.name());
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
