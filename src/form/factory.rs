use crate::domain::{FieldSpec, FieldType};
use crate::page::{Document, Node, NodeId, Tag};

use super::{
    attrs, classes,
    permission::{self, Decision},
};

pub const REQUIRED_MARKER: &str = " *";

/// Build the detached group element for one field. Suppressed fields become an
/// inert placeholder with no control, hidden for good when the field is
/// conditional; everything else gets label, control and
/// optional help text. A `visibleIf` rule is recorded on the group for the
/// visibility engine.
pub fn build(doc: &mut Document, field: &FieldSpec, role: &str) -> NodeId {
    if permission::decide(field, role) == Decision::Suppress {
        return placeholder(doc, field);
    }

    let mut group = Node::new(Tag::Div)
        .with_id(group_id(&field.id))
        .with_class(classes::GROUP)
        .with_attr(attrs::FIELD_ID, field.id.as_str())
        .with_attr(attrs::FIELD_TYPE, field.kind.as_str());
    if let Some(rule) = &field.visible_if {
        group = group
            .with_attr(attrs::VISIBLE_IF_FIELD, rule.field.as_str())
            .with_attr(attrs::VISIBLE_IF_EQUALS, rule.equals.as_str());
    }
    let group = doc.insert(group);

    let label = doc.append_new(
        group,
        Node::new(Tag::Label)
            .with_attr("for", field.id.as_str())
            .with_text(field.label.as_str()),
    );
    if field.required {
        doc.append_new(
            label,
            Node::new(Tag::Span)
                .with_class(classes::REQUIRED)
                .with_text(REQUIRED_MARKER),
        );
    }

    let control = match field.kind {
        FieldType::Text | FieldType::Date | FieldType::Time => doc.insert(single_line(field)),
        FieldType::Textarea => doc.insert(multi_line(field)),
        FieldType::Select => select(doc, field),
    };
    finish(doc, group, control, field)
}

pub fn group_id(field_id: &str) -> String {
    format!("group-{field_id}")
}

fn finish(doc: &mut Document, group: NodeId, control: NodeId, field: &FieldSpec) -> NodeId {
    doc.append(group, control);
    if let Some(help) = &field.help_text {
        doc.append_new(
            group,
            Node::new(Tag::Small)
                .with_class(classes::HELP)
                .with_text(help.as_str()),
        );
    }
    group
}

fn placeholder(doc: &mut Document, field: &FieldSpec) -> NodeId {
    doc.insert(
        Node::new(Tag::Div)
            .with_id(group_id(&field.id))
            .with_class(classes::GROUP)
            .with_class(classes::SUPPRESSED)
            .with_attr(attrs::FIELD_ID, field.id.as_str())
            .with_attr(attrs::SUPPRESSED, "true")
            .hidden(field.visible_if.is_some()),
    )
}

fn control_base(tag: Tag, field: &FieldSpec) -> Node {
    let mut node = Node::new(tag)
        .with_id(field.id.as_str())
        .with_attr("name", field.id.as_str());
    if field.required {
        node = node.with_attr("required", "");
    }
    node
}

fn with_placeholder(node: Node, field: &FieldSpec) -> Node {
    match &field.placeholder {
        Some(text) => node.with_attr("placeholder", text.as_str()),
        None => node,
    }
}

fn single_line(field: &FieldSpec) -> Node {
    let input_type = match field.kind {
        FieldType::Date => "date",
        FieldType::Time => "time",
        _ => "text",
    };
    with_placeholder(
        control_base(Tag::Input, field).with_attr("type", input_type),
        field,
    )
}

fn multi_line(field: &FieldSpec) -> Node {
    let mut node = with_placeholder(control_base(Tag::Textarea, field), field);
    if let Some(rows) = field.rows {
        node = node.with_attr("rows", rows.to_string());
    }
    node
}

fn select(doc: &mut Document, field: &FieldSpec) -> NodeId {
    let first = field.options.first().cloned().unwrap_or_default();
    let select = doc.insert(control_base(Tag::Select, field).with_value(first));
    for option in &field.options {
        doc.append_new(
            select,
            Node::new(Tag::OptionItem)
                .with_value(option.as_str())
                .with_text(option.as_str()),
        );
    }
    select
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(field: &FieldSpec, role: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let group = build(&mut doc, field, role);
        (doc, group)
    }

    fn control_of(doc: &Document, group: NodeId) -> Option<NodeId> {
        doc.find_descendant(group, |node| node.tag.is_control())
    }

    #[test]
    fn text_date_time_pick_the_input_kind() {
        for (kind, expected) in [
            (FieldType::Text, "text"),
            (FieldType::Date, "date"),
            (FieldType::Time, "time"),
        ] {
            let field = FieldSpec::new("when", "When", kind);
            let (doc, group) = built(&field, "user");
            let control = control_of(&doc, group).expect("control");
            let node = doc.node(control);
            assert_eq!(node.tag, Tag::Input);
            assert_eq!(node.attr("type"), Some(expected));
            assert_eq!(node.id.as_deref(), Some("when"));
            assert_eq!(node.name(), Some("when"));
        }
    }

    #[test]
    fn textarea_sets_rows_only_when_given() {
        let mut field = FieldSpec::new("notes", "Notes", FieldType::Textarea);
        let (doc, group) = built(&field, "user");
        let control = control_of(&doc, group).expect("control");
        assert_eq!(doc.node(control).tag, Tag::Textarea);
        assert_eq!(doc.node(control).attr("rows"), None);

        field.rows = Some(6);
        let (doc, group) = built(&field, "user");
        let control = control_of(&doc, group).expect("control");
        assert_eq!(doc.node(control).attr("rows"), Some("6"));
    }

    #[test]
    fn select_keeps_option_order_and_defaults_to_first() {
        let field = FieldSpec::new("severity", "Severity", FieldType::Select)
            .with_options(["low", "medium", "high"]);
        let (doc, group) = built(&field, "user");
        let control = control_of(&doc, group).expect("control");
        assert_eq!(doc.option_values(control), vec!["low", "medium", "high"]);
        assert_eq!(doc.node(control).value, "low");
        let texts: Vec<&str> = doc
            .node(control)
            .children()
            .iter()
            .map(|id| doc.node(*id).text.as_str())
            .collect();
        assert_eq!(texts, vec!["low", "medium", "high"]);
    }

    #[test]
    fn required_adds_marker_and_attribute() {
        let field = FieldSpec::new("summary", "Summary", FieldType::Text).with_required(true);
        let (doc, group) = built(&field, "user");
        let label = doc
            .find_descendant(group, |node| node.tag == Tag::Label)
            .expect("label");
        assert_eq!(doc.node(label).attr("for"), Some("summary"));
        assert_eq!(doc.text_content(label), "Summary *");
        assert!(
            doc.find_descendant(label, |node| node.has_class(classes::REQUIRED))
                .is_some()
        );
        let control = control_of(&doc, group).expect("control");
        assert!(doc.node(control).is_required());
    }

    #[test]
    fn help_text_follows_the_control() {
        let field = FieldSpec::new("summary", "Summary", FieldType::Text)
            .with_help_text("One line is enough");
        let (doc, group) = built(&field, "user");
        let children = doc.node(group).children().to_vec();
        assert_eq!(children.len(), 3);
        assert!(doc.node(children[1]).tag.is_control());
        assert!(doc.node(children[2]).has_class(classes::HELP));
        assert_eq!(doc.node(children[2]).text, "One line is enough");
    }

    #[test]
    fn placeholder_attribute_is_forwarded() {
        let mut field = FieldSpec::new("summary", "Summary", FieldType::Text);
        field.placeholder = Some("e.g. printer on fire".into());
        let (doc, group) = built(&field, "user");
        let control = control_of(&doc, group).expect("control");
        assert_eq!(doc.node(control).attr("placeholder"), Some("e.g. printer on fire"));
    }

    #[test]
    fn visible_if_is_recorded_on_the_group() {
        let field = FieldSpec::new("detail", "Detail", FieldType::Text).with_visible_if("kind", "other");
        let (doc, group) = built(&field, "user");
        let node = doc.node(group);
        assert_eq!(node.attr(attrs::VISIBLE_IF_FIELD), Some("kind"));
        assert_eq!(node.attr(attrs::VISIBLE_IF_EQUALS), Some("other"));
    }

    #[test]
    fn suppressed_field_is_an_inert_placeholder() {
        let field = FieldSpec::new("cost", "Cost", FieldType::Text)
            .with_required(true)
            .with_roles(["admin"]);
        let (doc, group) = built(&field, "user");
        let node = doc.node(group);
        assert!(node.has_class(classes::SUPPRESSED));
        assert_eq!(node.attr(attrs::SUPPRESSED), Some("true"));
        assert_eq!(node.attr(attrs::FIELD_ID), Some("cost"));
        assert!(node.children().is_empty());
        assert!(control_of(&doc, group).is_none());
        assert!(!node.hidden);
    }

    #[test]
    fn suppressed_conditional_placeholder_starts_hidden() {
        let field = FieldSpec::new("secret", "Secret", FieldType::Text)
            .with_roles(["admin"])
            .with_visible_if("kind", "b");
        let (doc, group) = built(&field, "user");
        let node = doc.node(group);
        assert!(node.hidden);
        assert_eq!(node.attr(attrs::VISIBLE_IF_FIELD), None);
    }
}
