use tracing::debug;

use crate::config::FormRequest;
use crate::domain::{FormConfig, Section};
use crate::page::{Node, NodeId, Page, Tag};

use super::{classes, context::RenderContext, factory};

pub const SUBMIT_LABEL: &str = "Submit";

/// Render `config` for the request's role and language into a fresh page.
pub fn assemble(config: &FormConfig, request: &FormRequest) -> RenderContext {
    let mut page = Page::scaffold();
    render_meta(&mut page, config, &request.language);

    let numbered = config.layout.show_section_numbers;
    for (index, section) in config.ordered_sections().into_iter().enumerate() {
        let container = render_section(&mut page, section, index, numbered, &request.role);
        page.doc.append(page.form, container);
    }

    page.doc.append_new(
        page.form,
        Node::new(Tag::Button)
            .with_class(classes::SUBMIT)
            .with_attr("type", "submit")
            .with_text(SUBMIT_LABEL),
    );

    debug!(
        sections = config.sections.len(),
        role = %request.role,
        language = %request.language,
        "assembled form"
    );
    let mut ctx = RenderContext::new(page, request.role.as_str(), request.language.as_str());
    ctx.index_controls();
    ctx
}

pub fn heading_text(index: usize, label: &str, numbered: bool) -> String {
    if numbered {
        format!("{}. {label}", index + 1)
    } else {
        label.to_string()
    }
}

fn render_meta(page: &mut Page, config: &FormConfig, language: &str) {
    let meta = page.meta;
    page.doc
        .append_new(meta, Node::new(Tag::H1).with_text(config.localized_title(language)));
    if let Some(description) = &config.description {
        page.doc.append_new(
            meta,
            Node::new(Tag::P)
                .with_class(classes::DESCRIPTION)
                .with_text(description.as_str()),
        );
    }
}

fn render_section(
    page: &mut Page,
    section: &Section,
    index: usize,
    numbered: bool,
    role: &str,
) -> NodeId {
    let doc = &mut page.doc;
    let container = doc.insert(Node::new(Tag::Div).with_class(classes::SECTION));
    doc.append_new(
        container,
        Node::new(Tag::H2).with_text(heading_text(index, &section.label, numbered)),
    );
    if let Some(help) = &section.help_text {
        doc.append_new(
            container,
            Node::new(Tag::P)
                .with_class(classes::SECTION_HELP)
                .with_text(help.as_str()),
        );
    }
    for field in &section.fields {
        let group = factory::build(doc, field, role);
        doc.append(container, group);
    }
    container
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> FormConfig {
        serde_json::from_value(value).expect("config")
    }

    fn headings(ctx: &RenderContext) -> Vec<String> {
        let doc = &ctx.page().doc;
        doc.descendants(ctx.page().form)
            .into_iter()
            .filter(|id| doc.node(*id).tag == Tag::H2)
            .map(|id| doc.node(id).text.clone())
            .collect()
    }

    #[test]
    fn sections_render_in_ascending_order() {
        let cfg = config(json!({
            "title": "Incident",
            "sections": [
                {"label": "Second", "order": 2},
                {"label": "First", "order": 1}
            ]
        }));
        let ctx = assemble(&cfg, &FormRequest::default());
        assert_eq!(headings(&ctx), vec!["First", "Second"]);
    }

    #[test]
    fn numbered_headings_use_position_not_order_value() {
        let cfg = config(json!({
            "layout": {"showSectionNumbers": true},
            "sections": [
                {"label": "Later", "order": 10},
                {"label": "Tie A", "order": 5},
                {"label": "Tie B", "order": 5}
            ]
        }));
        let ctx = assemble(&cfg, &FormRequest::default());
        assert_eq!(headings(&ctx), vec!["1. Tie A", "2. Tie B", "3. Later"]);
    }

    #[test]
    fn meta_region_carries_localized_title_and_description() {
        let cfg = config(json!({
            "title": "Incident",
            "description": "Report an incident",
            "languages": {"de": {"title": "Vorfall"}}
        }));
        let ctx = assemble(&cfg, &FormRequest::default().with_language("de"));
        let page = ctx.page();
        assert_eq!(page.doc.text_content(page.meta), "VorfallReport an incident");
    }

    #[test]
    fn section_help_precedes_fields_and_submit_is_last() {
        let cfg = config(json!({
            "sections": [{
                "label": "Basics",
                "helpText": "Tell us what happened",
                "fields": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}]
            }]
        }));
        let ctx = assemble(&cfg, &FormRequest::default());
        let doc = &ctx.page().doc;
        let form = doc.node(ctx.page().form);
        let last = *form.children().last().expect("children");
        assert_eq!(doc.node(last).tag, Tag::Button);
        assert_eq!(doc.node(last).attr("type"), Some("submit"));

        let section = form.children()[0];
        let kids = doc.node(section).children();
        assert_eq!(doc.node(kids[0]).tag, Tag::H2);
        assert!(doc.node(kids[1]).has_class(classes::SECTION_HELP));
        assert_eq!(ctx.field_ids().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn heading_text_formats() {
        assert_eq!(heading_text(0, "Basics", true), "1. Basics");
        assert_eq!(heading_text(4, "Basics", false), "Basics");
    }
}
