use indexmap::IndexMap;

use crate::page::{NodeId, Page};

use super::attrs;

/// Live handles for one rendered field. `control` is `None` for suppressed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlHandle {
    pub group: NodeId,
    pub control: Option<NodeId>,
}

/// Per-session state: the page tree, the role in effect and the field lookup
/// derived from the tree. One value per render session; never shared.
#[derive(Debug, Clone)]
pub struct RenderContext {
    page: Page,
    role: String,
    language: String,
    controls: IndexMap<String, ControlHandle>,
}

impl RenderContext {
    pub fn new(page: Page, role: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            page,
            role: role.into(),
            language: language.into(),
            controls: IndexMap::new(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub(crate) fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Rebuild the field lookup from the rendered form, in document order.
    pub fn index_controls(&mut self) {
        let doc = &self.page.doc;
        let mut controls = IndexMap::new();
        for id in doc.descendants(self.page.form) {
            let node = doc.node(id);
            let Some(field_id) = node.attr(attrs::FIELD_ID) else {
                continue;
            };
            let control = doc.find_descendant(id, |child| child.tag.is_control());
            controls.insert(field_id.to_string(), ControlHandle { group: id, control });
        }
        self.controls = controls;
    }

    pub fn control(&self, field_id: &str) -> Option<&ControlHandle> {
        self.controls.get(field_id)
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.controls.keys().map(String::as_str)
    }

    pub fn is_suppressed(&self, field_id: &str) -> bool {
        self.control(field_id)
            .map(|handle| handle.control.is_none())
            .unwrap_or(false)
    }

    /// Current value of an interactive field; `None` when missing or suppressed.
    pub fn value(&self, field_id: &str) -> Option<&str> {
        let control = self.control(field_id)?.control?;
        Some(self.page.doc.node(control).value.as_str())
    }

    pub fn is_displayed(&self, field_id: &str) -> bool {
        self.control(field_id)
            .map(|handle| self.page.doc.is_displayed(handle.group))
            .unwrap_or(false)
    }
}
