use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::page::{Node, NodeId, Tag};

use super::{classes, context::RenderContext};

pub const VALIDATION_MESSAGE: &str = "Please fix the errors above before submitting.";
pub const VALIDATION_SUMMARY_ID: &str = "validation-summary";

static DATE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid date pattern")
});
static TIME_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d(:[0-5]\d)?$").expect("valid time pattern")
});

/// Flat field-id to value capture, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionSnapshot(IndexMap<String, String>);

impl SubmissionSnapshot {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = IndexMap::new();
        for (key, value) in pairs {
            map.insert(key.into(), value.into());
        }
        Self(map)
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.0.get(field_id).map(String::as_str)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.0.contains_key(field_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn as_map(&self) -> &IndexMap<String, String> {
        &self.0
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_compact_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Which controls take part in validity checks and collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPolicy {
    /// Hidden dependent fields are validated and collected like any other.
    #[default]
    IncludeHidden,
    /// Controls inside a hidden group are skipped entirely.
    ExcludeHidden,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    Rejected,
    Accepted,
}

/// The submit notification. Its default action (navigation) is always prevented.
#[derive(Debug, Clone, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidity {
    ValueMissing,
    TypeMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidControl {
    pub name: String,
    pub reason: Invalidity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(SubmissionSnapshot),
    Rejected { invalid: Vec<InvalidControl> },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionHandler {
    policy: SubmissionPolicy,
    phase: SubmitPhase,
    summary: Option<NodeId>,
    last_snapshot: Option<SubmissionSnapshot>,
}

impl SubmissionHandler {
    pub fn new(policy: SubmissionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> SubmissionPolicy {
        self.policy
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn last_snapshot(&self) -> Option<&SubmissionSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// The validation summary element, once a submission has been rejected.
    pub fn summary(&self) -> Option<NodeId> {
        self.summary
    }

    pub fn handle(
        &mut self,
        ctx: &mut RenderContext,
        event: &mut SubmitEvent,
    ) -> serde_json::Result<SubmitOutcome> {
        event.prevent_default();
        self.phase = SubmitPhase::Validating;

        let candidates = self.candidates(ctx);
        let invalid: Vec<InvalidControl> = candidates
            .iter()
            .filter_map(|id| check_validity(ctx.page().doc.node(*id)))
            .collect();

        if !invalid.is_empty() {
            self.phase = SubmitPhase::Rejected;
            debug!(count = invalid.len(), "submission rejected");
            self.show_summary(ctx);
            self.phase = SubmitPhase::Idle;
            return Ok(SubmitOutcome::Rejected { invalid });
        }

        self.phase = SubmitPhase::Accepted;
        self.hide_summary(ctx);
        let snapshot = collect(ctx, &candidates);
        let rendered = snapshot.to_pretty_json()?;
        let page = ctx.page_mut();
        let (output, content) = (page.output, page.output_content);
        page.doc.set_text(content, rendered);
        page.doc.set_hidden(output, false);
        info!(fields = snapshot.len(), "submission accepted");
        self.last_snapshot = Some(snapshot.clone());
        self.phase = SubmitPhase::Idle;
        Ok(SubmitOutcome::Accepted(snapshot))
    }

    fn candidates(&self, ctx: &RenderContext) -> Vec<NodeId> {
        let page = ctx.page();
        page.doc
            .descendants(page.form)
            .into_iter()
            .filter(|id| {
                let node = page.doc.node(*id);
                node.tag.is_control() && node.name().is_some()
            })
            .filter(|id| match self.policy {
                SubmissionPolicy::IncludeHidden => true,
                SubmissionPolicy::ExcludeHidden => page.doc.is_displayed(*id),
            })
            .collect()
    }

    fn show_summary(&mut self, ctx: &mut RenderContext) {
        let page = ctx.page_mut();
        let summary = match self.summary {
            Some(summary) => summary,
            None => {
                let summary = page.doc.append_new(
                    page.form,
                    Node::new(Tag::Div)
                        .with_id(VALIDATION_SUMMARY_ID)
                        .with_class(classes::VALIDATION_SUMMARY)
                        .with_attr("role", "alert"),
                );
                self.summary = Some(summary);
                summary
            }
        };
        page.doc.set_text(summary, VALIDATION_MESSAGE);
        page.doc.set_hidden(summary, false);
    }

    fn hide_summary(&mut self, ctx: &mut RenderContext) {
        if let Some(summary) = self.summary {
            let doc = &mut ctx.page_mut().doc;
            doc.set_text(summary, "");
            doc.set_hidden(summary, true);
        }
    }
}

fn check_validity(node: &Node) -> Option<InvalidControl> {
    let name = node.name()?.to_string();
    let value = node.value.as_str();
    if value.is_empty() {
        return node.is_required().then_some(InvalidControl {
            name,
            reason: Invalidity::ValueMissing,
        });
    }
    let pattern = match (node.tag, node.attr("type")) {
        (Tag::Input, Some("date")) => &DATE_VALUE,
        (Tag::Input, Some("time")) => &TIME_VALUE,
        _ => return None,
    };
    (!pattern.is_match(value)).then_some(InvalidControl {
        name,
        reason: Invalidity::TypeMismatch,
    })
}

/// Form-collection semantics: document order, a repeated name keeps its first
/// position and takes the last value.
fn collect(ctx: &RenderContext, candidates: &[NodeId]) -> SubmissionSnapshot {
    let doc = &ctx.page().doc;
    SubmissionSnapshot::from_pairs(candidates.iter().filter_map(|id| {
        let node = doc.node(*id);
        node.name().map(|name| (name, node.value.as_str()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: &str, value: &str, required: bool) -> Node {
        let mut node = Node::new(Tag::Input)
            .with_attr("name", "f")
            .with_attr("type", kind)
            .with_value(value);
        if required {
            node = node.with_attr("required", "");
        }
        node
    }

    #[test]
    fn required_empty_is_value_missing() {
        let invalid = check_validity(&input("text", "", true)).expect("invalid");
        assert_eq!(invalid.reason, Invalidity::ValueMissing);
        assert!(check_validity(&input("text", "", false)).is_none());
        assert!(check_validity(&input("text", " ", true)).is_none());
    }

    #[test]
    fn date_and_time_values_must_be_well_formed() {
        assert!(check_validity(&input("date", "2024-02-29", false)).is_none());
        assert_eq!(
            check_validity(&input("date", "29/02/2024", false)).map(|i| i.reason),
            Some(Invalidity::TypeMismatch)
        );
        assert!(check_validity(&input("time", "23:59", true)).is_none());
        assert!(check_validity(&input("time", "07:30:15", true)).is_none());
        assert_eq!(
            check_validity(&input("time", "24:00", true)).map(|i| i.reason),
            Some(Invalidity::TypeMismatch)
        );
    }

    #[test]
    fn snapshot_keeps_first_position_and_last_value() {
        let snapshot = SubmissionSnapshot::from_pairs([("a", "1"), ("b", "2"), ("a", "3")]);
        let keys: Vec<&str> = snapshot.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(snapshot.get("a"), Some("3"));
    }

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let snapshot = SubmissionSnapshot::from_pairs([("summary", "x")]);
        assert_eq!(
            snapshot.to_pretty_json().unwrap(),
            "{\n  \"summary\": \"x\"\n}"
        );
    }

    #[test]
    fn submit_event_default_is_not_prevented_until_handled() {
        let mut event = SubmitEvent::new();
        assert!(!event.is_default_prevented());
        event.prevent_default();
        assert!(event.is_default_prevented());
    }
}
