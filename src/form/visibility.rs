use std::collections::HashSet;

use tracing::debug;

use crate::domain::VisibleIf;

use super::{attrs, context::RenderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Visible iff the controller currently holds exactly `rule.equals`. A controller
/// without a live value (suppressed for the role) never matches.
pub fn compute_visibility(rule: &VisibleIf, current: Option<&str>) -> Visibility {
    match current {
        Some(value) if value == rule.equals => Visibility::Visible,
        _ => Visibility::Hidden,
    }
}

#[derive(Debug, Clone)]
struct Dependent {
    field_id: String,
    rule: VisibleIf,
    state: Option<Visibility>,
}

/// Keeps dependent fields' display state in line with their controllers.
///
/// Dependencies are read back from the rendered tree, not from the config.
/// Every change on a subscribed controller re-evaluates all dependents
/// independently; cascades are not ordered.
#[derive(Debug, Clone, Default)]
pub struct VisibilityEngine {
    dependents: Vec<Dependent>,
    subscriptions: HashSet<String>,
}

impl VisibilityEngine {
    /// Index the controls, subscribe to every controller and then run the
    /// first evaluation so no dependent is left unevaluated.
    pub fn attach(ctx: &mut RenderContext) -> Self {
        ctx.index_controls();
        let mut engine = Self::default();
        let doc = &ctx.page().doc;
        for field_id in ctx.field_ids() {
            let Some(handle) = ctx.control(field_id) else {
                continue;
            };
            let group = doc.node(handle.group);
            let (Some(controller), Some(equals)) = (
                group.attr(attrs::VISIBLE_IF_FIELD),
                group.attr(attrs::VISIBLE_IF_EQUALS),
            ) else {
                continue;
            };
            engine.subscriptions.insert(controller.to_string());
            engine.dependents.push(Dependent {
                field_id: field_id.to_string(),
                rule: VisibleIf {
                    field: controller.to_string(),
                    equals: equals.to_string(),
                },
                state: None,
            });
        }
        debug!(
            dependents = engine.dependents.len(),
            controllers = engine.subscriptions.len(),
            "visibility listeners attached"
        );
        engine.refresh(ctx);
        engine
    }

    pub fn is_subscribed(&self, controller: &str) -> bool {
        self.subscriptions.contains(controller)
    }

    pub fn dependent_count(&self) -> usize {
        self.dependents.len()
    }

    /// Change notification for `field_id`. Returns whether a recompute ran.
    pub fn notify(&mut self, ctx: &mut RenderContext, field_id: &str) -> bool {
        if !self.is_subscribed(field_id) {
            return false;
        }
        self.refresh(ctx);
        true
    }

    pub fn refresh(&mut self, ctx: &mut RenderContext) {
        for dependent in &mut self.dependents {
            let next = compute_visibility(&dependent.rule, ctx.value(&dependent.rule.field));
            if dependent.state != Some(next) {
                debug!(field = %dependent.field_id, state = ?next, "visibility changed");
            }
            dependent.state = Some(next);
            if let Some(handle) = ctx.control(&dependent.field_id).copied() {
                ctx.page_mut()
                    .doc
                    .set_hidden(handle.group, next == Visibility::Hidden);
            }
        }
    }

    pub fn state(&self, field_id: &str) -> Option<Visibility> {
        self.dependents
            .iter()
            .find(|dependent| dependent.field_id == field_id)
            .and_then(|dependent| dependent.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(equals: &str) -> VisibleIf {
        VisibleIf {
            field: "controller".into(),
            equals: equals.into(),
        }
    }

    #[test]
    fn exact_match_is_visible() {
        assert_eq!(compute_visibility(&rule("yes"), Some("yes")), Visibility::Visible);
    }

    #[test]
    fn comparison_has_no_coercion() {
        assert_eq!(compute_visibility(&rule("1"), Some("1.0")), Visibility::Hidden);
        assert_eq!(compute_visibility(&rule("Yes"), Some("yes")), Visibility::Hidden);
        assert_eq!(compute_visibility(&rule("yes"), Some(" yes")), Visibility::Hidden);
    }

    #[test]
    fn empty_target_matches_empty_value_only() {
        assert_eq!(compute_visibility(&rule(""), Some("")), Visibility::Visible);
        assert_eq!(compute_visibility(&rule(""), None), Visibility::Hidden);
    }

    #[test]
    fn missing_controller_value_is_hidden() {
        assert_eq!(compute_visibility(&rule("yes"), None), Visibility::Hidden);
    }
}
