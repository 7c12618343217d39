use tracing::{debug, info};

use crate::config::{ConfigProvider, FormRequest};
use crate::domain::FormConfig;
use crate::error::{FormError, FormResult};
use crate::page::Page;

use super::{
    assembler,
    context::RenderContext,
    submission::{SubmissionHandler, SubmissionPolicy, SubmitEvent, SubmitOutcome},
    visibility::{Visibility, VisibilityEngine},
};

/// One render session: assemble, attach visibility, then serve edits and submits.
#[derive(Debug, Clone)]
pub struct FormSession {
    config: FormConfig,
    ctx: RenderContext,
    visibility: VisibilityEngine,
    submission: SubmissionHandler,
}

impl FormSession {
    pub fn mount(config: FormConfig, request: &FormRequest) -> FormResult<Self> {
        Self::mount_with_policy(config, request, SubmissionPolicy::default())
    }

    pub fn mount_with_policy(
        config: FormConfig,
        request: &FormRequest,
        policy: SubmissionPolicy,
    ) -> FormResult<Self> {
        config.validate()?;
        let mut ctx = assembler::assemble(&config, request);
        let visibility = VisibilityEngine::attach(&mut ctx);
        info!(
            form = %request.kind,
            role = %request.role,
            fields = ctx.field_ids().count(),
            "form mounted"
        );
        Ok(Self {
            config,
            ctx,
            visibility,
            submission: SubmissionHandler::new(policy),
        })
    }

    /// Fetch the configuration for `request.kind` and mount it.
    pub fn open(provider: &dyn ConfigProvider, request: &FormRequest) -> FormResult<Self> {
        let config = provider.load(&request.kind)?;
        Self::mount(config, request)
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn page(&self) -> &Page {
        self.ctx.page()
    }

    pub fn policy(&self) -> SubmissionPolicy {
        self.submission.policy()
    }

    /// Set a field's value as user input would, then notify listeners.
    /// Returns whether the stored value changed.
    pub fn input(&mut self, field_id: &str, value: &str) -> FormResult<bool> {
        let handle = self
            .ctx
            .control(field_id)
            .copied()
            .ok_or_else(|| FormError::UnknownField(field_id.to_string()))?;
        let control = handle
            .control
            .ok_or_else(|| FormError::NotInteractive(field_id.to_string()))?;
        let changed = self.ctx.page_mut().doc.set_value(control, value);
        if changed {
            debug!(field = field_id, "value changed");
            self.visibility.notify(&mut self.ctx, field_id);
        }
        Ok(changed)
    }

    pub fn value(&self, field_id: &str) -> Option<&str> {
        self.ctx.value(field_id)
    }

    /// Current display state of a dependent field; plain fields report `Visible`
    /// unless suppressed or unknown.
    pub fn visibility(&self, field_id: &str) -> Option<Visibility> {
        if let Some(state) = self.visibility.state(field_id) {
            return Some(state);
        }
        self.ctx.control(field_id)?.control?;
        Some(Visibility::Visible)
    }

    pub fn submit(&mut self) -> FormResult<SubmitOutcome> {
        let mut event = SubmitEvent::new();
        self.submission
            .handle(&mut self.ctx, &mut event)
            .map_err(FormError::from)
    }

    pub fn last_snapshot(&self) -> Option<&super::SubmissionSnapshot> {
        self.submission.last_snapshot()
    }

    pub fn validation_message(&self) -> Option<&str> {
        let doc = &self.page().doc;
        let summary = self.submission.summary()?;
        doc.is_displayed(summary)
            .then(|| doc.node(summary).text.as_str())
    }
}
