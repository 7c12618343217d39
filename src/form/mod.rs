pub mod assembler;
mod context;
pub mod factory;
pub mod permission;
mod session;
pub mod submission;
pub mod visibility;

pub use assembler::assemble;
pub use context::{ControlHandle, RenderContext};
pub use permission::Decision;
pub use session::FormSession;
pub use submission::{
    InvalidControl, Invalidity, SubmissionHandler, SubmissionPolicy, SubmissionSnapshot,
    SubmitEvent, SubmitOutcome, SubmitPhase, VALIDATION_MESSAGE,
};
pub use visibility::{Visibility, VisibilityEngine, compute_visibility};

/// Attribute names shared between the factory and the components that read
/// the rendered tree back.
pub(crate) mod attrs {
    pub const FIELD_ID: &str = "data-field-id";
    pub const SUPPRESSED: &str = "data-suppressed";
    pub const VISIBLE_IF_FIELD: &str = "data-visible-if-field";
    pub const VISIBLE_IF_EQUALS: &str = "data-visible-if-equals";
    pub const FIELD_TYPE: &str = "data-field-type";
}

pub(crate) mod classes {
    pub const GROUP: &str = "form-group";
    pub const SUPPRESSED: &str = "suppressed";
    pub const SECTION: &str = "form-section";
    pub const SECTION_HELP: &str = "section-help";
    pub const HELP: &str = "help-text";
    pub const REQUIRED: &str = "required-marker";
    pub const SUBMIT: &str = "submit";
    pub const DESCRIPTION: &str = "form-description";
    pub const VALIDATION_SUMMARY: &str = "validation-summary";
}
