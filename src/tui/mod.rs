mod form_ui;
mod input;
mod options;
mod runtime;
mod status;
mod terminal;
mod view;

pub use form_ui::FormUI;
pub use options::UiOptions;
