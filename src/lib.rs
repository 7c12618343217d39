#![deny(rust_2018_idioms)]

pub mod config;
pub mod domain;
mod error;
pub mod form;
pub mod io;
pub mod page;
#[cfg(feature = "tui")]
pub mod tui;

pub use config::{ConfigProvider, DirectoryProvider, FormRequest, StaticProvider};
pub use domain::{FieldSpec, FieldType, FormConfig, Section};
pub use error::{ConfigError, FormError, FormResult};
pub use form::{FormSession, SubmissionPolicy, SubmissionSnapshot, SubmitOutcome, Visibility};
pub use io::{DocumentFormat, OutputDestination, OutputOptions, emit, parse_config_str};
pub use page::Page;
#[cfg(feature = "tui")]
pub use tui::{FormUI, UiOptions};

pub mod prelude {
    pub use super::{FormRequest, FormSession, SubmitOutcome, Visibility};
    #[cfg(feature = "tui")]
    pub use super::{FormUI, UiOptions};
}
