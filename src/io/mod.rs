pub mod format;
pub mod input;
pub mod output;

pub use format::DocumentFormat;
pub use input::{parse_config_str, parse_document_str};
pub use output::{OutputDestination, OutputOptions, emit};
