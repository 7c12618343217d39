mod provider;
mod request;

pub use provider::{ConfigProvider, DirectoryProvider, StaticProvider};
pub use request::{DEFAULT_FORM_KIND, DEFAULT_LANGUAGE, DEFAULT_ROLE, FormRequest};
