mod config;

pub use config::{
    FieldSpec, FieldType, FormConfig, LanguageOverride, Layout, Permissions, Section, VisibleIf,
};
