use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// Declarative description of a whole form, immutable once loaded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub languages: IndexMap<String, LanguageOverride>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOverride {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default)]
    pub show_section_numbers: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub permissions: Option<Permissions>,
    #[serde(default)]
    pub visible_if: Option<VisibleIf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Single-controller visibility dependency: shown only while `field` holds `equals`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VisibleIf {
    pub field: String,
    pub equals: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Select,
    Date,
    Time,
}

impl FieldType {
    /// Unrecognised tags fall back to `Text`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "textarea" => FieldType::Textarea,
            "select" => FieldType::Select,
            "date" => FieldType::Date,
            "time" => FieldType::Time,
            _ => FieldType::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Date => "date",
            FieldType::Time => "time",
        }
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.as_deref().map(FieldType::from_tag).unwrap_or_default())
    }
}

impl FormConfig {
    /// Title for `language`, falling back to the base title.
    pub fn localized_title(&self, language: &str) -> &str {
        self.languages
            .get(language)
            .and_then(|entry| entry.title.as_deref())
            .unwrap_or(&self.title)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.fields().find(|field| field.id == id)
    }

    /// Sections in ascending `order`; ties keep their configuration order.
    pub fn ordered_sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by_key(|section| section.order);
        sections
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for field in self.fields() {
            if !seen.insert(field.id.as_str()) {
                return Err(ConfigError::DuplicateFieldId {
                    id: field.id.clone(),
                });
            }
        }
        for field in self.fields() {
            if let Some(rule) = &field.visible_if
                && !seen.contains(rule.field.as_str())
            {
                return Err(ConfigError::UnknownController {
                    dependent: field.id.clone(),
                    controller: rule.field.clone(),
                });
            }
        }
        Ok(())
    }
}

impl FieldSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = Some(Permissions {
            roles: roles.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn with_visible_if(mut self, field: impl Into<String>, equals: impl Into<String>) -> Self {
        self.visible_if = Some(VisibleIf {
            field: field.into(),
            equals: equals.into(),
        });
        self
    }

    pub fn with_help_text(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_and_missing_types_fall_back_to_text() {
        let config: FormConfig = serde_json::from_value(json!({
            "title": "T",
            "sections": [{
                "label": "S",
                "fields": [
                    {"id": "a", "label": "A", "type": "colour"},
                    {"id": "b", "label": "B"},
                    {"id": "c", "label": "C", "type": "textarea", "rows": 4}
                ]
            }]
        }))
        .expect("config");
        let kinds: Vec<FieldType> = config.fields().map(|field| field.kind).collect();
        assert_eq!(
            kinds,
            vec![FieldType::Text, FieldType::Text, FieldType::Textarea]
        );
        assert_eq!(config.field("c").and_then(|field| field.rows), Some(4));
    }

    #[test]
    fn camel_case_keys_are_recognised() {
        let config: FormConfig = serde_json::from_value(json!({
            "title": "Incident",
            "layout": {"showSectionNumbers": true},
            "sections": [{
                "label": "S",
                "helpText": "section help",
                "fields": [{
                    "id": "x",
                    "label": "X",
                    "helpText": "field help",
                    "visibleIf": {"field": "y", "equals": "on"},
                    "permissions": {"roles": ["admin"]}
                }, {"id": "y", "label": "Y"}]
            }]
        }))
        .expect("config");
        assert!(config.layout.show_section_numbers);
        assert_eq!(config.sections[0].help_text.as_deref(), Some("section help"));
        let field = config.field("x").expect("field x");
        assert_eq!(field.help_text.as_deref(), Some("field help"));
        assert_eq!(
            field.visible_if,
            Some(VisibleIf {
                field: "y".into(),
                equals: "on".into()
            })
        );
        assert_eq!(
            field.permissions.as_ref().map(|p| p.roles.clone()),
            Some(vec!["admin".to_string()])
        );
    }

    #[test]
    fn localized_title_falls_back_to_base() {
        let config: FormConfig = serde_json::from_value(json!({
            "title": "Incident report",
            "languages": {"de": {"title": "Störungsmeldung"}, "fr": {}}
        }))
        .expect("config");
        assert_eq!(config.localized_title("de"), "Störungsmeldung");
        assert_eq!(config.localized_title("fr"), "Incident report");
        assert_eq!(config.localized_title("es"), "Incident report");
    }

    #[test]
    fn ordered_sections_is_stable_on_ties() {
        let config: FormConfig = serde_json::from_value(json!({
            "sections": [
                {"label": "b", "order": 2},
                {"label": "a1", "order": 1},
                {"label": "zero"},
                {"label": "a2", "order": 1}
            ]
        }))
        .expect("config");
        let labels: Vec<&str> = config
            .ordered_sections()
            .iter()
            .map(|section| section.label.as_str())
            .collect();
        assert_eq!(labels, vec!["zero", "a1", "a2", "b"]);
    }

    #[test]
    fn validate_rejects_duplicate_ids_across_sections() {
        let config: FormConfig = serde_json::from_value(json!({
            "sections": [
                {"label": "one", "fields": [{"id": "dup"}]},
                {"label": "two", "fields": [{"id": "dup"}]}
            ]
        }))
        .expect("config");
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateFieldId { id: "dup".into() })
        );
    }

    #[test]
    fn validate_rejects_unknown_controller_but_allows_cross_section() {
        let mut config: FormConfig = serde_json::from_value(json!({
            "sections": [
                {"label": "one", "fields": [{"id": "kind", "type": "select", "options": ["a", "b"]}]},
                {"label": "two", "fields": [{"id": "detail", "visibleIf": {"field": "kind", "equals": "b"}}]}
            ]
        }))
        .expect("config");
        assert!(config.validate().is_ok());

        config.sections[1].fields[0].visible_if = Some(VisibleIf {
            field: "missing".into(),
            equals: "b".into(),
        });
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownController {
                dependent: "detail".into(),
                controller: "missing".into()
            })
        );
    }
}
