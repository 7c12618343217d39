use percent_encoding::percent_decode_str;

pub const DEFAULT_FORM_KIND: &str = "incident";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_ROLE: &str = "user";

/// The three caller-supplied selectors of a render session.
///
/// `role` is advisory. Field suppression driven by it is a presentation
/// convenience, not an access-control boundary; anything that needs real
/// enforcement must take the role from a verified session instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    pub kind: String,
    pub language: String,
    pub role: String,
}

impl Default for FormRequest {
    fn default() -> Self {
        Self {
            kind: DEFAULT_FORM_KIND.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl FormRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `form`, `lang` and `role` from a URL query string. A leading `?` is
    /// optional, unknown keys are ignored and empty values keep the default.
    pub fn from_query(query: &str) -> Self {
        let mut request = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(key);
            let value = decode_component(value);
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "form" => request.kind = value,
                "lang" => request.language = value,
                "role" => request.role = value,
                _ => {}
            }
        }
        request
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_query_is_empty() {
        assert_eq!(FormRequest::from_query(""), FormRequest::default());
        assert_eq!(FormRequest::from_query("?"), FormRequest::default());
    }

    #[test]
    fn reads_known_keys_and_ignores_others() {
        let request = FormRequest::from_query("?form=audit&lang=de&role=admin&debug=1");
        assert_eq!(request.kind, "audit");
        assert_eq!(request.language, "de");
        assert_eq!(request.role, "admin");
    }

    #[test]
    fn decodes_percent_and_plus() {
        let request = FormRequest::from_query("role=shift%20lead&lang=pt+BR");
        assert_eq!(request.role, "shift lead");
        assert_eq!(request.language, "pt BR");
    }

    #[test]
    fn empty_values_keep_defaults() {
        let request = FormRequest::from_query("form=&role");
        assert_eq!(request.kind, DEFAULT_FORM_KIND);
        assert_eq!(request.role, DEFAULT_ROLE);
    }
}
