use crate::domain::FieldSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render,
    Suppress,
}

/// Suppress iff the field declares permissions and `role` is not listed.
/// Matching is exact and case-sensitive. Suppression is silent; it is never an error.
pub fn decide(field: &FieldSpec, role: &str) -> Decision {
    match &field.permissions {
        Some(permissions) if !permissions.roles.iter().any(|allowed| allowed == role) => {
            Decision::Suppress
        }
        _ => Decision::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldType;

    #[test]
    fn fields_without_permissions_render_for_everyone() {
        let field = FieldSpec::new("summary", "Summary", FieldType::Text);
        assert_eq!(decide(&field, "user"), Decision::Render);
        assert_eq!(decide(&field, ""), Decision::Render);
    }

    #[test]
    fn listed_role_renders_and_others_are_suppressed() {
        let field = FieldSpec::new("cost", "Cost", FieldType::Text).with_roles(["admin", "auditor"]);
        assert_eq!(decide(&field, "auditor"), Decision::Render);
        assert_eq!(decide(&field, "user"), Decision::Suppress);
    }

    #[test]
    fn role_match_is_case_sensitive() {
        let field = FieldSpec::new("cost", "Cost", FieldType::Text).with_roles(["admin"]);
        assert_eq!(decide(&field, "Admin"), Decision::Suppress);
    }

    #[test]
    fn empty_role_set_suppresses_everyone() {
        let field = FieldSpec::new("cost", "Cost", FieldType::Text).with_roles(Vec::<String>::new());
        assert_eq!(decide(&field, "admin"), Decision::Suppress);
    }
}
