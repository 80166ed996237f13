use std::collections::HashMap;

use crate::error::CmsError;

/// Collects per-field failures so a request reports every bad field at once
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Trimmed value of a required field; records an error when missing or blank
    pub fn required(&mut self, field: &str, value: Option<&str>) -> String {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                self.add(field, format!("{} is required", field));
                String::new()
            }
        }
    }

    /// A field that may be omitted but must not be blank when sent
    pub fn non_blank(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let value = value?.trim();
        if value.is_empty() {
            self.add(field, format!("{} cannot be blank", field));
            return None;
        }
        Some(value.to_string())
    }

    pub fn slug(&mut self, field: &str, value: &str) {
        if !self.has(field) && !is_valid_slug(value) {
            self.add(field, "Use lowercase letters, digits and single hyphens");
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !self.has(field) && !value.contains('@') {
            self.add(field, "Enter a valid email address");
        }
    }

    pub fn into_result(self) -> Result<(), CmsError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CmsError::invalid_fields(self.errors))
        }
    }
}

/// Trim an optional text field, treating blank as absent
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Patch counterpart of [`optional_text`]: an explicit blank clears the column
#[allow(clippy::option_option)]
pub fn clearable_text(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(optional_text)
}

/// `[a-z0-9]+(-[a-z0-9]+)*`
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
}

/// Error for a slug or email already held by another row
pub fn taken(field: &str) -> CmsError {
    let mut errors = FieldErrors::new();
    errors.add(field, format!("This {} is already taken", field));
    CmsError::invalid_fields(errors.errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_format() {
        assert!(is_valid_slug("acme"));
        assert!(is_valid_slug("acme-foods-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Acme"));
        assert!(!is_valid_slug("acme--foods"));
        assert!(!is_valid_slug("-acme"));
        assert!(!is_valid_slug("acme_foods"));
    }

    #[test]
    fn collects_every_failed_field() {
        let mut errors = FieldErrors::new();
        let name = errors.required("name", Some("  "));
        let slug = errors.required("slug", Some(" Bad Slug "));
        errors.slug("slug", &slug);

        assert!(name.is_empty());
        match errors.into_result() {
            Err(CmsError::Validation { field_errors, .. }) => {
                assert_eq!(field_errors.len(), 2);
                assert_eq!(field_errors["name"], "name is required");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn clearable_text_keeps_absent_apart_from_cleared() {
        assert_eq!(clearable_text(None), None);
        assert_eq!(clearable_text(Some(None)), Some(None));
        assert_eq!(clearable_text(Some(Some("   ".into()))), Some(None));
        assert_eq!(clearable_text(Some(Some(" Note ".into()))), Some(Some("Note".into())));
    }

    #[test]
    fn optional_text_drops_blanks() {
        assert_eq!(optional_text(Some("  hi ".into())), Some("hi".into()));
        assert_eq!(optional_text(Some("   ".into())), None);
        assert_eq!(optional_text(None), None);
    }
}
