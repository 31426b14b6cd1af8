//! Multipart form extractor.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use rehla_core::RehlaError;
use rehla_service::Upload;
use std::collections::HashMap;

/// A multipart form with its text fields and files read into memory.
/// File parts without content are dropped.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl MultipartForm {
    /// Trimmed text of a field, empty when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", |value| value.trim())
    }

    /// Text of a field when present and not blank.
    #[must_use]
    pub fn opt_text(&self, name: &str) -> Option<String> {
        Some(self.text(name)).filter(|value| !value.is_empty()).map(str::to_string)
    }

    /// Text of a required field.
    pub fn required(&self, name: &str) -> Result<String, AppError> {
        self.opt_text(name)
            .ok_or_else(|| AppError(RehlaError::validation(format!("{} shouldn't be empty", name))))
    }

    /// A whole number field, `None` when blank.
    pub fn number(&self, name: &str) -> Result<Option<i64>, AppError> {
        self.opt_text(name)
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| AppError(RehlaError::validation(format!("{} must be a number", name))))
            })
            .transpose()
    }

    /// A checkbox: present with `on`, `true` or `1`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.text(name), "on" | "true" | "1")
    }

    /// Takes an uploaded file out of the form.
    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }

    /// Takes an uploaded file that must be present.
    pub fn require_file(&mut self, name: &str) -> Result<Upload, AppError> {
        self.take_file(name)
            .ok_or_else(|| AppError(RehlaError::validation(format!("{} is required", name))))
    }
}

#[async_trait]
impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError(RehlaError::validation(e.body_text())))?;

        let mut form = MultipartForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError(RehlaError::validation(e.body_text())))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError(RehlaError::validation(e.body_text())))?;
                    if !bytes.is_empty() {
                        form.files.insert(name, Upload::new(file_name, bytes.to_vec()));
                    }
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError(RehlaError::validation(e.body_text())))?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> MultipartForm {
        MultipartForm {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }

    #[test]
    fn test_field_accessors() {
        let form = form(&[("title", "  Quiz 1 "), ("order", "2"), ("free", "on"), ("blank", " ")]);
        assert_eq!(form.required("title").unwrap(), "Quiz 1");
        assert_eq!(form.number("order").unwrap(), Some(2));
        assert!(form.flag("free"));
        assert!(!form.flag("missing"));
        assert!(form.required("blank").is_err());
        assert_eq!(form.number("blank").unwrap(), None);
    }

    #[test]
    fn test_number_rejects_text() {
        let form = form(&[("order", "first")]);
        assert!(form.number("order").is_err());
    }
}
