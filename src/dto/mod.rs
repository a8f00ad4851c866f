//! Request payloads and the form rules they are checked against.

use crate::catalog::graph::CatalogGraph;
use crate::catalog::intl::{LocalizedText, TextField};
use crate::catalog::model::Language;
use crate::config::CatalogSettings;
use crate::error::{AppResult, FieldErrors};

pub mod categories;
pub mod feature_types;
pub mod feature_values;
pub mod product_types;
pub mod products;
pub mod promo_codes;

pub const MUST_NOT_BE_NULL: &str = "errors.mustNotBeNull";
pub const MUST_NOT_BE_EMPTY: &str = "errors.mustNotBeEmpty";
pub const MAX_LENGTH: &str = "errors.maxLength";
pub const MUST_NOT_BE_NEGATIVE: &str = "errors.mustNotBeNegative";
pub const UNKNOWN_LANGUAGE: &str = "errors.unknownLanguage";
pub const DEFAULT_LANGUAGE_REQUIRED: &str = "errors.defaultLanguageRequired";

pub const PROMO_CODE_MAX_LENGTH: usize = 64;

pub fn max_length(field: TextField) -> usize {
    match field {
        TextField::Name => 30,
        TextField::Description => 1000,
        TextField::ShortDescription => 300,
    }
}

/// Collects the field errors of one payload. Each rule returns the value
/// when it passed so the caller can keep checking other fields.
pub struct FormCheck<'a> {
    errors: FieldErrors,
    graph: &'a CatalogGraph,
    settings: &'a CatalogSettings,
    creating: bool,
}

impl<'a> FormCheck<'a> {
    pub fn new(graph: &'a CatalogGraph, settings: &'a CatalogSettings, creating: bool) -> Self {
        Self {
            errors: FieldErrors::default(),
            graph,
            settings,
            creating,
        }
    }

    pub fn creating(&self) -> bool {
        self.creating
    }

    /// Required on create, optional on update.
    pub fn require<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() && self.creating {
            self.errors.add(field, MUST_NOT_BE_NULL);
        }
        value
    }

    /// Localized text: known languages, non-empty values within the field's
    /// length. A new record must carry the default language when `required`.
    pub fn text(
        &mut self,
        field: TextField,
        text: Option<LocalizedText>,
        required: bool,
    ) -> Option<LocalizedText> {
        let key = field.as_str();
        let Some(text) = text else {
            if required && self.creating {
                self.errors.add(key, MUST_NOT_BE_NULL);
            }
            return None;
        };

        let mut failed = false;
        for (language, value) in text.iter() {
            if !self.graph.contains::<Language>(&language.to_string()) {
                self.errors.add(key, UNKNOWN_LANGUAGE);
                failed = true;
            }
            if value.trim().is_empty() {
                self.errors.add(key, MUST_NOT_BE_EMPTY);
                failed = true;
            } else if value.chars().count() > max_length(field) {
                self.errors.add(key, MAX_LENGTH);
                failed = true;
            }
        }
        if required
            && self.creating
            && text.get(&self.settings.default_language).is_none()
        {
            self.errors.add(key, DEFAULT_LANGUAGE_REQUIRED);
            failed = true;
        }

        (!failed).then_some(text)
    }

    pub fn non_negative<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T>
    where
        T: Into<i64> + Copy,
    {
        let value = self.require(field, value)?;
        if value.into() < 0 {
            self.errors.add(field, MUST_NOT_BE_NEGATIVE);
            return None;
        }
        Some(value)
    }

    pub fn non_empty(
        &mut self,
        field: &'static str,
        value: Option<String>,
        max: usize,
    ) -> Option<String> {
        let value = self.require(field, value)?;
        let value = value.trim().to_string();
        if value.is_empty() {
            self.errors.add(field, MUST_NOT_BE_EMPTY);
            return None;
        }
        if value.chars().count() > max {
            self.errors.add(field, MAX_LENGTH);
            return None;
        }
        Some(value)
    }

    /// Records a failed domain check; server errors are returned as is.
    pub fn check<T>(&mut self, result: AppResult<T>) -> AppResult<Option<T>> {
        self.errors.check(result)
    }

    /// Fails with every collected error, otherwise hands back `values`.
    /// `values` is `None` only when some rule failed.
    pub fn finish<T>(self, values: Option<T>) -> AppResult<T> {
        self.errors.finish()?;
        values.ok_or_else(|| anyhow::anyhow!("form check passed with a missing value").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn graph() -> CatalogGraph {
        let mut graph = CatalogGraph::new();
        for (code, name) in [("en", "English"), ("ru", "Русский")] {
            graph.insert(Language {
                code: code.into(),
                name: name.into(),
            });
        }
        graph
    }

    fn codes(err: &AppError, field: &str) -> Vec<String> {
        err.document()
            .get(field)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    #[test]
    fn missing_required_fields_are_reported_together() {
        let graph = graph();
        let settings = CatalogSettings::default();
        let mut form = FormCheck::new(&graph, &settings, true);
        let name = form.text(TextField::Name, None, true);
        let price = form.non_negative::<i64>("price", None);
        let err = form.finish(name.zip(price)).unwrap_err();

        assert_eq!(codes(&err, "name"), vec![MUST_NOT_BE_NULL]);
        assert_eq!(codes(&err, "price"), vec![MUST_NOT_BE_NULL]);
    }

    #[test]
    fn updates_may_omit_fields() {
        let graph = graph();
        let settings = CatalogSettings::default();
        let mut form = FormCheck::new(&graph, &settings, false);
        let name = form.text(TextField::Name, None, true);
        assert!(name.is_none());
        assert!(form.finish(Some(())).is_ok());
    }

    #[test]
    fn text_rules() {
        let graph = graph();
        let settings = CatalogSettings::default();
        let mut form = FormCheck::new(&graph, &settings, true);
        let long = "x".repeat(31);
        let text: LocalizedText = [("ru", long.as_str()), ("de", " ")].into_iter().collect();
        assert!(form.text(TextField::Name, Some(text), true).is_none());

        let err = form.finish(Some(())).unwrap_err();
        let mut found = codes(&err, "name");
        found.sort();
        assert_eq!(
            found,
            vec![
                DEFAULT_LANGUAGE_REQUIRED,
                MAX_LENGTH,
                MUST_NOT_BE_EMPTY,
                UNKNOWN_LANGUAGE
            ]
        );
    }

    #[test]
    fn description_allows_longer_text() {
        let graph = graph();
        let settings = CatalogSettings::default();
        let mut form = FormCheck::new(&graph, &settings, true);
        let long = "x".repeat(300);
        let text: LocalizedText = [("en", long.as_str())].into_iter().collect();
        assert!(form.text(TextField::Description, Some(text), false).is_some());
        assert!(form.finish(Some(())).is_ok());
    }

    #[test]
    fn negative_numbers_are_rejected() {
        let graph = graph();
        let settings = CatalogSettings::default();
        let mut form = FormCheck::new(&graph, &settings, true);
        assert_eq!(form.non_negative("quantity", Some(0_i32)), Some(0));
        assert_eq!(form.non_negative("discount", Some(-5_i32)), None);
        let err = form.finish(Some(())).unwrap_err();
        assert_eq!(codes(&err, "discount"), vec![MUST_NOT_BE_NEGATIVE]);
    }
}
