//! Per-entity, per-field, per-language text.
//!
//! Values are last-writer-wins per `(entity, field, language)`; no history is
//! kept. Length and emptiness rules belong to payload validation, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::{EntityKind, Id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Name,
    Description,
    ShortDescription,
}

impl TextField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::Description => "description",
            TextField::ShortDescription => "short_description",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(TextField::Name),
            "description" => Some(TextField::Description),
            "short_description" => Some(TextField::ShortDescription),
            _ => None,
        }
    }
}

/// Language code to text for a single `(entity, field)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    /// Exact language first, then the fallback language, otherwise nothing.
    pub fn resolve(&self, language: &str, fallback: Option<&str>) -> Option<&str> {
        self.get(language).or_else(|| fallback.and_then(|lang| self.get(lang)))
    }

    pub fn set(&mut self, language: impl Into<String>, value: impl Into<String>) {
        self.0.insert(language.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(lang, value)| (lang.as_str(), value.as_str()))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for LocalizedText {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self(values)
    }
}

impl<L: Into<String>, V: Into<String>> FromIterator<(L, V)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(lang, value)| (lang.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextKey {
    pub kind: EntityKind,
    pub id: Id,
    pub field: TextField,
}

impl TextKey {
    pub fn new(kind: EntityKind, id: Id, field: TextField) -> Self {
        Self { kind, id, field }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntlStore {
    texts: BTreeMap<TextKey, LocalizedText>,
}

impl IntlStore {
    pub fn set(&mut self, key: TextKey, language: &str, value: impl Into<String>) {
        self.texts.entry(key).or_default().set(language, value);
    }

    /// Writes every language of `text`, leaving other languages untouched.
    pub fn merge(&mut self, key: TextKey, text: &LocalizedText) {
        for (language, value) in text.iter() {
            self.set(key, language, value);
        }
    }

    pub fn get(&self, key: &TextKey, language: &str, fallback: Option<&str>) -> Option<&str> {
        self.texts.get(key)?.resolve(language, fallback)
    }

    pub fn all(&self, key: &TextKey) -> Option<&LocalizedText> {
        self.texts.get(key)
    }

    /// Texts of one field across every entity of `kind`.
    pub fn field_values(
        &self,
        kind: EntityKind,
        field: TextField,
    ) -> impl Iterator<Item = (Id, &LocalizedText)> {
        self.texts
            .iter()
            .filter(move |(key, _)| key.kind == kind && key.field == field)
            .map(|(key, text)| (key.id, text))
    }

    pub fn entity_texts(&self, kind: EntityKind, id: Id) -> impl Iterator<Item = (&TextKey, &LocalizedText)> {
        self.texts
            .iter()
            .filter(move |(key, _)| key.kind == kind && key.id == id)
    }

    pub fn remove_entity(&mut self, kind: EntityKind, id: Id) {
        self.texts.retain(|key, _| !(key.kind == kind && key.id == id));
    }
}
