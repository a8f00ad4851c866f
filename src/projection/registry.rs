use serde_json::Value;

use crate::catalog::graph::CatalogGraph;
use crate::catalog::intl::TextField;
use crate::catalog::model::{EntityKind, Id};

/// What a field accessor may look at besides the entity itself.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub graph: &'a CatalogGraph,
    pub language: &'a str,
    pub fallback: Option<&'a str>,
}

impl<'a> ProjectionContext<'a> {
    pub fn new(graph: &'a CatalogGraph, language: &'a str, fallback: Option<&'a str>) -> Self {
        Self {
            graph,
            language,
            fallback,
        }
    }

    /// A localized field resolved for the requester, `null` when neither the
    /// language nor the fallback has a value.
    pub fn text(&self, kind: EntityKind, id: Id, field: TextField) -> Value {
        self.graph
            .text(kind, id, field)
            .and_then(|text| text.resolve(self.language, self.fallback))
            .map_or(Value::Null, |value| Value::String(value.to_string()))
    }
}

pub type Accessor<T> = for<'a> fn(&T, &ProjectionContext<'a>) -> Value;

pub struct FieldDef<T: 'static> {
    pub name: &'static str,
    /// Default representation: plain value, id, or list of ids.
    pub compact: Accessor<T>,
    /// Full representation of a relation, used when the field is expanded.
    pub expanded: Option<Accessor<T>>,
}

/// Ordered field table of one entity kind. Built once and looked up by name
/// for every request.
pub struct FieldRegistry<T: 'static> {
    fields: Vec<FieldDef<T>>,
}

impl<T: 'static> FieldRegistry<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(mut self, name: &'static str, compact: Accessor<T>) -> Self {
        self.fields.push(FieldDef {
            name,
            compact,
            expanded: None,
        });
        self
    }

    pub fn relation(
        mut self,
        name: &'static str,
        compact: Accessor<T>,
        expanded: Accessor<T>,
    ) -> Self {
        self.fields.push(FieldDef {
            name,
            compact,
            expanded: Some(expanded),
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef<T>> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDef<T>> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }
}

impl<T: 'static> Default for FieldRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An entity kind the serializer knows how to render.
pub trait Projectable: Sized + Send + Sync + 'static {
    fn registry() -> &'static FieldRegistry<Self>;
}
