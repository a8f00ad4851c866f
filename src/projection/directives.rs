use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Raw directive bag as it arrives on the query string. Everything is kept
/// as text so malformed values surface as `InvalidQuery` instead of an
/// extractor rejection.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DirectiveQuery {
    /// JSON array (`["name"]`) or comma separated field names to omit.
    pub exclude: Option<String>,
    /// JSON array or comma separated relation names to expand.
    pub serialize: Option<String>,
    /// JSON object of field predicates, e.g. `{"price":{"gte":100}}`.
    pub filter: Option<String>,
    /// 1-based page number; lists are not paginated without it.
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(Value),
    AnyOf(Vec<Value>),
    Range {
        gt: Option<f64>,
        gte: Option<f64>,
        lt: Option<f64>,
        lte: Option<f64>,
    },
}

impl Predicate {
    fn parse(field: &str, raw: Value) -> AppResult<Self> {
        match raw {
            Value::Array(values) => Ok(Predicate::AnyOf(values)),
            Value::Object(bounds) => {
                let mut range = (None, None, None, None);
                for (op, bound) in bounds {
                    let bound = bound.as_f64().ok_or_else(|| {
                        AppError::InvalidQuery(format!("filter.{field}.{op} must be a number"))
                    })?;
                    match op.as_str() {
                        "gt" => range.0 = Some(bound),
                        "gte" => range.1 = Some(bound),
                        "lt" => range.2 = Some(bound),
                        "lte" => range.3 = Some(bound),
                        _ => {
                            return Err(AppError::InvalidQuery(format!(
                                "unknown operator filter.{field}.{op}"
                            )));
                        }
                    }
                }
                Ok(Predicate::Range {
                    gt: range.0,
                    gte: range.1,
                    lt: range.2,
                    lte: range.3,
                })
            }
            scalar => Ok(Predicate::Equals(scalar)),
        }
    }

    /// Tests a field's compact value. For to-many fields the predicate holds
    /// when any of the ids matches.
    pub fn matches(&self, value: &Value) -> bool {
        if let Value::Array(items) = value {
            return items.iter().any(|item| self.matches_scalar(item));
        }
        self.matches_scalar(value)
    }

    fn matches_scalar(&self, value: &Value) -> bool {
        match self {
            Predicate::Equals(expected) => loosely_equal(expected, value),
            Predicate::AnyOf(options) => options.iter().any(|option| loosely_equal(option, value)),
            Predicate::Range { gt, gte, lt, lte } => {
                let Some(number) = value.as_f64() else {
                    return false;
                };
                gt.is_none_or(|bound| number > bound)
                    && gte.is_none_or(|bound| number >= bound)
                    && lt.is_none_or(|bound| number < bound)
                    && lte.is_none_or(|bound| number <= bound)
            }
        }
    }
}

/// Query strings carry numbers and booleans as text, so `"100"` matches `100`.
fn loosely_equal(expected: &Value, actual: &Value) -> bool {
    if expected == actual {
        return true;
    }
    match (expected, actual) {
        (Value::String(text), Value::Number(number)) | (Value::Number(number), Value::String(text)) => {
            text.parse::<f64>().ok() == number.as_f64()
        }
        (Value::String(text), Value::Bool(flag)) | (Value::Bool(flag), Value::String(text)) => {
            text.parse::<bool>().ok() == Some(*flag)
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: Option<u64>,
}

impl PageRequest {
    /// Resolves `(page, limit, offset)`, applying the default limit and the
    /// configured ceiling. Offsets past `u64::MAX` saturate, which still
    /// lands past the end of any list.
    pub fn normalize(&self, default_limit: u64, max_limit: u64) -> (u64, u64, u64) {
        let limit = self.limit.unwrap_or(default_limit).min(max_limit);
        let offset = self.page.saturating_sub(1).saturating_mul(limit);
        (self.page, limit, offset)
    }
}

/// Parsed projection directives for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directives {
    pub exclude: Vec<String>,
    pub serialize: Vec<String>,
    pub filter: Vec<(String, Predicate)>,
    pub page: Option<PageRequest>,
}

impl Directives {
    pub fn parse(query: &DirectiveQuery) -> AppResult<Self> {
        let exclude = parse_names("exclude", query.exclude.as_deref())?;
        let serialize = parse_names("serialize", query.serialize.as_deref())?;
        let filter = match query.filter.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(raw) => parse_filter(raw)?,
        };
        let limit = parse_positive("limit", query.limit.as_deref())?;
        let page = parse_positive("page", query.page.as_deref())?
            .map(|page| PageRequest { page, limit });
        if page.is_none() && limit.is_some() {
            tracing::debug!("limit given without page, returning the whole list");
        }

        Ok(Self {
            exclude,
            serialize,
            filter,
            page,
        })
    }

    pub fn excludes(&self, field: &str) -> bool {
        self.exclude.iter().any(|name| name == field)
    }

    pub fn expands(&self, field: &str) -> bool {
        self.serialize.iter().any(|name| name == field)
    }

    /// Every field name the directives mention, for validation against a
    /// registry.
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        self.exclude
            .iter()
            .chain(self.serialize.iter())
            .chain(self.filter.iter().map(|(field, _)| field))
            .map(String::as_str)
    }
}

/// Ordered, de-duplicated field names from a JSON array or a comma list.
fn parse_names(directive: &str, raw: Option<&str>) -> AppResult<Vec<String>> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Vec::new());
    };

    let names: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str(raw)
            .map_err(|_| AppError::InvalidQuery(format!("{directive} must be a list of names")))?
    } else {
        raw.split(',').map(|name| name.trim().to_string()).collect()
    };

    let mut ordered: Vec<String> = Vec::with_capacity(names.len());
    for name in names.into_iter().filter(|name| !name.is_empty()) {
        if !ordered.contains(&name) {
            ordered.push(name);
        }
    }
    Ok(ordered)
}

fn parse_filter(raw: &str) -> AppResult<Vec<(String, Predicate)>> {
    let object: Map<String, Value> = serde_json::from_str(raw)
        .map_err(|_| AppError::InvalidQuery("filter must be a JSON object".into()))?;
    object
        .into_iter()
        .map(|(field, raw)| Predicate::parse(&field, raw).map(|predicate| (field, predicate)))
        .collect()
}

fn parse_positive(name: &str, raw: Option<&str>) -> AppResult<Option<u64>> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(value) if value >= 1 => Ok(Some(value as u64)),
        _ => Err(AppError::InvalidQuery(format!("{name} must be a positive integer"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> DirectiveQuery {
        let mut query = DirectiveQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "exclude" => query.exclude = value,
                "serialize" => query.serialize = value,
                "filter" => query.filter = value,
                "page" => query.page = value,
                "limit" => query.limit = value,
                _ => unreachable!(),
            }
        }
        query
    }

    #[test]
    fn names_accept_json_and_comma_lists() {
        let directives =
            Directives::parse(&query(&[("exclude", r#"["name","id","name"]"#), ("serialize", "category, feature_values")]))
                .unwrap();
        assert_eq!(directives.exclude, vec!["name", "id"]);
        assert_eq!(directives.serialize, vec!["category", "feature_values"]);
    }

    #[test]
    fn page_must_be_a_positive_number() {
        for page in ["0", "-3", "two", "1.5"] {
            let err = Directives::parse(&query(&[("page", page)])).unwrap_err();
            assert!(matches!(err, AppError::InvalidQuery(_)), "page={page}");
        }
        let err = Directives::parse(&query(&[("page", "1"), ("limit", "lots")])).unwrap_err();
        assert!(matches!(err, AppError::InvalidQuery(_)));
    }

    #[test]
    fn pagination_defaults_and_caps_the_limit() {
        let directives = Directives::parse(&query(&[("page", "2")])).unwrap();
        assert_eq!(directives.page.unwrap().normalize(20, 100), (2, 20, 20));

        let directives = Directives::parse(&query(&[("page", "3"), ("limit", "500")])).unwrap();
        assert_eq!(directives.page.unwrap().normalize(20, 100), (3, 100, 200));
    }

    #[test]
    fn huge_page_saturates_the_offset() {
        let directives =
            Directives::parse(&query(&[("page", "1000000000000000000"), ("limit", "100")]))
                .unwrap();
        let (page, limit, offset) = directives.page.unwrap().normalize(20, 100);
        assert_eq!((page, limit, offset), (1_000_000_000_000_000_000, 100, u64::MAX));
    }

    #[test]
    fn malformed_filter_is_an_invalid_query() {
        for filter in ["[1,2]", "{price:", r#"{"price":{"gte":"cheap"}}"#, r#"{"price":{"near":1}}"#] {
            assert!(
                Directives::parse(&query(&[("filter", filter)])).is_err(),
                "filter={filter}"
            );
        }
    }

    #[test]
    fn predicates_match_scalars_lists_and_ranges() {
        let directives = Directives::parse(&query(&[(
            "filter",
            r#"{"price":{"gte":100,"lt":200},"feature_values":["b"],"is_active":"true"}"#,
        )]))
        .unwrap();
        let predicate = |name: &str| {
            directives
                .filter
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, predicate)| predicate.clone())
                .unwrap()
        };

        assert!(predicate("price").matches(&json!(150)));
        assert!(!predicate("price").matches(&json!(200)));
        assert!(predicate("feature_values").matches(&json!(["a", "b"])));
        assert!(!predicate("feature_values").matches(&json!(["a"])));
        assert!(predicate("is_active").matches(&json!(true)));
    }
}
