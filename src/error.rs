use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, RuntimeErr};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::model::EntityKind;

pub const GLOBAL_KEY: &str = "global";

#[derive(Debug, Error)]
pub enum AppError {
    /// `field` is set when the missing record was referenced from a payload
    /// field; otherwise the request target itself is missing.
    #[error("{kind} {id} does not exist")]
    NotFound {
        kind: EntityKind,
        id: String,
        field: Option<&'static str>,
    },

    #[error("feature value {0} is not allowed here")]
    InvalidFeatureValue(Uuid),

    #[error("{kind} {field} is already taken")]
    DuplicateName {
        kind: EntityKind,
        field: &'static str,
    },

    #[error("{field} is not a valid image")]
    InvalidImage { field: &'static str },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("{kind} {id} is still in use")]
    InUse {
        kind: EntityKind,
        id: Uuid,
        field: Option<&'static str>,
    },

    #[error("{field}: {code}")]
    Invalid {
        field: &'static str,
        code: &'static str,
    },

    #[error("validation failed")]
    Validation(FieldErrors),

    /// A concurrent write touched what this request read; retrying it is safe.
    #[error("concurrent update, retry the request")]
    Conflict,

    #[error("ORM error")]
    OrmError(DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        AppError::NotFound {
            kind,
            id: id.to_string(),
            field: None,
        }
    }

    /// Re-addresses a global error to the payload field that caused it.
    pub fn in_field(self, scope: &'static str) -> Self {
        match self {
            AppError::NotFound { kind, id, .. } => AppError::NotFound {
                kind,
                id,
                field: Some(scope),
            },
            AppError::InUse { kind, id, .. } => AppError::InUse {
                kind,
                id,
                field: Some(scope),
            },
            other => other,
        }
    }

    /// The response key this error is reported under, when it is a
    /// client-side error at all.
    pub fn field(&self) -> Option<&str> {
        match self {
            AppError::NotFound { field, .. } | AppError::InUse { field, .. } => {
                Some(field.unwrap_or(GLOBAL_KEY))
            }
            AppError::InvalidFeatureValue(_) => Some("feature_values"),
            AppError::DuplicateName { field, .. }
            | AppError::InvalidImage { field }
            | AppError::Invalid { field, .. } => Some(*field),
            AppError::InvalidQuery(_) | AppError::Conflict => Some(GLOBAL_KEY),
            AppError::Validation(_) | AppError::OrmError(_) | AppError::Internal(_) => None,
        }
    }

    pub fn code(&self) -> String {
        match self {
            AppError::NotFound { kind, .. } => format!("errors.{}.notFound", kind.as_str()),
            AppError::InvalidFeatureValue(_) => "errors.invalidFeatureValue".into(),
            AppError::DuplicateName { .. } => "errors.notUnique".into(),
            AppError::InvalidImage { .. } => "errors.invalidImage".into(),
            AppError::InvalidQuery(_) => "errors.invalidQuery".into(),
            AppError::InUse { .. } => "errors.inUse".into(),
            AppError::Invalid { code, .. } => (*code).into(),
            AppError::Validation(_) => "errors.validation".into(),
            AppError::Conflict => "errors.conflict".into(),
            AppError::OrmError(_) | AppError::Internal(_) => "errors.internal".into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { field: None, .. } => StatusCode::NOT_FOUND,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::OrmError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// The `{field: [codes]}` body sent to the client.
    pub fn document(&self) -> FieldErrors {
        match self {
            AppError::Validation(errors) => errors.clone(),
            other => {
                let mut errors = FieldErrors::default();
                errors.add(other.field().unwrap_or(GLOBAL_KEY), other.code());
                errors
            }
        }
    }
}

/// Field-addressed error codes collected across independent checks of one
/// request, e.g. `{"name": ["errors.notUnique"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, code: impl Into<String>) {
        let code = code.into();
        let codes = self.0.entry(field.to_string()).or_default();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    /// Records `err` when it is a client error and hands everything else back
    /// to the caller.
    pub fn push(&mut self, err: AppError) -> AppResult<()> {
        match err {
            AppError::Validation(other) => {
                self.extend(other);
                Ok(())
            }
            err => match err.field().map(str::to_string) {
                Some(field) => {
                    self.add(&field, err.code());
                    Ok(())
                }
                None => Err(err),
            },
        }
    }

    /// Runs one independent check: the value on success, `None` when the
    /// failure was recorded.
    pub fn check<T>(&mut self, result: AppResult<T>) -> AppResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => self.push(err).map(|_| None),
        }
    }

    pub fn extend(&mut self, other: FieldErrors) {
        for (field, codes) in other.0 {
            for code in codes {
                self.add(&field, code);
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn finish(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        (status, axum::Json(self.document())).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if is_serialization_failure(&err) {
            tracing::debug!(error = %err, "write lost a serialization race");
            return AppError::Conflict;
        }
        AppError::OrmError(err)
    }
}

/// Postgres `serialization_failure` (40001) and `deadlock_detected` (40P01).
fn is_serialization_failure(err: &DbErr) -> bool {
    let (DbErr::Conn(runtime) | DbErr::Exec(runtime) | DbErr::Query(runtime)) = err else {
        return false;
    };
    match runtime {
        RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db)) => {
            matches!(db.code().as_deref(), Some("40001" | "40P01"))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_asks_for_a_retry() {
        let err = AppError::Conflict;
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(
            err.document().get(GLOBAL_KEY),
            Some(&["errors.conflict".to_string()][..])
        );
    }

    #[test]
    fn other_storage_errors_stay_internal() {
        let err = AppError::from(DbErr::Custom("boom".into()));
        assert!(matches!(err, AppError::OrmError(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_target_is_a_global_not_found() {
        let err = AppError::not_found(EntityKind::Category, "42");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.document().get(GLOBAL_KEY),
            Some(&["errors.category.notFound".to_string()][..])
        );
    }

    #[test]
    fn missing_reference_is_a_field_scoped_bad_request() {
        let err = AppError::not_found(EntityKind::Category, "42").in_field("category");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.document().get("category").is_some());
        assert!(err.document().get(GLOBAL_KEY).is_none());
    }

    #[test]
    fn independent_failures_merge_into_one_body() {
        let mut errors = FieldErrors::default();
        errors
            .push(AppError::InvalidFeatureValue(Uuid::now_v7()))
            .unwrap();
        errors
            .push(AppError::InvalidImage { field: "image" })
            .unwrap();
        errors
            .push(AppError::DuplicateName {
                kind: EntityKind::ProductType,
                field: "name",
            })
            .unwrap();
        errors
            .push(AppError::InvalidFeatureValue(Uuid::now_v7()))
            .unwrap();

        let err = errors.finish().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let body = serde_json::to_value(err.document()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "feature_values": ["errors.invalidFeatureValue"],
                "image": ["errors.invalidImage"],
                "name": ["errors.notUnique"],
            })
        );
    }

    #[test]
    fn server_errors_are_not_collected() {
        let mut errors = FieldErrors::default();
        let result = errors.check::<()>(Err(AppError::Internal(anyhow::anyhow!("boom"))));
        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(errors.is_empty());
    }
}
