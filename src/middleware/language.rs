use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;

/// Language the response texts are resolved in: the primary subtag of the
/// first `Accept-Language` entry, or the configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLanguage(pub String);

impl RequestLanguage {
    pub fn from_header(value: Option<&str>, default: &str) -> Self {
        let code = value
            .and_then(|value| value.split(',').next())
            .and_then(|tag| tag.split(';').next())
            .and_then(|tag| tag.split(['-', '_']).next())
            .map(|code| code.trim().to_ascii_lowercase())
            .filter(|code| !code.is_empty() && code != "*");
        Self(code.unwrap_or_else(|| default.to_string()))
    }
}

impl FromRequestParts<AppState> for RequestLanguage {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());
        Ok(Self::from_header(header, &state.settings.default_language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_primary_subtag_of_the_first_entry() {
        assert_eq!(
            RequestLanguage::from_header(Some("ru-RU,ru;q=0.9,en;q=0.8"), "en").0,
            "ru"
        );
        assert_eq!(RequestLanguage::from_header(Some("EN_us"), "ru").0, "en");
    }

    #[test]
    fn falls_back_to_the_default() {
        assert_eq!(RequestLanguage::from_header(None, "en").0, "en");
        assert_eq!(RequestLanguage::from_header(Some("*"), "en").0, "en");
        assert_eq!(RequestLanguage::from_header(Some(" "), "en").0, "en");
    }
}
