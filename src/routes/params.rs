use crate::{
    error::AppResult,
    middleware::language::RequestLanguage,
    projection::{DirectiveQuery, Directives},
    services::RequestContext,
};

/// Builds the per-request context from the language header and the
/// directive query string.
pub fn request_context(
    RequestLanguage(language): RequestLanguage,
    query: &DirectiveQuery,
) -> AppResult<RequestContext> {
    let directives = Directives::parse(query)?;
    Ok(RequestContext::new(language, directives))
}
