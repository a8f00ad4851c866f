use crate::catalog::model::Language;

use super::{CatalogResource, Paginatable, Readable};

/// Languages are reference data loaded by migrations; they are only read.
pub struct LanguageService;

impl CatalogResource for LanguageService {
    type Entity = Language;
}

impl Readable for LanguageService {}

impl Paginatable for LanguageService {}
