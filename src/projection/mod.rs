//! Caller-driven rendering of catalog records: field exclusion, one-level
//! relation expansion, filtering and pagination.

pub mod directives;
pub mod fields;
pub mod registry;
pub mod serializer;

pub use directives::{DirectiveQuery, Directives};
pub use registry::{Projectable, ProjectionContext};
pub use serializer::{project, project_list};
