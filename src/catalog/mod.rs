pub mod graph;
pub mod guard;
pub mod intl;
pub mod model;
pub mod variants;

pub use graph::{CatalogEntity, CatalogGraph};
pub use intl::{LocalizedText, TextField};
pub use model::{EntityKind, Id};
