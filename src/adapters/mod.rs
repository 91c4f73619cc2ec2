/// Adapters layer - interface adapters that convert between external formats and domain
pub mod rdf;

pub use rdf::{OntModel, RdfFormat};
