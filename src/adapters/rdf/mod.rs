/// RDF adapter - parsing response bodies into graphs and reading resources from them
pub mod error_report;
pub mod model;

pub use error_report::read_error_report;
pub use model::{Node, OntModel, RdfFormat, Statement};
