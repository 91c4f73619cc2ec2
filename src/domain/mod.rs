/// Domain layer - resource identifiers, classification and error types
/// This layer has no dependencies on outer layers

pub mod classify;
pub mod error_report;
pub mod errors;
pub mod ontology;
pub mod token;
pub mod vri;

pub use classify::OpenToxType;
pub use error_report::ErrorReport;
pub use errors::{ClientError, Result};
pub use ontology::OtClass;
pub use token::AuthToken;
pub use vri::Vri;
