// Library exports following Clean Architecture principles

// Domain layer (VRI, classification, errors)
pub mod domain;

// Adapters layer (RDF)
pub mod adapters;

// Infrastructure layer (HTTP transport)
pub mod infrastructure;

pub mod config;

pub use adapters::{OntModel, RdfFormat};
pub use config::ClientConfig;
pub use domain::{AuthToken, ClientError, ErrorReport, OpenToxType, OtClass, Result, Vri};
pub use infrastructure::{Client, ClientFactory};
