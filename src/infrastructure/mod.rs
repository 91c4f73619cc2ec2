/// Infrastructure layer - HTTP transport
pub mod connection;
pub mod factory;
pub mod http_client;

pub use connection::{ConnectionInitializer, Get, Method, Post};
pub use factory::{ClientFactory, Transport};
pub use http_client::{Client, RemoteStream, URI_LIST};
