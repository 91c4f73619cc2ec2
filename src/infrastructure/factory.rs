/// Client factory
/// Picks the HTTP or HTTPS transport from the protocol of the target URI

use crate::config::ClientConfig;
use crate::domain::errors::{ClientError, Result};
use crate::domain::vri::Vri;
use crate::infrastructure::connection::{ConnectionInitializer, Get, Post};
use crate::infrastructure::http_client::Client;
use reqwest::blocking::Client as HttpClient;

/// Transport selected for a URI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    Https,
}

impl Transport {
    pub fn for_protocol(protocol: &str) -> Result<Self> {
        match protocol.to_ascii_lowercase().as_str() {
            "http" => Ok(Transport::Http),
            "https" => Ok(Transport::Https),
            other => Err(ClientError::MalformedInput(format!(
                "Unsupported protocol '{}': only http and https are served",
                other
            ))),
        }
    }
}

/// Hands out clients sharing one transport per protocol
#[derive(Debug, Clone)]
pub struct ClientFactory {
    config: ClientConfig,
    http: HttpClient,
    https: HttpClient,
}

impl ClientFactory {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Self::build(&config, Transport::Http)?;
        let https = Self::build(&config, Transport::Https)?;
        Ok(Self {
            config,
            http,
            https,
        })
    }

    fn build(config: &ClientConfig, transport: Transport) -> Result<HttpClient> {
        let mut builder = HttpClient::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout());

        if let Some(connect_timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(connect_timeout);
        }

        if transport == Transport::Https {
            builder = builder
                .https_only(true)
                .danger_accept_invalid_certs(config.accept_invalid_certs);
        }

        builder.build().map_err(|e| {
            ClientError::MalformedInput(format!("Failed to create {:?} client: {}", transport, e))
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn client<I: ConnectionInitializer>(&self, vri: Vri, initializer: I) -> Result<Client<I>> {
        let transport = Transport::for_protocol(vri.protocol())?;
        let http = match transport {
            Transport::Http => self.http.clone(),
            Transport::Https => self.https.clone(),
        };
        tracing::trace!("{:?} transport for {}", transport, vri);

        let mut client = Client::new(vri, http, initializer);
        client.set_media_type(self.config.media_type.clone());
        Ok(client)
    }

    /// GET client for `vri`
    pub fn get_client(&self, vri: Vri) -> Result<Client<Get>> {
        self.client(vri, Get)
    }

    /// POST client for `vri`
    pub fn post_client(&self, vri: Vri) -> Result<Client<Post>> {
        self.client(vri, Post::new())
    }
}
