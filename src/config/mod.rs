use crate::domain::errors::{ClientError, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default accepted media type for OpenTox resources
pub const DEFAULT_MEDIA_TYPE: &str = "application/rdf+xml";

/// Client configuration, read from a `client.xml` file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename = "client")]
pub struct ClientConfig {
    /// Value of the `User-Agent` header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Media type sent in `Accept` unless a request overrides it
    #[serde(default = "default_media_type")]
    pub media_type: String,

    /// Connect timeout in seconds; platform default when absent
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,

    /// Whole-request timeout in seconds; none when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Skip certificate verification on HTTPS (self-signed service deployments)
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_user_agent() -> String {
    format!("opentox-client/{}", env!("CARGO_PKG_VERSION"))
}

fn default_media_type() -> String {
    DEFAULT_MEDIA_TYPE.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            media_type: default_media_type(),
            connect_timeout_secs: None,
            timeout_secs: None,
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from an XML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path).map_err(|e| ClientError::Config {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        serde_xml_rs::from_str(&contents).map_err(|e| ClientError::Config {
            path,
            reason: e.to_string(),
        })
    }

    /// Defaults overlaid with `OPENTOX_USER_AGENT` and `OPENTOX_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(agent) = std::env::var("OPENTOX_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Ok(raw) = std::env::var("OPENTOX_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                ClientError::MalformedInput(format!("OPENTOX_TIMEOUT_SECS '{}': {}", raw, e))
            })?;
            config.timeout_secs = Some(secs);
        }
        Ok(config)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<client>
    <user_agent>toxpredict/2.0</user_agent>
    <media_type>text/turtle</media_type>
    <connect_timeout_secs>5</connect_timeout_secs>
    <timeout_secs>60</timeout_secs>
    <accept_invalid_certs>true</accept_invalid_certs>
</client>"#;

        let config: ClientConfig = serde_xml_rs::from_str(xml).unwrap();
        assert_eq!(config.user_agent, "toxpredict/2.0");
        assert_eq!(config.media_type, "text/turtle");
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.timeout(), Some(Duration::from_secs(60)));
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_parse_config_without_optional_fields() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<client>
    <user_agent>minimal</user_agent>
</client>"#;

        let config: ClientConfig = serde_xml_rs::from_str(xml).unwrap();
        assert_eq!(config.user_agent, "minimal");
        assert_eq!(config.media_type, DEFAULT_MEDIA_TYPE);
        assert!(config.connect_timeout().is_none());
        assert!(config.timeout().is_none());
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.user_agent.starts_with("opentox-client/"));
        assert_eq!(config.media_type, "application/rdf+xml");
    }

    #[test]
    fn test_from_file_success() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<client>
    <user_agent>from-file</user_agent>
    <timeout_secs>10</timeout_secs>
</client>"#;
        temp_file.write_all(xml.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = ClientConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.user_agent, "from-file");
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn test_from_file_not_found() {
        let result = ClientConfig::from_file("/nonexistent/path/client.xml");
        assert!(matches!(result, Err(ClientError::Config { .. })));
    }

    #[test]
    fn test_from_file_invalid_xml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not valid xml").unwrap();
        temp_file.flush().unwrap();

        let result = ClientConfig::from_file(temp_file.path());
        assert!(result.is_err());
    }
}
