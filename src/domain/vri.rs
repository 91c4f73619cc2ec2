//! Versatile Resource Identifier
//!
//! A [`Vri`] keeps the base URI (everything before `?`) apart from an ordered
//! list of query parameters. Parameters are stored already encoded with
//! `application/x-www-form-urlencoded` rules over UTF-8, so rendering the URI
//! back is plain concatenation.
//!
//! Equality and hashing only look at the base URI; two VRIs that differ only
//! in their query are equal.

use crate::domain::classify::OpenToxType;
use crate::domain::errors::{ClientError, Result};
use crate::domain::ontology::OtClass;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use url::form_urlencoded::byte_serialize;
use url::Url;

/// Name of the legacy query-string authentication parameter
pub const TOKEN_PARAMETER: &str = "tokenid";

const DEFAULT_SCHEME: &str = "http://";

/// URI with structured, mutable query parameters
#[derive(Debug, Clone)]
pub struct Vri {
    base: String,
    parsed: Url,
    params: Vec<(String, String)>,
}

/// Form-encode a single name or value
pub fn encode(raw: &str) -> String {
    byte_serialize(raw.as_bytes()).collect()
}

/// Reverse of [`encode`]; malformed escapes are kept literally
pub fn decode(encoded: &str) -> String {
    let spaced = encoded.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

// Characters RFC 3986 allows anywhere in a URI reference
static URI_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=%]*$").unwrap());

fn parse_base(uri: &str, base: &str) -> Result<Url> {
    if !URI_CHARS.is_match(base) {
        return Err(ClientError::InvalidUri {
            uri: uri.to_string(),
            reason: "contains characters outside the URI character set".to_string(),
        });
    }
    Url::parse(base).map_err(|e| ClientError::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })
}

impl Vri {
    /// Parse a URI string. `http://` is assumed when no scheme is given.
    pub fn new(uri: &str) -> Result<Self> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidUri {
                uri: uri.to_string(),
                reason: "empty input".to_string(),
            });
        }

        let (base, query) = match trimmed.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (trimmed, None),
        };
        let base = if base.contains("://") {
            base.to_string()
        } else {
            format!("{}{}", DEFAULT_SCHEME, base)
        };

        if let Some(query) = query {
            if !URI_CHARS.is_match(query) {
                return Err(ClientError::InvalidUri {
                    uri: uri.to_string(),
                    reason: "query contains characters outside the URI character set"
                        .to_string(),
                });
            }
        }

        let parsed = parse_base(uri, &base)?;

        let params = query
            .map(|q| {
                q.split('&')
                    .filter(|fragment| !fragment.is_empty())
                    .map(|fragment| match fragment.split_once('=') {
                        Some((name, value)) => (encode(&decode(name)), encode(&decode(value))),
                        None => (encode(&decode(fragment)), String::new()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            base,
            parsed,
            params,
        })
    }

    /// Append a parameter; `value` is rendered with its `Display` impl
    pub fn add_url_parameter(&mut self, name: &str, value: impl fmt::Display) -> &mut Self {
        self.params.push((encode(name), encode(&value.to_string())));
        self
    }

    /// Remove every parameter named `name`
    pub fn remove_url_parameter(&mut self, name: &str) -> &mut Self {
        let encoded = encode(name);
        self.params.retain(|(n, _)| *n != encoded);
        self
    }

    /// Remove every `tokenid` parameter
    pub fn clear_token(&mut self) -> &mut Self {
        self.remove_url_parameter(TOKEN_PARAMETER)
    }

    /// Append encoded path segments to the base URI
    pub fn augment(&mut self, fragments: &[&str]) -> Result<&mut Self> {
        let mut base = self.base.clone();
        for fragment in fragments {
            let segment = fragment.trim_start_matches('/');
            if !base.ends_with('/') {
                base.push('/');
            }
            base.push_str(&encode(segment));
        }
        self.parsed = parse_base(&base, &base)?;
        self.base = base;
        Ok(self)
    }

    /// Encoded query parameters in insertion order
    pub fn url_parameters(&self) -> &[(String, String)] {
        &self.params
    }

    /// First value (decoded) of the parameter named `name`
    pub fn url_parameter(&self, name: &str) -> Option<String> {
        let encoded = encode(name);
        self.params
            .iter()
            .find(|(n, _)| *n == encoded)
            .map(|(_, v)| decode(v))
    }

    pub fn query_as_string(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Base URI without query
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full URI as a parsed `Url`
    pub fn to_uri(&self) -> Result<Url> {
        let full = self.to_string();
        Url::parse(&full).map_err(|e| ClientError::InvalidUri {
            uri: full,
            reason: e.to_string(),
        })
    }

    pub fn protocol(&self) -> &str {
        self.parsed.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.parsed.host_str()
    }

    /// Explicit port, or 80/443 for http/https
    pub fn port(&self) -> Option<u16> {
        self.parsed.port_or_known_default()
    }

    pub fn opentox_type(&self) -> Option<OpenToxType> {
        OpenToxType::classify(&self.base, &self.query_as_string())
    }

    pub fn ontological_class(&self) -> Option<OtClass> {
        self.opentox_type().map(|t| t.ontological_class())
    }

    /// Presumed root of the service hosting this resource.
    ///
    /// Cuts the base URI before the first path segment naming a resource
    /// kind, or before `query/compound`. Returns the base unchanged when no
    /// such segment exists.
    pub fn service_base_uri(&self) -> String {
        let after_scheme = self.base.find("://").map_or(0, |i| i + 3);
        let path_start = self.base[after_scheme..]
            .find('/')
            .map_or(self.base.len(), |i| after_scheme + i);
        let segments: Vec<&str> = self.base[path_start..].split('/').collect();

        let mut offset = 0;
        for (i, segment) in segments.iter().enumerate() {
            let lower = segment.to_ascii_lowercase();
            let is_query_compound = lower == "query"
                && segments
                    .get(i + 1)
                    .map_or(false, |next| next.eq_ignore_ascii_case("compound"));
            let names_kind = OpenToxType::ALL.iter().any(|kind| {
                lower == kind.segment() || lower == format!("{}s", kind.segment())
            });
            if i > 0 && (is_query_compound || names_kind) {
                // offset is the start of this segment; cut the '/' before it too
                return self.base[..path_start + offset - 1].to_string();
            }
            offset += segment.len() + 1;
        }
        self.base.clone()
    }

    /// Best-effort resource id.
    ///
    /// Strips the service base and splits the remainder on `/`; yields the
    /// third segment only when exactly three segments remain. Paths of any
    /// other depth give `None`.
    pub fn id(&self) -> Option<String> {
        let service = self.service_base_uri();
        let remainder = self.base.strip_prefix(service.as_str())?;
        let segments: Vec<&str> = remainder.split('/').collect();
        if segments.len() == 3 {
            Some(segments[2].to_string())
        } else {
            None
        }
    }

    fn normalized_base(&self) -> &str {
        self.parsed.as_str()
    }
}

impl fmt::Display for Vri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.base)
        } else {
            write!(f, "{}?{}", self.base, self.query_as_string())
        }
    }
}

impl FromStr for Vri {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Vri::new(s)
    }
}

impl TryFrom<&str> for Vri {
    type Error = ClientError;

    fn try_from(value: &str) -> Result<Self> {
        Vri::new(value)
    }
}

impl PartialEq for Vri {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_base() == other.normalized_base()
    }
}

impl Eq for Vri {}

impl Hash for Vri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_base().hash(state);
    }
}

impl Serialize for Vri {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Vri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Vri::new(&raw).map_err(serde::de::Error::custom)
    }
}
