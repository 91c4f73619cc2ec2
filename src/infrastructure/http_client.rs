/// Blocking OpenTox client
/// One instance drives exactly one request/response cycle

use crate::adapters::rdf::{read_error_report, OntModel, RdfFormat};
use crate::config::DEFAULT_MEDIA_TYPE;
use crate::domain::errors::{ClientError, Result};
use crate::domain::token::{AuthToken, SUBJECT_ID_HEADER};
use crate::domain::vri::Vri;
use crate::infrastructure::connection::{ConnectionInitializer, Get, Post};
use parking_lot::Mutex;
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};

/// Media type of newline-separated URI lists
pub const URI_LIST: &str = "text/uri-list";

/// Buffered response body
pub type RemoteStream = BufReader<Response>;

/// Connection lifecycle. `Closed` is terminal.
#[derive(Debug)]
enum ConnectionState {
    Unconnected,
    Connected(Connection),
    Closed,
}

#[derive(Debug)]
struct Connection {
    status: u16,
    headers: HeaderMap,
    body: Option<Response>,
}

impl Connection {
    fn open(response: Response) -> Self {
        Self {
            status: response.status().as_u16(),
            headers: response.headers().clone(),
            body: Some(response),
        }
    }
}

/// Status codes whose body is the requested representation
pub fn is_success(status: u16) -> bool {
    matches!(status, 200 | 201 | 202)
}

/// Client for a single request against an OpenTox resource.
///
/// Configure it with the `&mut self` setters, then read the response through
/// any of the `response_*` methods. The first read connects; every later read
/// reuses that connection. Reads take `&self`, so a configured client can be
/// shared between threads: concurrent first reads open one connection only.
#[derive(Debug)]
pub struct Client<I: ConnectionInitializer = Get> {
    vri: Vri,
    http: HttpClient,
    initializer: I,
    media_type: String,
    headers: HeaderMap,
    state: Mutex<ConnectionState>,
}

impl<I: ConnectionInitializer> Client<I> {
    /// Build a client on an existing transport
    pub fn new(vri: Vri, http: HttpClient, initializer: I) -> Self {
        Self {
            vri,
            http,
            initializer,
            media_type: DEFAULT_MEDIA_TYPE.to_string(),
            headers: HeaderMap::new(),
            state: Mutex::new(ConnectionState::Unconnected),
        }
    }

    pub fn vri(&self) -> &Vri {
        &self.vri
    }

    /// Replace the target. Has no effect on an already open connection.
    pub fn set_uri(&mut self, vri: Vri) -> &mut Self {
        self.vri = vri;
        self
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Media type sent as `Accept`
    pub fn set_media_type(&mut self, media_type: impl Into<String>) -> &mut Self {
        self.media_type = media_type.into();
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Add a request header. `Accept` is routed to [`Client::set_media_type`].
    pub fn add_header_parameter(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        if name.trim().is_empty() {
            return Err(ClientError::MalformedInput(
                "Header name must not be empty".to_string(),
            ));
        }
        if name.eq_ignore_ascii_case(ACCEPT.as_str()) {
            return Ok(self.set_media_type(value));
        }

        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::MalformedInput(format!("Header name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            ClientError::MalformedInput(format!("Value of header '{}': {}", name, e))
        })?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Send `token` in the `subjectid` header; no-op for `None`
    pub fn authorize(&mut self, token: Option<&AuthToken>) -> Result<&mut Self> {
        match token {
            Some(token) => self.add_header_parameter(SUBJECT_ID_HEADER, token.as_str()),
            None => Ok(self),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(*self.state.lock(), ConnectionState::Connected(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(*self.state.lock(), ConnectionState::Closed)
    }

    fn address(&self) -> String {
        self.vri.to_string()
    }

    fn request_headers(&self, accept: Option<&str>) -> Result<HeaderMap> {
        let mut headers = self.headers.clone();
        let accept = accept.unwrap_or(&self.media_type);
        let value = HeaderValue::from_str(accept).map_err(|e| {
            ClientError::MalformedInput(format!("Media type '{}': {}", accept, e))
        })?;
        headers.insert(ACCEPT, value);
        Ok(headers)
    }

    // Connects unless already connected. Runs with the state lock held, so
    // concurrent first callers open a single connection between them.
    fn ensure_connected<'a>(
        &self,
        state: &'a mut ConnectionState,
        accept: Option<&str>,
    ) -> Result<&'a mut Connection> {
        if matches!(state, ConnectionState::Unconnected) {
            let headers = self.request_headers(accept)?;
            tracing::debug!("{} {}", self.initializer.method(), self.address());
            let response = self
                .initializer
                .initialize(&self.http, &self.vri, headers)
                .map_err(|e| ClientError::connection(self.address(), e))?;
            tracing::debug!("{} answered {}", self.address(), response.status());
            *state = ConnectionState::Connected(Connection::open(response));
        }

        match state {
            ConnectionState::Connected(connection) => Ok(connection),
            _ => Err(ClientError::Closed {
                address: self.address(),
            }),
        }
    }

    fn with_connection<T>(
        &self,
        accept: Option<&str>,
        f: impl FnOnce(&mut Connection) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.lock();
        let connection = self.ensure_connected(&mut state, accept)?;
        f(connection)
    }

    fn take_stream(&self, accept: Option<&str>) -> Result<(u16, RemoteStream)> {
        self.with_connection(accept, |connection| {
            let body = connection.body.take().ok_or_else(|| ClientError::Connection {
                address: self.address(),
                source: Some("response body already consumed".into()),
            })?;
            Ok((connection.status, BufReader::new(body)))
        })
    }

    /// Buffered response body. For 200/201/202 this is the requested
    /// representation, otherwise the error body; check
    /// [`Client::response_code`] to tell which. The body can be taken once.
    pub fn remote_stream(&self) -> Result<RemoteStream> {
        self.take_stream(None).map(|(_, stream)| stream)
    }

    /// Whole body as one string, line breaks dropped
    pub fn response_text(&self) -> Result<String> {
        let stream = self.remote_stream()?;
        let mut text = String::new();
        for line in stream.lines() {
            let line = line.map_err(|e| ClientError::connection(self.address(), e))?;
            text.push_str(&line);
        }
        Ok(text)
    }

    /// Parse the body as RDF; RDF/XML when `format` is `None`
    pub fn response_ont_model(&self, format: Option<RdfFormat>) -> Result<OntModel> {
        let format = format.unwrap_or_default();
        let (status, stream) = self.take_stream(None)?;
        if !is_success(status) {
            return Err(self.remote_failure(status, stream));
        }

        OntModel::parse(stream, format).map_err(|e| {
            tracing::warn!("Unparseable {} representation from {}: {}", format, self.address(), e);
            e
        })
    }

    pub fn response_code(&self) -> Result<u16> {
        self.with_connection(None, |connection| Ok(connection.status))
    }

    /// Parse a `text/uri-list` body. `Accept` is forced to `text/uri-list`
    /// when this call opens the connection. A single malformed line fails
    /// the whole call.
    pub fn response_uri_list(&self) -> Result<HashSet<Vri>> {
        let (status, stream) = self.take_stream(Some(URI_LIST))?;
        if !is_success(status) {
            return Err(self.remote_failure(status, stream));
        }

        let mut uris = HashSet::new();
        for line in stream.lines() {
            let line = line.map_err(|e| ClientError::connection(self.address(), e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let vri = Vri::new(line).map_err(|e| ClientError::RemoteService {
                address: self.address(),
                status,
                message: format!("Malformed URI in {} response: {}", URI_LIST, e),
                report: None,
            })?;
            uris.insert(vri);
        }
        Ok(uris)
    }

    /// Value of response header `name`, matched case-insensitively
    pub fn response_header(&self, name: &str) -> Result<Option<String>> {
        self.with_connection(None, |connection| {
            Ok(connection
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string))
        })
    }

    /// `Content-Type` without parameters
    pub fn response_content_type(&self) -> Result<Option<String>> {
        Ok(self
            .response_header(CONTENT_TYPE.as_str())?
            .and_then(|v| v.split(';').next().map(|s| s.trim().to_string())))
    }

    /// Release the connection. Further reads fail with [`ClientError::Closed`].
    pub fn close(&self) {
        let mut state = self.state.lock();
        if !matches!(*state, ConnectionState::Closed) {
            tracing::debug!("Closing client for {}", self.address());
        }
        *state = ConnectionState::Closed;
    }

    // Classify a non-success response, reading the error report from its
    // body when the body is RDF
    fn remote_failure(&self, status: u16, mut stream: RemoteStream) -> ClientError {
        let format = stream
            .get_ref()
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(RdfFormat::from_media_type)
            .unwrap_or_default();

        let mut body = Vec::new();
        let report = match stream.read_to_end(&mut body) {
            Ok(_) => OntModel::parse(body.as_slice(), format)
                .ok()
                .and_then(|model| read_error_report(&model)),
            Err(e) => {
                tracing::debug!("Could not read error body from {}: {}", self.address(), e);
                None
            }
        };
        ClientError::from_status(status, self.address(), report)
    }
}

impl Client<Post> {
    /// Add a form parameter to the POST body
    pub fn add_post_parameter(&mut self, name: &str, value: &str) -> &mut Self {
        self.initializer.add_parameter(name, value);
        self
    }

    /// Post `data` as the body instead of form parameters
    pub fn set_post_body(&mut self, content_type: &str, data: impl Into<Vec<u8>>) -> &mut Self {
        self.initializer.set_body(content_type, data);
        self
    }
}
