/// Connection initialization strategies
/// Each request variant (GET, POST) knows how to open its own connection

use crate::domain::vri::Vri;
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::fmt;
use url::form_urlencoded;

/// Media type of form-encoded POST bodies
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// HTTP method of a request variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opens the connection for one request variant
pub trait ConnectionInitializer: Send + Sync + fmt::Debug {
    fn method(&self) -> Method;

    /// Send the request to `vri` with `headers` and return the response
    /// once its status line and headers have arrived
    fn initialize(
        &self,
        http: &HttpClient,
        vri: &Vri,
        headers: HeaderMap,
    ) -> reqwest::Result<Response>;
}

/// Plain GET
#[derive(Debug, Clone, Default)]
pub struct Get;

impl ConnectionInitializer for Get {
    fn method(&self) -> Method {
        Method::Get
    }

    fn initialize(
        &self,
        http: &HttpClient,
        vri: &Vri,
        headers: HeaderMap,
    ) -> reqwest::Result<Response> {
        http.get(vri.to_string()).headers(headers).send()
    }
}

/// POST with either form parameters or a raw body
#[derive(Debug, Clone, Default)]
pub struct Post {
    params: Vec<(String, String)>,
    body: Option<RawBody>,
}

#[derive(Debug, Clone)]
struct RawBody {
    content_type: String,
    data: Vec<u8>,
}

impl Post {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a form parameter. Ignored when a raw body is set.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.push((name.into(), value.into()));
    }

    /// Send `data` as the body with the given content type instead of a form
    pub fn set_body(&mut self, content_type: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.body = Some(RawBody {
            content_type: content_type.into(),
            data: data.into(),
        });
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.params
    }

    /// Form-encoded parameters as sent on the wire
    pub fn encoded_form(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}

impl ConnectionInitializer for Post {
    fn method(&self) -> Method {
        Method::Post
    }

    fn initialize(
        &self,
        http: &HttpClient,
        vri: &Vri,
        mut headers: HeaderMap,
    ) -> reqwest::Result<Response> {
        let request = http.post(vri.to_string());
        match &self.body {
            Some(body) => {
                if let Ok(value) = HeaderValue::from_str(&body.content_type) {
                    headers.insert(CONTENT_TYPE, value);
                }
                request.headers(headers).body(body.data.clone()).send()
            }
            None => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
                request.headers(headers).body(self.encoded_form()).send()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(Get.method().as_str(), "GET");
        assert_eq!(Post::new().method().to_string(), "POST");
    }

    #[test]
    fn test_form_encoding() {
        let mut post = Post::new();
        post.add_parameter("dataset_uri", "http://host/dataset/1");
        post.add_parameter("prediction_feature", "a b");
        assert_eq!(
            post.encoded_form(),
            "dataset_uri=http%3A%2F%2Fhost%2Fdataset%2F1&prediction_feature=a+b"
        );
        assert_eq!(post.parameters().len(), 2);
    }
}
