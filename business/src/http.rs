//! Request layer over reqwest.
//!
//! [`Client`] shares one connection pool between every request the directory client
//! makes. A request is read to the end before [`RequestBuilder::send`] returns, so the
//! caller gets an owned [`Response`] and never holds a connection while it inspects
//! status and body.

use log::warn;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// Owned status and body of a finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The request never produced a complete response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
pub struct RequestBuilder {
    inner: reqwest::RequestBuilder,
}

impl RequestBuilder {
    pub fn header(self, name: &'static str, value: &str) -> Self {
        Self {
            inner: self.inner.header(name, value),
        }
    }

    /// `Authorization: Bearer <token>`, marked sensitive so it stays out of debug output.
    pub fn bearer_auth(self, token: &str) -> Self {
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                Self {
                    inner: self.inner.header(AUTHORIZATION, value),
                }
            }
            // a token with control characters cannot be sent; the server will answer 401
            Err(_invalid) => {
                warn!("http: session token is not a valid header value");
                self
            }
        }
    }

    /// JSON body plus `content-type: application/json`.
    ///
    /// Serialization errors surface from [`Self::send`].
    pub fn json<T: serde::Serialize + ?Sized>(self, body: &T) -> Self {
        Self {
            inner: self.inner.json(body),
        }
    }

    pub async fn send(self) -> HttpResult<Response> {
        let response = self.inner.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(Response { status, body })
    }
}

/// Entry point for building requests.
///
/// ```ignore
/// let http = roster_business::http::Client::new();
/// let response = http
///     .get("https://reqres.in/api/users?page=1")
///     .bearer_auth("QpwL5tke4Pnpja7X4")
///     .send()
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(reqwest::Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(reqwest::Method::POST, url)
    }

    pub fn put(&self, url: &str) -> RequestBuilder {
        self.request(reqwest::Method::PUT, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.request(reqwest::Method::DELETE, url)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> RequestBuilder {
        RequestBuilder {
            inner: self.inner.request(method, url),
        }
    }
}
