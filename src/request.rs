//! Incoming HTTP request type.

use std::any::Any;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::body::Body;

use crate::params::{self, PathParams};

/// The opaque dependency container a router hands to its handlers.
pub(crate) type Container = Arc<dyn Any + Send + Sync>;

/// An incoming HTTP request.
///
/// The method and target are fixed once the request exists. Middleware gets
/// `&mut Request` so it can attach typed values through
/// [`extensions_mut`](Request::extensions_mut) or adjust headers, but it cannot
/// re-route the request.
pub struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
    pub(crate) params: Option<PathParams>,
    pub(crate) container: Option<Container>,
    pub(crate) extensions: http::Extensions,
}

impl Request {
    /// Builds a request from a method and a request target (`/path?query`).
    ///
    /// The server builds requests for you; this is for hosting the router
    /// behind another transport and for tests.
    pub fn new(method: impl Into<String>, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
            None => (target.to_owned(), None),
        };
        Self {
            method: method.into(),
            path,
            query,
            headers: Vec::new(),
            body: Vec::new(),
            params: None,
            container: None,
            extensions: http::Extensions::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Reads the whole body of an `http::Request` into memory.
    ///
    /// An authority-form target (`CONNECT example.com:443`) has no path, so
    /// the authority itself becomes the path that bindings match against.
    pub(crate) async fn from_http<B: Body>(req: http::Request<B>) -> Result<Self, B::Error> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes().to_vec();
        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (name.as_str().to_owned(), String::from_utf8_lossy(value.as_bytes()).into_owned())
            })
            .collect();
        let path = match (parts.uri.path(), parts.uri.authority()) {
            ("", Some(authority)) => authority.as_str(),
            (path, _) => path,
        };

        Ok(Self {
            method: parts.method.as_str().to_owned(),
            path: path.to_owned(),
            query: parts.uri.query().map(str::to_owned),
            headers,
            body,
            params: None,
            container: None,
            extensions: parts.extensions,
        })
    }

    pub fn method(&self) -> &str { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers_mut(&mut self) -> &mut Vec<(String, String)> {
        &mut self.headers
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        params::path_param(self, key)
    }

    /// All path parameters, or `None` before dispatch has matched a binding.
    pub fn params(&self) -> Option<&PathParams> {
        self.params.as_ref()
    }

    /// Every decoded value of `key` in the query string. See [`params::query_param`].
    pub fn query_param(&self, key: &str) -> Vec<String> {
        params::query_param(self, key)
    }

    /// The router's dependency container, if one was attached and it is a `T`.
    pub fn container<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(self.container.as_ref()?).downcast::<T>().ok()
    }

    pub fn extensions(&self) -> &http::Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut http::Extensions { &mut self.extensions }
}
