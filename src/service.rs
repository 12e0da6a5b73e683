//! hyper service adapter.
//!
//! [`RouterService`] lets a finished [`Router`] stand in wherever hyper expects
//! a request handler: it reads the body, dispatches, and answers `404 Not
//! Found` when no binding matched. The router itself never writes a "not
//! found" response; that policy lives here, in the transport layer.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use hyper::body::Body;
use hyper::service::Service;
use tracing::warn;

use crate::request::Request;
use crate::response::Response;
use crate::router::{Dispatch, Router};

/// A cheaply clonable hyper [`Service`] backed by a shared [`Router`].
#[derive(Clone)]
pub struct RouterService {
    router: Arc<Router>,
}

impl RouterService {
    pub fn new(router: Router) -> Self {
        Self { router: Arc::new(router) }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl Router {
    /// Freeze this router into a hyper service.
    pub fn into_service(self) -> RouterService {
        RouterService::new(self)
    }
}

impl<B> Service<http::Request<B>> for RouterService
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: fmt::Display,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Infallible>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let router = Arc::clone(&self.router);
        Box::pin(async move {
            let req = match Request::from_http(req).await {
                Ok(req) => req,
                Err(e) => {
                    warn!("failed to read request body: {e}");
                    return Ok(Response::status(StatusCode::BAD_REQUEST).into_inner());
                }
            };

            let response = match router.dispatch(req).await {
                Dispatch::Handled(response) => response,
                Dispatch::NotFound(_) => Response::status(StatusCode::NOT_FOUND),
            };
            Ok(response.into_inner())
        })
    }
}
