//! Middleware layer.
//!
//! Middleware is a synchronous function over `&mut Request`, run for its side
//! effects before the handler of a matched binding: tracing, metrics,
//! stamping request ids into [`extensions`](crate::Request::extensions_mut),
//! inspecting auth headers.
//!
//! Middleware cannot stop the chain or answer the request itself. Every
//! middleware of a matched binding runs, then the handler runs. Order:
//!
//! 1. the dispatching router's own middleware ([`Router::add_middleware`]),
//! 2. the binding's chain: middleware passed at registration, followed by the
//!    router-level middleware of each sub-router the binding was merged from.
//!
//! Nothing runs when no binding matches.
//!
//! [`Router::add_middleware`]: crate::Router::add_middleware

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::request::Request;

/// A shared, side-effect-only request hook.
///
/// ```rust
/// use ghast::{Middleware, Router};
///
/// #[derive(Clone)]
/// struct Tenant(String);
///
/// let tenant = Middleware::new(|req| {
///     let tenant = req.header("x-tenant").unwrap_or("public").to_owned();
///     req.extensions_mut().insert(Tenant(tenant));
/// });
///
/// let router = Router::new().add_middleware([tenant]);
/// ```
#[derive(Clone)]
pub struct Middleware(Arc<dyn Fn(&mut Request) + Send + Sync + 'static>);

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Request) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn run(&self, req: &mut Request) {
        (self.0)(req)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Middleware")
    }
}

/// One `info` event per matched request, with method, path and query.
pub fn trace() -> Middleware {
    Middleware::new(|req| {
        info!(method = req.method(), path = req.path(), query = req.query(), "request");
    })
}
