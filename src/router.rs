//! Ordered, first-match request router.
//!
//! A [`Router`] is a flat, ordered table of bindings. Dispatch walks the table
//! from the top and runs the first binding whose method and pattern both
//! match; nothing after it is looked at. There is no specificity scoring: if
//! `/users/:id` is registered before `/users/me`, the latter is unreachable.
//!
//! Sub-routers are composed by [`Router::merge`], which copies every binding
//! of each child into the parent with the child's base path prefixed and the
//! child's router-level middleware appended to the binding's chain.
//!
//! Build the whole table at startup, then hand the router to
//! [`Server::serve`](crate::Server::serve) or
//! [`Router::into_service`]. Every registration method takes `self` by value,
//! so a router cannot change once it is being served.

use std::any::Any;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::Middleware;
use crate::params::PathParams;
use crate::pattern::{Pattern, PatternError};
use crate::request::{Container, Request};
use crate::response::Response;

/// One registered route: method, pattern, handler and middleware chain.
#[derive(Clone)]
pub struct Binding {
    method: Method,
    pattern: String,
    /// Compiled for the owning router's base path followed by `pattern`.
    matcher: Pattern,
    handler: BoxedHandler,
    middleware: Vec<Middleware>,
}

impl Binding {
    pub fn method(&self) -> Method { self.method }

    /// The pattern as registered or merged, without the owning router's base.
    pub fn pattern(&self) -> &str { &self.pattern }

    /// The compiled pattern requests are matched against.
    pub fn matcher(&self) -> &Pattern { &self.matcher }

    pub fn middleware(&self) -> &[Middleware] { &self.middleware }
}

/// Outcome of [`Router::dispatch`].
#[must_use]
pub enum Dispatch {
    /// A binding matched and its handler produced this response.
    Handled(Response),
    /// No binding matched. Nothing ran; the request is handed back unchanged.
    NotFound(Request),
}

impl Dispatch {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The handler's response, or `None` if nothing matched.
    pub fn response(self) -> Option<Response> {
        match self {
            Self::Handled(response) => Some(response),
            Self::NotFound(_) => None,
        }
    }
}

/// The application router.
#[derive(Clone, Default)]
pub struct Router {
    base: String,
    bindings: Vec<Binding>,
    middleware: Vec<Middleware>,
    container: Option<Container>,
}

macro_rules! verbs {
    ($($method:ident: $plain:ident, $with:ident;)*) => {$(
        #[doc = concat!("Register a `", stringify!($method), "` handler. Returns `self` for chaining.")]
        ///
        /// # Panics
        ///
        /// Panics if the pattern is malformed.
        pub fn $plain(self, pattern: &str, handler: impl Handler) -> Self {
            self.route(Method::$method, pattern, handler, [])
        }

        #[doc = concat!("Register a `", stringify!($method), "` handler with its own middleware chain.")]
        ///
        /// # Panics
        ///
        /// Panics if the pattern is malformed.
        pub fn $with(
            self,
            pattern: &str,
            handler: impl Handler,
            middleware: impl IntoIterator<Item = Middleware>,
        ) -> Self {
            self.route(Method::$method, pattern, handler, middleware)
        }
    )*};
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    verbs! {
        Get: get, get_with;
        Post: post, post_with;
        Put: put, put_with;
        Patch: patch, patch_with;
        Delete: delete, delete_with;
        Options: options, options_with;
        Head: head, head_with;
        Trace: trace, trace_with;
        Connect: connect, connect_with;
    }

    /// Register a handler for a method + pattern pair. Returns `self` for chaining.
    ///
    /// Path parameters use `:name` segments; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use ghast::{Method, Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn create_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/users/:id", get_user)
    ///     .on(Method::Post, "/users",     create_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the pattern is malformed. Use [`try_route`](Self::try_route)
    /// to get the [`PatternError`] instead.
    pub fn on(self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        self.route(method, pattern, handler, [])
    }

    /// [`on`](Self::on) with a binding-specific middleware chain.
    pub fn route(
        self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> Self {
        self.try_route(method, pattern, handler, middleware)
            .unwrap_or_else(|e| panic!("invalid route: {e}"))
    }

    pub fn try_route(
        mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> Result<Self, PatternError> {
        let matcher = self.compile(pattern)?;
        debug!(%method, pattern = matcher.as_str(), "route registered");
        self.bindings.push(Binding {
            method,
            pattern: pattern.to_owned(),
            matcher,
            handler: handler.into_boxed_handler(),
            middleware: middleware.into_iter().collect(),
        });
        Ok(self)
    }

    /// Set the base path prepended to every pattern of this router, both when
    /// it dispatches and when it is merged into a parent.
    ///
    /// The prefix is concatenated as-is: `"/v1/"` + `"/user"` is
    /// `"/v1//user"`.
    ///
    /// # Panics
    ///
    /// Panics if a prefixed pattern is malformed.
    pub fn base(self, prefix: &str) -> Self {
        self.try_base(prefix)
            .unwrap_or_else(|e| panic!("invalid base path: {e}"))
    }

    pub fn try_base(mut self, prefix: &str) -> Result<Self, PatternError> {
        self.base = prefix.to_owned();
        for i in 0..self.bindings.len() {
            let matcher = self.compile(&self.bindings[i].pattern)?;
            self.bindings[i].matcher = matcher;
        }
        Ok(self)
    }

    /// Copy every binding of each child into this router, in order.
    ///
    /// Each copy's pattern is `child.base + pattern` and its chain is the
    /// binding's own middleware followed by the child's router-level
    /// middleware. Children are only borrowed: their own tables are unchanged
    /// and they remain usable on their own.
    ///
    /// # Panics
    ///
    /// Panics if a prefixed pattern is malformed.
    pub fn merge<'a>(self, children: impl IntoIterator<Item = &'a Router>) -> Self {
        self.try_merge(children)
            .unwrap_or_else(|e| panic!("invalid merged route: {e}"))
    }

    pub fn try_merge<'a>(
        mut self,
        children: impl IntoIterator<Item = &'a Router>,
    ) -> Result<Self, PatternError> {
        for child in children {
            debug!(base = %child.base, bindings = child.bindings.len(), "merging router");
            for binding in &child.bindings {
                let pattern = format!("{}{}", child.base, binding.pattern);
                let matcher = self.compile(&pattern)?;
                let middleware = binding.middleware.iter()
                    .chain(&child.middleware)
                    .cloned()
                    .collect();

                self.bindings.push(Binding {
                    method: binding.method,
                    pattern,
                    matcher,
                    handler: Arc::clone(&binding.handler),
                    middleware,
                });
            }
        }
        Ok(self)
    }

    /// Append router-level middleware.
    ///
    /// It runs before the binding chain of every request this router
    /// dispatches, and is appended to the chains of this router's bindings when
    /// the router is merged into a parent.
    pub fn add_middleware(mut self, middleware: impl IntoIterator<Item = Middleware>) -> Self {
        self.middleware.extend(middleware);
        self
    }

    /// Attach a dependency container. Handlers of this router read it back
    /// with [`Request::container`]. ghast never looks inside it.
    pub fn with_container<T: Any + Send + Sync>(mut self, container: Arc<T>) -> Self {
        self.container = Some(container);
        self
    }

    pub fn base_path(&self) -> &str { &self.base }
    pub fn bindings(&self) -> &[Binding] { &self.bindings }
    pub fn middleware(&self) -> &[Middleware] { &self.middleware }

    /// Route one request: run the first matching binding, or hand the request
    /// back as [`Dispatch::NotFound`].
    ///
    /// Methods are compared by exact string equality with the binding's
    /// method; the pattern is matched against the request path, never the
    /// query string.
    pub async fn dispatch(&self, mut req: Request) -> Dispatch {
        let Some((binding, captures)) = self.find(&req) else {
            debug!(method = req.method(), path = req.path(), "no route matched");
            return Dispatch::NotFound(req);
        };
        trace!(
            method = req.method(),
            path = req.path(),
            pattern = binding.matcher.as_str(),
            "route matched"
        );

        for middleware in self.middleware.iter().chain(&binding.middleware) {
            middleware.run(&mut req);
        }

        req.params = Some(PathParams::new(binding.matcher.names(), captures));
        if let Some(container) = &self.container {
            req.container = Some(Arc::clone(container));
        }

        let handler = Arc::clone(&binding.handler);
        Dispatch::Handled(handler.call(req).await)
    }

    fn find(&self, req: &Request) -> Option<(&Binding, Vec<String>)> {
        self.bindings
            .iter()
            .filter(|binding| binding.method.as_str() == req.method())
            .find_map(|binding| {
                binding.matcher.captures(req.path()).map(|captures| (binding, captures))
            })
    }

    fn compile(&self, pattern: &str) -> Result<Pattern, PatternError> {
        Pattern::compile(&format!("{}{}", self.base, pattern))
    }
}
