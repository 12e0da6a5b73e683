//! Resource controllers.
//!
//! A [`Resource`] bundles the five conventional CRUD handlers for one named
//! collection. [`Router::resource`] expands it into plain bindings; there is
//! nothing resource-specific at dispatch time.

use std::future::Future;
use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// A controller for one named collection.
///
/// ```rust
/// use ghast::{Request, Resource, Response, Router};
///
/// struct Widgets;
///
/// impl Resource for Widgets {
///     fn name(&self) -> &str { "widget" }
///     async fn index(&self, _req: Request) -> Response { Response::text("all") }
///     async fn get(&self, req: Request) -> Response {
///         Response::text(req.param("id").unwrap_or_default().to_owned())
///     }
///     async fn create(&self, _req: Request) -> Response { Response::text("created") }
///     async fn update(&self, _req: Request) -> Response { Response::text("updated") }
///     async fn delete(&self, _req: Request) -> Response { Response::text("deleted") }
/// }
///
/// let router = Router::new().resource("/v1/", Widgets);
/// assert_eq!(router.bindings().len(), 5);
/// ```
pub trait Resource: Send + Sync + 'static {
    /// Collection name, appended to the prefix as-is.
    fn name(&self) -> &str;

    fn index(&self, req: Request) -> impl Future<Output = Response> + Send;
    fn get(&self, req: Request) -> impl Future<Output = Response> + Send;
    fn create(&self, req: Request) -> impl Future<Output = Response> + Send;
    fn update(&self, req: Request) -> impl Future<Output = Response> + Send;
    fn delete(&self, req: Request) -> impl Future<Output = Response> + Send;
}

/// Binds one controller method as a handler sharing the controller.
macro_rules! bind {
    ($resource:expr, $op:ident) => {{
        let resource = Arc::clone($resource);
        move |req: Request| {
            let resource = Arc::clone(&resource);
            async move { resource.$op(req).await }
        }
    }};
}

impl Router {
    /// Expand a [`Resource`] into five bindings, in this order:
    ///
    /// ```text
    /// GET     {prefix}{name}       index
    /// GET     {prefix}{name}/:id   get
    /// POST    {prefix}{name}       create
    /// DELETE  {prefix}{name}/:id   delete
    /// PUT     {prefix}{name}/:id   update
    /// ```
    ///
    /// With prefix `"/v1/"` and name `"user"` that is `/v1/user` and
    /// `/v1/user/:id`.
    ///
    /// # Panics
    ///
    /// Panics if the prefix or name make a malformed pattern.
    pub fn resource<R: Resource>(self, prefix: &str, resource: R) -> Self {
        let resource = Arc::new(resource);
        let collection = format!("{prefix}{}", resource.name());
        let member = format!("{collection}/:id");

        self.get(&collection, bind!(&resource, index))
            .get(&member, bind!(&resource, get))
            .post(&collection, bind!(&resource, create))
            .delete(&member, bind!(&resource, delete))
            .put(&member, bind!(&resource, update))
    }
}
