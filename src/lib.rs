//! # ghast
//!
//! An ordered, first-match HTTP router with composable sub-routers.
//!
//! ## The contract
//!
//! A [`Router`] is a flat table of bindings: method, path pattern, handler,
//! middleware chain. A request runs the **first** binding whose method and
//! pattern match, in registration order. No specificity scoring, no
//! trailing-slash guessing, no wildcard precedence rules. If two patterns
//! overlap, the earlier one wins, always.
//!
//! - **Patterns**: literal segments plus `:name` segments, compiled once at
//!   registration. A malformed pattern aborts startup.
//! - **Composition**: [`Router::merge`] copies a sub-router's bindings into
//!   the parent, prefixed with the sub-router's [`base`](Router::base) and
//!   carrying its router-level middleware.
//! - **Middleware**: side-effect-only hooks over `&mut Request`. They never
//!   short-circuit.
//! - **Parameters**: [`Request::param`] for path captures,
//!   [`Request::query_param`] for the query string.
//!
//! The server (hyper on tokio, HTTP/1.1 and HTTP/2, graceful shutdown) is a
//! thin shell around [`Router::dispatch`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ghast::{Request, Response, Router, Server, middleware};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ghast::Error> {
//!     let users = Router::new()
//!         .base("/users")
//!         .get("/:id", get_user)
//!         .post("", create_user);
//!
//!     let app = Router::new()
//!         .add_middleware([middleware::trace()])
//!         .merge([&users]);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//!
//! async fn create_user(_req: Request) -> Response {
//!     Response::builder()
//!         .status(ghast::StatusCode::CREATED)
//!         .header("location", "/users/99")
//!         .json(br#"{"id":"99"}"#.to_vec())
//! }
//! ```

mod error;
mod handler;
mod method;
mod pattern;
mod request;
mod resource;
mod response;
mod router;
mod server;
mod service;

pub mod middleware;
pub mod params;

pub use error::Error;
pub use handler::Handler;
pub use http::StatusCode;
pub use method::Method;
pub use middleware::Middleware;
pub use params::PathParams;
pub use pattern::{Pattern, PatternError};
pub use request::Request;
pub use resource::Resource;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{Binding, Dispatch, Router};
pub use server::{Server, ServerConfig};
pub use service::RouterService;
