//! Minimal ghast example: a versioned API built from sub-routers, a CRUD
//! resource, and route-level middleware.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:9000/v1/users/42
//!   curl 'http://localhost:9000/v1/search?tag=a&tag=b'
//!   curl -X POST http://localhost:9000/v1/widget -d '{"name":"gear"}'
//!   curl -X DELETE http://localhost:9000/v1/widget/7
//!   curl http://localhost:9000/admin/stats -H 'x-admin: yes'

use std::sync::Arc;

use ghast::{Middleware, Request, Resource, Response, Router, StatusCode, middleware};

struct Config {
    greeting: String,
}

#[tokio::main]
async fn main() -> Result<(), ghast::Error> {
    tracing_subscriber::fmt::init();

    let v1 = Router::new()
        .base("/v1")
        .get("/users/:id", get_user)
        .get("/search", search)
        .resource("/", Widgets);

    let admin = Router::new()
        .base("/admin")
        .add_middleware([Middleware::new(|req| {
            if req.header("x-admin").is_none() {
                tracing::warn!(path = req.path(), "admin route hit without x-admin header");
            }
        })])
        .get("/stats", stats);

    let app = Router::new()
        .with_container(Arc::new(Config { greeting: "hello".to_owned() }))
        .add_middleware([middleware::trace()])
        .merge([&v1, &admin]);

    app.serve_default().await
}

// GET /v1/users/:id
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    let greeting = req.container::<Config>().map(|c| c.greeting.clone()).unwrap_or_default();
    Response::json(format!(r#"{{"id":"{id}","greeting":"{greeting}"}}"#).into_bytes())
}

// GET /v1/search?tag=..&tag=..
async fn search(req: Request) -> Response {
    Response::text(req.query_param("tag").join(","))
}

// GET /admin/stats
async fn stats(_req: Request) -> Response {
    Response::json(br#"{"uptime":"ok"}"#.to_vec())
}

struct Widgets;

impl Resource for Widgets {
    fn name(&self) -> &str {
        "widget"
    }

    async fn index(&self, _req: Request) -> Response {
        Response::json(b"[]".to_vec())
    }

    async fn get(&self, req: Request) -> Response {
        let id = req.param("id").unwrap_or("unknown");
        Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
    }

    async fn create(&self, req: Request) -> Response {
        if req.body().is_empty() {
            return Response::status(StatusCode::BAD_REQUEST);
        }
        Response::builder()
            .status(StatusCode::CREATED)
            .header("location", "/v1/widget/99")
            .json(req.body().to_vec())
    }

    async fn update(&self, req: Request) -> Response {
        Response::json(req.body().to_vec())
    }

    async fn delete(&self, _req: Request) -> Response {
        Response::status(StatusCode::NO_CONTENT)
    }
}
