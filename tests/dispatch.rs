use std::sync::{Arc, Mutex};

use ghast::{Dispatch, Handler, Middleware, Request, Response, Router};

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A handler that records `label` when invoked and answers with it.
fn record(log: &Log, label: &'static str) -> impl Handler {
    let log = Arc::clone(log);
    move |_req: Request| {
        log.lock().unwrap().push(label.to_owned());
        async move { Response::text(label) }
    }
}

fn mark(log: &Log, label: &'static str) -> Middleware {
    let log = Arc::clone(log);
    Middleware::new(move |_req| log.lock().unwrap().push(label.to_owned()))
}

fn body(dispatch: Dispatch) -> String {
    let response = dispatch.response().expect("a binding should have matched");
    String::from_utf8_lossy(response.body()).into_owned()
}

async fn echo_id(req: Request) -> Response {
    Response::text(req.param("id").unwrap_or("<none>").to_owned())
}

#[tokio::test]
async fn first_registered_binding_wins_on_overlap() {
    let log = log();
    let router = Router::new()
        .get("/users/:id", record(&log, "by-id"))
        .get("/users/me", record(&log, "me"));

    assert_eq!(body(router.dispatch(Request::new("GET", "/users/me")).await), "by-id");
    assert_eq!(entries(&log), ["by-id"]);
}

#[tokio::test]
async fn scanning_stops_at_the_first_match() {
    let log = log();
    let router = Router::new()
        .get("/same", record(&log, "first"))
        .get("/same", record(&log, "second"));

    let _ = router.dispatch(Request::new("GET", "/same")).await;
    let _ = router.dispatch(Request::new("GET", "/same")).await;
    assert_eq!(entries(&log), ["first", "first"]);
}

#[tokio::test]
async fn method_is_compared_exactly() {
    let log = log();
    let router = Router::new()
        .post("/items", record(&log, "post"))
        .get("/items", record(&log, "get"));

    assert_eq!(body(router.dispatch(Request::new("GET", "/items")).await), "get");
    assert!(router.dispatch(Request::new("get", "/items")).await.is_not_found());
    assert!(router.dispatch(Request::new("PUT", "/items")).await.is_not_found());
    assert!(router.dispatch(Request::new("PURGE", "/items")).await.is_not_found());
    assert_eq!(entries(&log), ["get"]);
}

#[tokio::test]
async fn path_parameter_is_exposed_to_the_handler() {
    let router = Router::new().get("/user/:id", echo_id);
    assert_eq!(body(router.dispatch(Request::new("GET", "/user/42")).await), "42");
}

#[tokio::test]
async fn unbound_parameter_is_absent() {
    let router = Router::new().get("/user/:id", |req: Request| async move {
        assert_eq!(req.param("id"), Some("42"));
        assert_eq!(req.param("name"), None);
        assert_eq!(ghast::params::path_param(&req, "name"), None);
        Response::text("ok")
    });

    assert_eq!(body(router.dispatch(Request::new("GET", "/user/42")).await), "ok");
}

#[tokio::test]
async fn only_the_matching_binding_contributes_parameters() {
    let router = Router::new()
        .get("/user/:uid/edit", |_req: Request| async move { Response::text("edit") })
        .get("/user/:id", |req: Request| async move {
            assert_eq!(req.param("uid"), None);
            assert_eq!(req.param("id"), Some("42"));
            assert_eq!(req.params().map(|p| p.len()), Some(1));
            Response::text("ok")
        });

    assert_eq!(body(router.dispatch(Request::new("GET", "/user/42")).await), "ok");
}

#[tokio::test]
async fn literal_segments_match_regardless_of_case() {
    let router = Router::new().get("/user/:id", echo_id);
    assert_eq!(body(router.dispatch(Request::new("GET", "/USER/AbC")).await), "AbC");
    assert_eq!(body(router.dispatch(Request::new("GET", "/User/42")).await), "42");
}

#[tokio::test]
async fn static_route_attaches_an_empty_context() {
    let router = Router::new().get("/health", |req: Request| async move {
        let params = req.params().expect("context is attached on match");
        assert!(params.is_empty());
        Response::text("ok")
    });

    assert_eq!(body(router.dispatch(Request::new("GET", "/health")).await), "ok");
}

#[tokio::test]
async fn query_string_is_not_part_of_the_match() {
    let router = Router::new().get("/search", |req: Request| async move {
        Response::text(req.query_param("q").join(","))
    });

    let dispatched = router.dispatch(Request::new("GET", "/search?q=rust&q=http%2F2")).await;
    assert_eq!(body(dispatched), "rust,http/2");
}

#[tokio::test]
async fn not_found_runs_nothing_and_returns_the_request() {
    let log = log();
    let router = Router::new()
        .add_middleware([mark(&log, "global")])
        .get_with("/users/:id", record(&log, "handler"), [mark(&log, "route")]);

    // path matches, method does not
    let dispatched = router.dispatch(Request::new("DELETE", "/users/1")).await;
    assert!(dispatched.is_not_found());

    // method matches, path does not
    match router.dispatch(Request::new("GET", "/accounts/1?x=y")).await {
        Dispatch::NotFound(req) => {
            assert_eq!(req.path(), "/accounts/1");
            assert_eq!(req.query(), Some("x=y"));
            assert!(req.params().is_none());
        }
        Dispatch::Handled(_) => panic!("nothing should have matched"),
    }

    assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn global_middleware_runs_before_route_middleware_before_handler() {
    let log = log();
    let router = Router::new()
        .add_middleware([mark(&log, "global-1"), mark(&log, "global-2")])
        .get_with(
            "/orders/:id",
            record(&log, "handler"),
            [mark(&log, "route-1"), mark(&log, "route-2")],
        );

    let _ = router.dispatch(Request::new("GET", "/orders/5")).await;
    assert_eq!(entries(&log), ["global-1", "global-2", "route-1", "route-2", "handler"]);
}

#[tokio::test]
async fn middleware_runs_before_parameters_are_attached() {
    let seen = Arc::new(Mutex::new(None));
    let probe = {
        let seen = Arc::clone(&seen);
        Middleware::new(move |req| *seen.lock().unwrap() = Some(req.params().is_some()))
    };

    let router = Router::new().get_with("/user/:id", echo_id, [probe]);
    assert_eq!(body(router.dispatch(Request::new("GET", "/user/9")).await), "9");
    assert_eq!(*seen.lock().unwrap(), Some(false));
}

#[tokio::test]
async fn middleware_state_reaches_the_handler() {
    #[derive(Clone)]
    struct RequestId(u64);

    let stamp = Middleware::new(|req| {
        req.extensions_mut().insert(RequestId(7));
    });

    let router = Router::new()
        .add_middleware([stamp])
        .get("/", |req: Request| async move {
            let id = req.extensions().get::<RequestId>().map_or(0, |id| id.0);
            Response::text(id.to_string())
        });

    assert_eq!(body(router.dispatch(Request::new("GET", "/")).await), "7");
}

#[tokio::test]
async fn container_is_handed_to_handlers() {
    struct Services {
        greeting: &'static str,
    }

    let router = Router::new()
        .with_container(Arc::new(Services { greeting: "hello" }))
        .get("/greet/:name", |req: Request| async move {
            let services = req.container::<Services>().expect("container attached");
            Response::text(format!("{} {}", services.greeting, req.param("name").unwrap_or("")))
        });

    assert_eq!(body(router.dispatch(Request::new("GET", "/greet/ada")).await), "hello ada");
}

#[tokio::test]
async fn handler_return_types_convert_into_responses() {
    let router = Router::new()
        .get("/str", |_req: Request| async { "static" })
        .get("/status", |_req: Request| async { ghast::StatusCode::ACCEPTED });

    assert_eq!(body(router.dispatch(Request::new("GET", "/str")).await), "static");

    let response = router.dispatch(Request::new("GET", "/status")).await.response().unwrap();
    assert_eq!(response.status_code(), ghast::StatusCode::ACCEPTED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatch_keeps_parameters_per_request() {
    let router = Arc::new(Router::new().get("/user/:id", echo_id));

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..64 {
        let router = Arc::clone(&router);
        tasks.spawn(async move {
            let dispatched = router.dispatch(Request::new("GET", &format!("/user/{i}"))).await;
            (i, body(dispatched))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (i, echoed) = joined.unwrap();
        assert_eq!(echoed, i.to_string());
    }
}
