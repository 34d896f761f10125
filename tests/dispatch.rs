//! End-to-end dispatch tests over the public API.

use std::sync::{Arc, Mutex};

use ruta::{
    middleware, Action, Args, Error, Method, MiddlewareUnit, Next, Request, Response, Route,
    Router,
};

async fn ok(_args: Args) -> Response {
    Response::text("ok")
}

/// A middleware unit that appends `{label}:in` / `{label}:out` around the
/// rest of the chain.
fn recording(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> MiddlewareUnit {
    let log = Arc::clone(log);
    middleware::from_fn(move |request: Request, next: Next| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(format!("{label}:in"));
            let response = next.run(request).await?;
            log.lock().unwrap().push(format!("{label}:out"));
            Ok(response)
        }
    })
}

#[tokio::test]
async fn captures_reach_the_handler() {
    let mut router = Router::new();
    router.get(
        "/users/{id}",
        Action::new(|args: Args| async move {
            Response::text(args.text("id").unwrap_or("missing").to_owned())
        })
        .param("id"),
    );

    let response = router
        .run(Request::new(Method::Get, "/users/42"))
        .await
        .unwrap()
        .expect("route should match");
    assert_eq!(response.body(), b"42");
}

#[tokio::test]
async fn method_mismatch_without_fallback_is_empty() {
    let mut router = Router::new();
    router.get("/ping", Action::new(ok));

    let outcome = router.run(Request::new(Method::Post, "/ping")).await.unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn first_registered_match_wins() {
    let mut router = Router::new();
    router.get(
        "/users/{id}",
        Action::new(|_args: Args| async { Response::text("template") }),
    );
    router.get(
        "/users/42",
        Action::new(|_args: Args| async { Response::text("literal") }),
    );

    let response = router
        .run(Request::new(Method::Get, "/users/42"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.body(), b"template");
}

#[tokio::test]
async fn fallback_sees_the_request() {
    let mut router = Router::new();
    router.set_fallback(
        Action::new(|args: Args| async move {
            let path = args.request().expect("request slot").path().to_owned();
            Response::builder().status(404).text(format!("no route for {path}"))
        })
        .param("request"),
    );

    let response = router
        .run(Request::new(Method::Get, "/missing"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.body(), b"no route for /missing");
}

#[tokio::test]
async fn middleware_runs_outer_to_inner_and_resumes_in_reverse() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let action_log = Arc::clone(&log);
    let action = Action::new(move |_args: Args| {
        let log = Arc::clone(&action_log);
        async move {
            log.lock().unwrap().push("action".to_owned());
            Response::status(204)
        }
    });

    let mut router = Router::new();
    router.add_route(
        Route::get("/a", action)
            .unwrap()
            .with_middleware(vec![recording("m1", &log), recording("m2", &log)]),
    );

    let response = router
        .run(Request::new(Method::Get, "/a"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status_code(), 204);

    let entries: Vec<String> = log.lock().unwrap().clone();
    assert_eq!(entries, ["m1:in", "m2:in", "action", "m2:out", "m1:out"]);
}

#[tokio::test]
async fn short_circuit_skips_inner_units_and_the_action() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let gate_log = Arc::clone(&log);
    let gate = middleware::from_fn(move |_request: Request, _next: Next| {
        let log = Arc::clone(&gate_log);
        async move {
            log.lock().unwrap().push("gate".to_owned());
            Ok(Response::status(401))
        }
    });

    let action_log = Arc::clone(&log);
    let action = Action::new(move |_args: Args| {
        let log = Arc::clone(&action_log);
        async move {
            log.lock().unwrap().push("action".to_owned());
            Response::status(204)
        }
    });

    let mut router = Router::new();
    router.add_route(
        Route::get("/locked", action)
            .unwrap()
            .with_middleware(vec![gate, recording("inner", &log)]),
    );

    let response = router
        .run(Request::new(Method::Get, "/locked"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.status_code(), 401);

    let entries: Vec<String> = log.lock().unwrap().clone();
    assert_eq!(entries, ["gate"]);
}

#[tokio::test]
async fn middleware_deposits_reach_binding() {
    let mut router = Router::new();
    router
        .get(
            "/tenants",
            Action::new(|args: Args| async move {
                Response::text(args.text("tenant").unwrap_or("none").to_owned())
            })
            .param("tenant"),
        )
        .attach(|request: Request, next: Next| {
            let request = request.with_value("tenant", "acme");
            next.run(request)
        });

    let response = router
        .run(Request::new(Method::Get, "/tenants"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.body(), b"acme");
}

#[tokio::test]
async fn route_slot_binds_the_matched_route() {
    let mut router = Router::new();
    router.set_route(
        "/whoami",
        Action::new(|args: Args| async move {
            let route = args.route().expect("route slot");
            Response::text(route.name().unwrap_or("anonymous").to_owned())
        })
        .param("route"),
        &[],
        Some("identity"),
    );

    let response = router
        .run(Request::new(Method::Get, "/whoami"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.body(), b"identity");
}

#[tokio::test]
async fn router_prefix_applies_at_registration() {
    let mut router = Router::new();
    router.set_prefix("/api");
    router.get("/ping", Action::new(ok));

    assert_eq!(router.get_routes()[0].path(), "/api/ping");
    assert!(router
        .run(Request::new(Method::Get, "/api/ping"))
        .await
        .unwrap()
        .is_some());
    assert!(router
        .run(Request::new(Method::Get, "/ping"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn groups_prefix_and_share_middleware() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut router = Router::new();
    router.add_route_group(
        "admin/",
        vec![
            Route::get("/stats", Action::new(ok)).unwrap().with_name("admin.stats"),
            Route::get("/flush", Action::new(ok)).unwrap(),
        ],
        vec![recording("guard", &log)],
    );

    assert_eq!(
        router.get_route("admin.stats").map(Route::path),
        Some("/admin/stats")
    );

    let response = router
        .run(Request::new(Method::Get, "/admin/flush"))
        .await
        .unwrap();
    assert!(response.is_some());

    let entries: Vec<String> = log.lock().unwrap().clone();
    assert_eq!(entries, ["guard:in", "guard:out"]);
}

#[tokio::test]
async fn missing_required_parameter_is_a_dispatch_error() {
    let mut router = Router::new();
    router.get("/broken", Action::new(ok).param("user_id"));

    let err = router
        .run(Request::new(Method::Get, "/broken"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnboundParameter { name } if name == "user_id"));
}
