//! Minimal ruta example — a route table driven by hand-built requests.
//!
//! ruta has no server: whatever speaks the wire builds a `Request` and calls
//! `Router::run`. Here the transport layer is a `for` loop.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic

use ruta::{middleware, Action, Args, Method, Next, Request, Response, Route, Router};

#[tokio::main]
async fn main() -> Result<(), ruta::Error> {
    tracing_subscriber::fmt::init();

    let mut router = Router::new();

    router
        .get("/users/{id}", Action::new(get_user).param("id"))
        .attach(middleware::trace);
    router.post("/users", Action::new(create_user).param("request"));

    router.add_route_group(
        "/admin",
        vec![Route::get("/stats", Action::new(stats))?.with_name("admin.stats")],
        vec![middleware::from_fn(require_auth)],
    );

    router.get("/healthz", Action::new(ruta::health::liveness));
    router.set_fallback(Action::new(not_found));

    for request in [
        Request::new(Method::Get, "/users/42"),
        Request::new(Method::Post, "/users").with_body(br#"{"name":"alice"}"#.to_vec()),
        Request::new(Method::Get, "/admin/stats").with_header("authorization", "Bearer s3cr3t"),
        Request::new(Method::Get, "/admin/stats"),
        Request::new(Method::Get, "/healthz"),
        Request::new(Method::Get, "/nowhere"),
    ] {
        let label = format!("{} {}", request.method(), request.path());
        match router.run(request).await? {
            Some(response) => println!("{label} -> {}", response.status_code()),
            None => println!("{label} -> (no route, no fallback)"),
        }
    }

    Ok(())
}

// GET /users/{id}
//
// Response::json takes Vec<u8> — pass bytes from your serialiser:
//   serde_json:  Response::json(serde_json::to_vec(&user).unwrap())
//   hand-built:  Response::json(format!(...).into_bytes())
async fn get_user(args: Args) -> Response {
    let id = args.text("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes())
}

// POST /users
//
// The action declared a `request` slot, so the dispatched request arrives
// as a bound argument. req.body() is &[u8] — ruta does not touch the bytes.
async fn create_user(args: Args) -> Response {
    let request = args.request().expect("declared request slot");
    if request.body().is_empty() {
        return Response::status(400);
    }

    Response::builder()
        .status(201)
        .header("location", "/users/99")
        .json(br#"{"id":"99","name":"new_user"}"#.to_vec())
}

async fn stats(_args: Args) -> Response {
    Response::json(br#"{"users":1}"#.to_vec())
}

async fn not_found(_args: Args) -> Response {
    Response::status(404)
}

// Shared by every route in the /admin group. Short-circuits with 401 when
// the header is missing.
async fn require_auth(request: Request, next: Next) -> Result<Response, ruta::Error> {
    if request.header("authorization").is_none() {
        return Ok(Response::status(401));
    }
    next.run(request).await
}
