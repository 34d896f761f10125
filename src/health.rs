//! Built-in health-check actions.
//!
//! Kubernetes asks two questions. ruta answers them.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from load-balancer. |
//!
//! Register them on your router:
//!
//! ```rust
//! use ruta::{health, Action, Router};
//!
//! let mut router = Router::new();
//! router.get("/healthz", Action::new(health::liveness));
//! router.get("/readyz", Action::new(health::readiness));
//! ```
//!
//! Override `readiness` with a custom action if you need to gate on
//! dependency availability (database connections, downstream services, etc.).

use crate::action::Args;
use crate::response::Response;

/// Liveness probe handler.
///
/// Always returns `200 OK` with body `"ok"`. If the process can dispatch at
/// all, it is alive — this handler intentionally has no dependencies.
pub async fn liveness(_args: Args) -> Response {
    Response::text("ok")
}

/// Readiness probe handler (default implementation).
///
/// Returns `200 OK` with body `"ready"`. Replace with your own action if
/// your application needs a warm-up period or must verify dependency health
/// before accepting traffic.
pub async fn readiness(_args: Args) -> Response {
    Response::text("ready")
}
