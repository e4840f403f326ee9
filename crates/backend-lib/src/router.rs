// ============================
// admin-gate/src/router.rs
// ============================
//! HTTP routes.
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::Uri,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::auth::login;
use crate::middleware::{check_privileges, Caller};
use crate::AppState;

/// Admin roots, relative to the site's routing prefix
const ADMIN_ROOTS: [&str; 3] = ["/admin", "/api/admin", "/api/v3/admin"];

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let relative_path = state.settings.relative_path.clone();

    let mut admin = Router::new();
    for root in ADMIN_ROOTS {
        let base = format!("{relative_path}{root}");
        admin = admin
            .route(&base, get(admin_page))
            .route(&format!("{base}/"), get(admin_page))
            .route(&format!("{base}/{{*rest}}"), get(admin_page).post(admin_page));
    }
    let admin = admin.route_layer(from_fn_with_state(state.clone(), check_privileges));

    Router::new()
        .merge(admin)
        .route(&format!("{relative_path}/login"), post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Placeholder admin page: echoes who was let in and where
async fn admin_page(Extension(caller): Extension<Caller>, uri: Uri) -> Json<Value> {
    Json(json!({
        "uid": caller.uid,
        "path": uri.path(),
    }))
}
