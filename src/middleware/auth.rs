//! Route guard: bearer token validation + permission gate → Claims を extensions に入れる
//!
//! Each protected route wraps its `MethodRouter` with exactly one required
//! permission. The handler then receives the validated claims through the
//! `AuthClaims` extractor.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::{TokenValidator, permissions};
use crate::state::AppState;

#[derive(Clone)]
struct PermissionGuard {
    validator: Arc<TokenValidator>,
    permission: &'static str,
}

/// Require `permission` for every method of `route`.
///
/// 例：
/// ```ignore
/// .route("/drinks", require(post(create_drink), &state, permissions::POST_DRINKS))
/// ```
pub fn require(
    route: MethodRouter<AppState>,
    state: &AppState,
    permission: &'static str,
) -> MethodRouter<AppState> {
    let guard = PermissionGuard {
        validator: state.auth.clone(),
        permission,
    };
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    route.route_layer(middleware::from_fn_with_state(guard, guard_middleware))
}

async fn guard_middleware(
    State(guard): State<PermissionGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let verdict = guard
        .validator
        .authenticate(req.headers())
        .await
        .and_then(|claims| permissions::requires(guard.permission, claims));

    let claims = match verdict {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                kind = err.kind(),
                error = %err,
                permission = guard.permission,
                method = %req.method(),
                path = %req.uri().path(),
                "request rejected by route guard"
            );
            return Err(err.into());
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
