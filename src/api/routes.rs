/*
 * Responsibility
 * - URL 構造を定義
 * - 保護ルートは登録時に必要 permission を 1 つだけ宣言する (middleware::auth::require)
 * - GET /drinks と POST /drinks のように同一パスでも permission が違うものは別々に route する
 * - 未知のパス (404) / 未対応メソッド (405) も共通の JSON error body で返す
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::{
    api::handlers::{
        drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
        health::health,
    },
    error::AppError,
    middleware::auth::require,
    services::auth::permissions,
    state::AppState,
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/drinks", get(list_drinks))
        .route(
            "/drinks",
            require(post(create_drink), state, permissions::POST_DRINKS),
        )
        .route(
            "/drinks-detail",
            require(get(list_drinks_detail), state, permissions::GET_DRINKS_DETAIL),
        )
        .route(
            "/drinks/{drink_id}",
            require(patch(update_drink), state, permissions::PATCH_DRINKS),
        )
        .route(
            "/drinks/{drink_id}",
            require(delete(delete_drink), state, permissions::DELETE_DRINKS),
        )
        .fallback(|| async { AppError::NotFound })
        .method_not_allowed_fallback(|| async { AppError::MethodNotAllowed })
}
