/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::require (route guard), cors::apply, http::apply
 */
pub mod auth;
pub mod cors;
pub mod http;
