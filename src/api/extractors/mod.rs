/*!
 * Request extractors shared by the drink handlers
 *
 * - AuthClaims: route guard が検証済みの Claims を handler に渡す
 * - DrinkId: Path の `{drink_id}` を内部 ID に変換 (数値でなければ 404)
 */

mod auth_claims;
mod drink_id;

pub use auth_claims::AuthClaims;
pub use drink_id::DrinkId;
