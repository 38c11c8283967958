//! Permission gate: one required permission string per protected route.

use crate::services::auth::{AuthError, Claims};

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

/// Allow the call only if `claims.permissions` contains `required`.
///
/// - No `permissions` claim at all → `InvalidClaims` (token was not issued for this API's RBAC)
/// - Claim present, permission absent → `Forbidden`
/// - Otherwise the claims are handed back untouched
pub fn requires(required: &str, claims: Claims) -> Result<Claims, AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::PERMISSIONS_MISSING);
    }
    if !claims.has_permission(required) {
        return Err(AuthError::Forbidden);
    }
    Ok(claims)
}
