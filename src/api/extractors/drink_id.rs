use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;

/// `{drink_id}` path segment.
///
/// Anything that is not a positive integer cannot name a drink, so it is
/// rejected as 404 rather than 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrinkId(pub i32);

impl<S> FromRequestParts<S> for DrinkId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        parse(&raw).map(DrinkId).ok_or(AppError::NotFound)
    }
}

fn parse(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn only_positive_integers_are_ids() {
        assert_eq!(parse("1"), Some(1));
        assert_eq!(parse("42"), Some(42));
        assert_eq!(parse("0"), None);
        assert_eq!(parse("-3"), None);
        assert_eq!(parse("abc"), None);
        assert_eq!(parse("99999999999"), None);
    }
}
