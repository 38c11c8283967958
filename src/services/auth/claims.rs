use serde::Deserialize;

/// Access token (JWT) claims after signature and standard-claim validation.
///
/// NOTE:
/// - `aud` can be either a string or an array; `jsonwebtoken` validates it via `Validation::set_audience`.
/// - `permissions` stays an `Option` so the gate can tell "no permissions claim at all"
///   (wrong token type) apart from "claim present but permission missing".
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    pub iss: String,
    #[serde(default)]
    pub aud: serde_json::Value,
    pub exp: u64,

    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iat: Option<u64>,

    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }
}
