pub mod bearer;
pub mod claims;
pub mod error;
pub mod factory;
pub mod jwks;
pub mod permissions;
pub mod token_validator;

pub use claims::Claims;
pub use error::AuthError;
pub use factory::build_token_validator;
pub use token_validator::TokenValidator;
