//! Auth Module
//!
//! Admin login and the extractors guarding write and admin routes.

mod extract;
mod identity;

pub use extract::{bearer_token, AdminClaims, Authenticated};
pub use identity::{
    password_digest, AuthError, Claims, Credentials, IdentityProvider, StaticIdentity, Token,
    ADMIN_ROLE,
};
