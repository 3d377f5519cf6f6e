// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod credentials;
pub mod password;
pub mod session;
pub mod token_generator;
mod service;
mod service_impl;

pub use credentials::{CredentialStore, DEMO_USERS};
pub use password::{
    hash_password_secure, hasher_from_settings, verify_password, Argon2Hasher, CredentialHasher,
    HashAlgorithm, ScryptHasher,
};
pub use session::{Session, SessionManager, SessionTable, SESSION_TTL};
pub use service::{AuthService, LoginOutcome};
pub use service_impl::DefaultAuth;
pub use token_generator::generate_session_token;
