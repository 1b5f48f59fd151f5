//! Entity Module

pub mod auth_session;
pub mod credentials;
pub mod login_token;
pub mod oauth_identity;
pub mod passkey;
pub mod user;
pub mod user_profile;
