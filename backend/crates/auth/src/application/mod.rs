//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod magic_link;
pub mod oauth;
pub mod passkeys;
pub mod refresh;
pub mod session;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod tokens;

// Re-exports
pub use config::AuthConfig;
pub use magic_link::{EmailSender, RedeemMagicLinkUseCase, RequestMagicLinkUseCase};
pub use oauth::OAuthUseCase;
pub use passkeys::{PasskeyLoginUseCase, PasskeyRegistrationUseCase, build_webauthn};
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use session::{ClientFingerprint, IssuedSession, SessionIssuer};
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use tokens::{AccessClaims, issue_access_token, parse_refresh_token, verify_access_token};
