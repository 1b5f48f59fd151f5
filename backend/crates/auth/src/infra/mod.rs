//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod email;
pub mod postgres;

pub use email::{ConsoleMailer, Mailer, SmtpMailer};
pub use postgres::PgAuthRepository;
