//! Environment Configuration
//!
//! Builds the per-crate configs from environment variables. In debug
//! builds missing secrets fall back to random development values;
//! release builds require them.

use std::env;

use anyhow::{Context, anyhow};
use base64::Engine;
use base64::engine::general_purpose;

use auth::config::{AppleOAuthConfig, AuthConfig, GoogleOAuthConfig};
use auth::infra::email::{Mailer, SmtpConfig};
use notify::{AnyNotifier, DiscordNotifier, NullNotifier};
use shows::ShowsConfig;

/// Decode a base64 env var into a 32-byte secret
fn secret_from_env(var: &str) -> anyhow::Result<[u8; 32]> {
    let b64 = env::var(var).with_context(|| format!("{var} must be set in production"))?;
    let bytes = general_purpose::STANDARD
        .decode(&b64)
        .with_context(|| format!("{var} is not valid base64"))?;

    let mut secret = [0u8; 32];
    if bytes.len() != secret.len() {
        return Err(anyhow!("{var} must decode to exactly 32 bytes"));
    }
    secret.copy_from_slice(&bytes);
    Ok(secret)
}

fn optional(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Build the auth config from the environment
pub fn auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        let mut config = AuthConfig::default();
        config.session_secret = secret_from_env("AUTH_SESSION_SECRET")?;
        config.jwt_secret = secret_from_env("AUTH_JWT_SECRET")?;
        config
    };

    if let Some(pepper) = optional("PASSWORD_PEPPER") {
        config.password_pepper = Some(pepper.into_bytes());
    }

    if let Some(base_url) = optional("MAGIC_LINK_BASE_URL") {
        config.magic_link_base_url = base_url;
    }

    if let Some(rp_id) = optional("WEBAUTHN_RP_ID") {
        config.rp_id = rp_id;
    }
    if let Some(rp_origin) = optional("WEBAUTHN_RP_ORIGIN") {
        config.rp_origin = rp_origin;
    }

    // OAuth providers stay disabled unless fully configured
    config.google = match (
        optional("GOOGLE_CLIENT_ID"),
        optional("GOOGLE_CLIENT_SECRET"),
        optional("GOOGLE_REDIRECT_URI"),
    ) {
        (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(GoogleOAuthConfig {
            client_id,
            client_secret,
            redirect_uri,
        }),
        _ => None,
    };

    config.apple = match (
        optional("APPLE_CLIENT_ID"),
        optional("APPLE_TEAM_ID"),
        optional("APPLE_KEY_ID"),
        optional("APPLE_PRIVATE_KEY_PEM"),
        optional("APPLE_REDIRECT_URI"),
    ) {
        (
            Some(client_id),
            Some(team_id),
            Some(key_id),
            Some(private_key_pem),
            Some(redirect_uri),
        ) => Some(AppleOAuthConfig {
            client_id,
            team_id,
            key_id,
            private_key_pem,
            redirect_uri,
        }),
        _ => None,
    };

    Ok(config)
}

/// Build the mailer: SMTP when configured, console otherwise
pub fn mailer() -> anyhow::Result<Mailer> {
    match (
        optional("SMTP_HOST"),
        optional("SMTP_USERNAME"),
        optional("SMTP_PASSWORD"),
        optional("SMTP_FROM"),
    ) {
        (Some(host), Some(username), Some(password), Some(from)) => {
            let mailer = Mailer::smtp(&SmtpConfig {
                host,
                username,
                password,
                from,
            })
            .map_err(|e| anyhow!("Failed to build SMTP mailer: {e}"))?;
            tracing::info!("SMTP mailer configured");
            Ok(mailer)
        }
        _ => {
            tracing::info!("SMTP not configured, magic links are logged to console");
            Ok(Mailer::console())
        }
    }
}

/// Build the notifier backend from DISCORD_WEBHOOK_URL
pub fn notifier() -> AnyNotifier {
    match optional("DISCORD_WEBHOOK_URL") {
        Some(url) => {
            tracing::info!("Discord notifications configured");
            AnyNotifier::Discord(DiscordNotifier::new(url))
        }
        None => {
            tracing::info!("Discord webhook not configured, notifications disabled");
            AnyNotifier::Null(NullNotifier)
        }
    }
}

/// Build the shows config (defaults; nothing env-tunable yet)
pub fn shows_config() -> ShowsConfig {
    ShowsConfig::default()
}

/// Listen port (default 31113)
pub fn port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(31113)
}
