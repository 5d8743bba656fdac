use leptos_set_password::{AuthClientOptions, ConfigError};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "Alera";

pub const APP_STORE_URL_VAR: &str = "APP_STORE_URL";
pub const PLAY_STORE_URL_VAR: &str = "PLAY_STORE_URL";

/// Everything the set-password page needs at runtime. Loaded on the server and handed to the
/// client through a server function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub auth: AuthClientOptions,
    pub app_store_url: Option<String>,
    pub play_store_url: Option<String>,
}

#[cfg(feature = "ssr")]
pub static ENVIRONMENT: std::sync::LazyLock<Result<Environment, ConfigError>> =
    std::sync::LazyLock::new(|| {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!(%err, "No .env file loaded. Using process environment only.");
        }
        Environment::from_lookup(|name| std::env::var(name).ok())
    });

impl Environment {
    /// `AUTH_SERVICE_URL` and `AUTH_PUBLIC_API_KEY` are required, store links are optional.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |name: &str| lookup(name).filter(|it| !it.trim().is_empty());
        Ok(Self {
            auth: AuthClientOptions::from_lookup(&lookup)?,
            app_store_url: optional(APP_STORE_URL_VAR),
            play_store_url: optional(PLAY_STORE_URL_VAR),
        })
    }
}
