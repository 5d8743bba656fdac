use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use std::fmt::{Debug, Formatter};
use url::Url;

use crate::{TokenEndpoint, UserEndpoint};

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ConfigError {
    #[snafu(display("ConfigError: '{name}' is missing or empty"))]
    Missing { name: &'static str },

    #[snafu(display("ConfigError: '{name}' is not a valid url"))]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },

    #[snafu(display("ConfigError: '{name}' cannot be used as a base url"))]
    CannotBeABase { name: &'static str },
}

/// Name of the variable holding the hosted auth service's base url.
pub const SERVICE_URL_VAR: &str = "AUTH_SERVICE_URL";

/// Name of the variable holding the public (anon) API key of the hosted auth service.
pub const PUBLIC_API_KEY_VAR: &str = "AUTH_PUBLIC_API_KEY";

/// Everything `HostedAuthClient` needs to talk to the hosted auth service.
///
/// Both values are public by nature (they end up in the browser) and are therefore safe to
/// serialize and ship from the server to the hydrated client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClientOptions {
    /// Base url of the hosted auth service, E.g. "https://abcdefgh.supabase.co/".
    pub service_url: Url,

    /// The public API key sent as `apikey` header with every request.
    pub public_api_key: String,
}

impl Debug for AuthClientOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClientOptions")
            .field("service_url", &self.service_url.as_str())
            .field("public_api_key", &"***")
            .finish()
    }
}

impl AuthClientOptions {
    /// Validates raw configuration values. Both must be present and non-blank.
    pub fn new(
        service_url: Option<&str>,
        public_api_key: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let service_url = non_blank(service_url).ok_or(ConfigError::Missing {
            name: SERVICE_URL_VAR,
        })?;
        let public_api_key = non_blank(public_api_key).ok_or(ConfigError::Missing {
            name: PUBLIC_API_KEY_VAR,
        })?;

        let service_url = Url::parse(service_url).context(InvalidUrlSnafu {
            name: SERVICE_URL_VAR,
        })?;
        if service_url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeABase {
                name: SERVICE_URL_VAR,
            });
        }

        Ok(Self {
            service_url,
            public_api_key: public_api_key.to_owned(),
        })
    }

    /// Reads both values through `lookup`, typically backed by the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let service_url = lookup(SERVICE_URL_VAR);
        let public_api_key = lookup(PUBLIC_API_KEY_VAR);
        Self::new(service_url.as_deref(), public_api_key.as_deref())
    }

    pub(crate) fn user_endpoint(&self) -> UserEndpoint {
        self.endpoint(&["auth", "v1", "user"])
    }

    pub(crate) fn token_endpoint(&self) -> TokenEndpoint {
        self.endpoint(&["auth", "v1", "token"])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.service_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|it| !it.is_empty())
}
