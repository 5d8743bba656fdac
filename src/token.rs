use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use std::fmt::{Debug, Formatter};
use time::OffsetDateTime;

use crate::response::{SessionResponse, User};
use crate::{AccessToken, RefreshToken};

#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum ClaimsError {
    #[snafu(display("ClaimsError: Could not decode access token"))]
    Decode { source: jsonwebtoken::errors::Error },

    #[snafu(display("ClaimsError: Access token contained a non-representable 'exp' value {exp}"))]
    Expiry {
        exp: i64,
        source: time::error::ComponentRange,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
struct RawAccessTokenClaims {
    sub: String,
    exp: i64,
    email: Option<String>,
}

/// The parts of an access token this crate reads.
///
/// The signature is NOT verified here. The hosted auth service does that on every request we
/// make with the token. We only need `exp` to decide whether the token can still be used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenClaims {
    pub subject: String,
    pub expires_at: OffsetDateTime,
    pub email: Option<String>,
}

impl AccessTokenClaims {
    pub fn decode(access_token: &str) -> Result<Self, ClaimsError> {
        let mut validation = jsonwebtoken::Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let raw = jsonwebtoken::decode::<RawAccessTokenClaims>(
            access_token,
            &jsonwebtoken::DecodingKey::from_secret(&[]),
            &validation,
        )
        .context(DecodeSnafu {})?
        .claims;

        Ok(Self {
            subject: raw.sub,
            expires_at: OffsetDateTime::from_unix_timestamp(raw.exp)
                .context(ExpirySnafu { exp: raw.exp })?,
            email: raw.email,
        })
    }

    pub fn has_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// An established session with the hosted auth service.
#[derive(Clone, PartialEq)]
pub struct Session {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub token_type: String,
    pub expires_at: OffsetDateTime,
    pub user: User,
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Builds a session from the tokens we were handed and the user the service confirmed them for.
    pub(crate) fn validated(
        access_token: AccessToken,
        refresh_token: RefreshToken,
        claims: &AccessTokenClaims,
        user: User,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_owned(),
            expires_at: claims.expires_at,
            user,
        }
    }

    pub(crate) fn from_response(response: SessionResponse, now: OffsetDateTime) -> Self {
        let expires_at = response
            .expires_at
            .and_then(|at| OffsetDateTime::from_unix_timestamp(at).ok())
            .or_else(|| {
                response
                    .expires_in
                    .and_then(|secs| now.checked_add(time::Duration::seconds(secs)))
            })
            .unwrap_or_else(|| {
                tracing::warn!("Session response contained no expiry information. Treating the session as expiring now.");
                now
            });
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type.unwrap_or_else(|| "bearer".to_owned()),
            expires_at,
            user: response.user,
        }
    }
}
