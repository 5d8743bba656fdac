use snafu::{OptionExt, ResultExt};
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use time::OffsetDateTime;

use crate::config::AuthClientOptions;
use crate::error::{AuthError, InvalidAccessTokenSnafu, MissingSessionSnafu, RequestSnafu};
use crate::fragment::InviteCredentials;
use crate::request;
use crate::token::{AccessTokenClaims, Session};

/// The two operations the set-password page needs from an authentication provider.
///
/// Implementations are constructed once, when the page is set up, and handed to
/// [`SetPasswordForm`](crate::components::SetPasswordForm). Tests substitute their own.
pub trait AuthClient: Clone + 'static {
    /// Exchanges invite credentials for an active session held by this client.
    fn establish_session(
        &self,
        credentials: &InviteCredentials,
    ) -> impl Future<Output = Result<(), AuthError>>;

    /// Sets a new password for the user of the currently established session.
    fn update_password(&self, new_password: &str) -> impl Future<Output = Result<(), AuthError>>;
}

/// `AuthClient` talking to a GoTrue compatible hosted auth service (as used by Supabase).
///
/// The session is only held in memory. Clones share it.
#[derive(Debug, Clone)]
pub struct HostedAuthClient {
    options: Arc<AuthClientOptions>,
    http: reqwest::Client,
    session: Arc<RwLock<Option<Session>>>,
}

impl HostedAuthClient {
    pub fn new(options: AuthClientOptions) -> Self {
        Self::with_http_client(options, reqwest::Client::new())
    }

    pub fn with_http_client(options: AuthClientOptions, http: reqwest::Client) -> Self {
        Self {
            options: Arc::new(options),
            http,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// The currently established session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_session(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let response = request::refresh_session(
            &self.http,
            self.options.token_endpoint(),
            &self.options.public_api_key,
            refresh_token,
        )
        .await
        .context(RequestSnafu {})?;
        Ok(Session::from_response(response, OffsetDateTime::now_utc()))
    }

    /// Returns the current session, refreshing it first if its access token expired in the
    /// meantime.
    async fn usable_session(&self) -> Result<Session, AuthError> {
        let session = self.session().context(MissingSessionSnafu {})?;
        if session.expires_at > OffsetDateTime::now_utc() {
            return Ok(session);
        }

        tracing::debug!("Access token expired. Refreshing session before continuing.");
        let refreshed = self.refresh(&session.refresh_token).await?;
        self.replace_session(Some(refreshed.clone()));
        Ok(refreshed)
    }
}

impl AuthClient for HostedAuthClient {
    async fn establish_session(&self, credentials: &InviteCredentials) -> Result<(), AuthError> {
        let claims = AccessTokenClaims::decode(&credentials.access_token)
            .context(InvalidAccessTokenSnafu {})?;
        tracing::debug!(subject = %claims.subject, "Establishing session from invite link.");

        let session = if claims.has_expired(OffsetDateTime::now_utc()) {
            tracing::debug!(
                expired_at = %claims.expires_at,
                "Access token from invite link already expired. Refreshing session."
            );
            self.refresh(&credentials.refresh_token).await?
        } else {
            let user = request::retrieve_user(
                &self.http,
                self.options.user_endpoint(),
                &self.options.public_api_key,
                &credentials.access_token,
            )
            .await
            .context(RequestSnafu {})?;
            Session::validated(
                credentials.access_token.clone(),
                credentials.refresh_token.clone(),
                &claims,
                user,
            )
        };

        tracing::debug!(user_id = %session.user.id, "Session established.");
        self.replace_session(Some(session));
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<(), AuthError> {
        let session = self.usable_session().await?;

        let user = request::update_password(
            &self.http,
            self.options.user_endpoint(),
            &self.options.public_api_key,
            &session.access_token,
            new_password,
        )
        .await
        .context(RequestSnafu {})?;

        tracing::debug!(user_id = %user.id, "Password updated.");
        if let Some(current) = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            current.user = user;
        }
        Ok(())
    }
}
