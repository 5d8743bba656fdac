use leptos::prelude::*;
use snafu::{ResultExt, Snafu};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::client::AuthClient;
use crate::error::AuthError;
use crate::flow::PasswordFlow;
use crate::fragment::{self, FragmentError};

pub const INVALID_LINK_MESSAGE: &str =
    "This link is invalid or has expired. Please request a new invite.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please request a new invite.";

#[derive(Debug, Snafu)]
pub enum BootstrapError {
    #[snafu(display("BootstrapError: Invite link did not carry usable credentials"))]
    InvalidLink { source: FragmentError },

    #[snafu(display("BootstrapError: Session could not be established"))]
    SessionRejected { source: AuthError },
}

impl BootstrapError {
    /// Both cases are terminal for the page. The user has to request a new invite.
    pub fn user_message(&self) -> &'static str {
        match self {
            BootstrapError::InvalidLink { .. } => INVALID_LINK_MESSAGE,
            BootstrapError::SessionRejected { .. } => SESSION_EXPIRED_MESSAGE,
        }
    }
}

/// Tracks whether the component that started an async operation is still mounted.
///
/// Only suppresses state updates. The operation itself keeps running to completion.
#[derive(Debug, Clone, Default)]
pub struct MountGuard {
    unmounted: Arc<AtomicBool>,
}

impl MountGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a guard that flips once the current reactive owner is cleaned up.
    pub fn for_current_owner() -> Self {
        let guard = Self::new();
        let on_unmount = guard.clone();
        on_cleanup(move || on_unmount.unmount());
        guard
    }

    pub fn unmount(&self) {
        self.unmounted.store(true, Ordering::Release);
    }

    pub fn is_mounted(&self) -> bool {
        !self.unmounted.load(Ordering::Acquire)
    }
}

/// Reads invite credentials from `fragment` and establishes a session with them.
///
/// The client is never called when the fragment lacks either token. Any failure of the client,
/// be it a rejected request or anything else, is reported as `SessionRejected`.
pub async fn establish_session_from_fragment<C: AuthClient>(
    client: &C,
    fragment: &str,
) -> Result<(), BootstrapError> {
    let credentials = fragment::parse_invite_fragment(fragment).context(InvalidLinkSnafu {})?;
    client
        .establish_session(&credentials)
        .await
        .context(SessionRejectedSnafu {})
}

/// Runs the session bootstrap and reports a failure into `flow`, unless `guard` says the
/// component went away in the meantime.
pub async fn bootstrap_session<C: AuthClient>(
    client: &C,
    fragment: &str,
    guard: &MountGuard,
    flow: RwSignal<PasswordFlow>,
) {
    let result = establish_session_from_fragment(client, fragment).await;

    if !guard.is_mounted() {
        tracing::trace!(?result, "Dropping session bootstrap result. Component is gone.");
        return;
    }

    match result {
        Ok(()) => tracing::trace!("Session bootstrapped from invite link."),
        Err(err) => {
            tracing::warn!(?err, "Session bootstrap failed.");
            let message = err.user_message();
            flow.try_update(|flow| flow.show_error(message));
        }
    }
}
